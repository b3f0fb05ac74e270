//! Subject alternative name parsing
//!
//! SAN strings use the `dNSName:` / `iPAddress:` prefixes understood by the
//! governance constitution. Unprefixed strings are treated as an IP address
//! when they parse as one and as a DNS name otherwise.

use std::fmt;
use std::net::IpAddr;

use rcgen::string::Ia5String;
use rcgen::SanType;

use crate::{CaError, Result};

const DNS_PREFIX: &str = "dNSName:";
const IP_PREFIX: &str = "iPAddress:";

/// One subject alternative name entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubjectAltName {
    /// DNS host name (may be a wildcard such as `*.example.com`)
    Dns(String),
    /// IPv4 or IPv6 address
    Ip(IpAddr),
}

impl SubjectAltName {
    /// Parse a single SAN string
    ///
    /// # Errors
    ///
    /// Returns [`CaError::InvalidSubjectAltName`] for an empty value or an
    /// `iPAddress:` value that is not an IP address.
    pub fn parse(value: &str) -> Result<Self> {
        if let Some(dns) = value.strip_prefix(DNS_PREFIX) {
            return Self::dns(dns);
        }

        if let Some(ip) = value.strip_prefix(IP_PREFIX) {
            return ip.parse::<IpAddr>().map(Self::Ip).map_err(|e| {
                CaError::InvalidSubjectAltName(format!("'{ip}' is not an IP address: {e}"))
            });
        }

        match value.parse::<IpAddr>() {
            Ok(ip) => Ok(Self::Ip(ip)),
            Err(_) => Self::dns(value),
        }
    }

    fn dns(name: &str) -> Result<Self> {
        if name.is_empty() {
            return Err(CaError::InvalidSubjectAltName(
                "DNS name must not be empty".to_string(),
            ));
        }
        Ok(Self::Dns(name.to_string()))
    }

    pub(crate) fn to_san_type(&self) -> Result<SanType> {
        match self {
            Self::Dns(name) => {
                let ia5 = Ia5String::try_from(name.clone()).map_err(|e| {
                    CaError::InvalidSubjectAltName(format!("invalid DNS name '{name}': {e}"))
                })?;
                Ok(SanType::DnsName(ia5))
            }
            Self::Ip(ip) => Ok(SanType::IpAddress(*ip)),
        }
    }
}

impl fmt::Display for SubjectAltName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dns(name) => write!(f, "{DNS_PREFIX}{name}"),
            Self::Ip(ip) => write!(f, "{IP_PREFIX}{ip}"),
        }
    }
}

/// Parse an ordered list of SAN strings, keeping order and duplicates
///
/// # Errors
///
/// Returns the first entry's parse error.
pub fn sans_from_string_list(values: &[String]) -> Result<Vec<SubjectAltName>> {
    values.iter().map(|v| SubjectAltName::parse(v)).collect()
}
