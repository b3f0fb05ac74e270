//! Subject distinguished name parsing
//!
//! Accepts comma-separated `KEY=VALUE` attributes such as
//! `CN=leaf,O=Contoso,C=US`. A literal comma inside a value is written `\,`.

use rcgen::{DistinguishedName, DnType};

use crate::{CaError, Result};

/// Parse a subject name string into a distinguished name
///
/// # Errors
///
/// Returns [`CaError::InvalidSubjectName`] for an empty name, an attribute
/// without `=`, an empty value or an unsupported attribute key.
pub fn parse_subject_name(subject: &str) -> Result<DistinguishedName> {
    if subject.trim().is_empty() {
        return Err(CaError::InvalidSubjectName(
            "subject name must not be empty".to_string(),
        ));
    }

    let mut name = DistinguishedName::new();
    for attribute in split_attributes(subject) {
        let (key, value) = attribute.split_once('=').ok_or_else(|| {
            CaError::InvalidSubjectName(format!("'{attribute}' is not a KEY=VALUE pair"))
        })?;
        let key = key.trim();
        let value = value.trim();
        if value.is_empty() {
            return Err(CaError::InvalidSubjectName(format!(
                "attribute '{key}' has an empty value"
            )));
        }
        name.push(dn_type(key)?, value);
    }

    Ok(name)
}

fn dn_type(key: &str) -> Result<DnType> {
    match key.to_ascii_uppercase().as_str() {
        "CN" => Ok(DnType::CommonName),
        "O" => Ok(DnType::OrganizationName),
        "OU" => Ok(DnType::OrganizationalUnitName),
        "C" => Ok(DnType::CountryName),
        "ST" => Ok(DnType::StateOrProvinceName),
        "L" => Ok(DnType::LocalityName),
        _ => Err(CaError::InvalidSubjectName(format!(
            "unsupported attribute '{key}'"
        ))),
    }
}

fn split_attributes(subject: &str) -> Vec<String> {
    let mut attributes = Vec::new();
    let mut current = String::new();
    let mut chars = subject.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(',') => current.push(','),
                Some(other) => {
                    current.push('\\');
                    current.push(other);
                }
                None => current.push('\\'),
            },
            ',' => attributes.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    attributes.push(current);

    attributes
}
