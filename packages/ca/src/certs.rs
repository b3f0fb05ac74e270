//! Self-signed and endorsed certificate construction
//!
//! Both entry points share one parameter builder so that subject, SAN,
//! validity, serial and basic-constraints handling cannot drift apart.

use rcgen::{
    BasicConstraints, CertificateParams, IsCa, Issuer, KeyUsagePurpose, SerialNumber,
    SubjectPublicKeyInfo,
};
use tracing::{debug, warn};
use x509_parser::pem::parse_x509_pem;

use crate::key_pair::KeyPair;
use crate::name::parse_subject_name;
use crate::san::SubjectAltName;
use crate::validity::{compute_cert_valid_to_string, parse_x509_time_string, to_offset_date_time};
use crate::{CaError, Result};

/// Serial numbers are 16 random bytes with the sign bit cleared
const SERIAL_LEN: usize = 16;

/// Path length applied to CA certificates when none is requested
pub const DEFAULT_CA_PATH_LEN: u8 = 0;

/// PEM-encoded certificate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pem(String);

impl Pem {
    /// PEM text
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// PEM bytes
    #[must_use]
    pub fn data(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Length in bytes
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the PEM is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consume into the PEM text
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

/// Create a certificate signed by its own key pair
///
/// The certificate is valid from `valid_from` for `validity_period_days`
/// days (see [`compute_cert_valid_to_string`]).
///
/// # Errors
///
/// Returns an error for a malformed subject, SAN, time, path length, or when
/// signing fails.
pub fn create_self_signed_cert(
    key_pair: &KeyPair,
    subject_name: &str,
    subject_alt_names: &[SubjectAltName],
    valid_from: &str,
    validity_period_days: u32,
    ca: bool,
    ca_path_len_constraint: Option<i32>,
) -> Result<Pem> {
    let valid_to = compute_cert_valid_to_string(valid_from, validity_period_days)?;
    let params = certificate_params(
        subject_name,
        subject_alt_names,
        valid_from,
        &valid_to,
        ca,
        ca_path_len_constraint,
    )?;

    let cert = params.self_signed(&key_pair.inner)?;
    debug!(
        "Created self-signed certificate for {subject_name} ({} SANs, ca: {ca})",
        subject_alt_names.len()
    );
    debug!("Self-signed certificate valid {valid_from}..{valid_to}");

    Ok(Pem(cert.pem()))
}

/// Create a certificate for `public_key` signed by the issuer key and certificate
///
/// # Errors
///
/// Returns an error for a malformed public key, issuer key or issuer
/// certificate, an issuer key that does not belong to the issuer certificate,
/// an inverted validity window, or any error [`create_self_signed_cert`] can
/// return for the shared parameters.
#[allow(clippy::too_many_arguments)]
pub fn create_endorsed_cert(
    public_key: &str,
    subject_name: &str,
    subject_alt_names: &[SubjectAltName],
    valid_from: &str,
    valid_to: &str,
    issuer_private_key: &str,
    issuer_cert: &str,
    ca: bool,
    ca_path_len_constraint: Option<i32>,
) -> Result<Pem> {
    let mut params = certificate_params(
        subject_name,
        subject_alt_names,
        valid_from,
        valid_to,
        ca,
        ca_path_len_constraint,
    )?;
    params.use_authority_key_identifier_extension = true;

    let subject_key = SubjectPublicKeyInfo::from_pem(public_key)
        .map_err(|e| CaError::InvalidPublicKey(e.to_string()))?;

    let issuer_key = rcgen::KeyPair::from_pem(issuer_private_key)
        .map_err(|e| CaError::InvalidPrivateKey(e.to_string()))?;
    check_issuer_key_matches(issuer_cert, &issuer_key)?;

    let issuer = Issuer::from_ca_cert_pem(issuer_cert, issuer_key)
        .map_err(|e| CaError::InvalidIssuerCertificate(e.to_string()))?;

    let cert = params.signed_by(&subject_key, &issuer)?;
    debug!(
        "Created endorsed certificate for {subject_name} ({} SANs, ca: {ca})",
        subject_alt_names.len()
    );
    debug!("Endorsed certificate valid {valid_from}..{valid_to}");

    Ok(Pem(cert.pem()))
}

fn certificate_params(
    subject_name: &str,
    subject_alt_names: &[SubjectAltName],
    valid_from: &str,
    valid_to: &str,
    ca: bool,
    ca_path_len_constraint: Option<i32>,
) -> Result<CertificateParams> {
    let not_before = parse_x509_time_string(valid_from)?;
    let not_after = parse_x509_time_string(valid_to)?;
    if not_after < not_before {
        return Err(CaError::InvalidValidity(format!(
            "valid_to {valid_to} is before valid_from {valid_from}"
        )));
    }

    let mut params = CertificateParams::default();
    params.distinguished_name = parse_subject_name(subject_name)?;
    params.subject_alt_names = subject_alt_names
        .iter()
        .map(SubjectAltName::to_san_type)
        .collect::<Result<Vec<_>>>()?;
    params.not_before = to_offset_date_time(not_before)?;
    params.not_after = to_offset_date_time(not_after)?;
    params.serial_number = Some(random_serial());
    params.is_ca = basic_constraints(ca, ca_path_len_constraint)?;
    params.key_usages = if ca {
        vec![
            KeyUsagePurpose::KeyCertSign,
            KeyUsagePurpose::CrlSign,
            KeyUsagePurpose::DigitalSignature,
        ]
    } else {
        vec![
            KeyUsagePurpose::DigitalSignature,
            KeyUsagePurpose::KeyEncipherment,
        ]
    };

    Ok(params)
}

fn basic_constraints(ca: bool, ca_path_len_constraint: Option<i32>) -> Result<IsCa> {
    if !ca {
        return Ok(IsCa::ExplicitNoCa);
    }

    let path_len = match ca_path_len_constraint {
        Some(requested) => {
            u8::try_from(requested).map_err(|_| CaError::InvalidPathLength(requested))?
        }
        None => DEFAULT_CA_PATH_LEN,
    };
    Ok(IsCa::Ca(BasicConstraints::Constrained(path_len)))
}

fn random_serial() -> SerialNumber {
    let mut serial: [u8; SERIAL_LEN] = rand::random();
    serial[0] &= 0x7f;
    SerialNumber::from(serial.to_vec())
}

fn check_issuer_key_matches(issuer_cert: &str, issuer_key: &rcgen::KeyPair) -> Result<()> {
    let (_, pem) = parse_x509_pem(issuer_cert.as_bytes())
        .map_err(|e| CaError::InvalidIssuerCertificate(format!("PEM decoding failed: {e}")))?;
    let cert = pem
        .parse_x509()
        .map_err(|e| CaError::InvalidIssuerCertificate(format!("X.509 parsing failed: {e}")))?;

    if !cert.is_ca() {
        warn!("Endorsing certificate with an issuer that is not marked as a CA");
    }

    let certified_key: &[u8] = &cert.public_key().subject_public_key.data;
    if certified_key != issuer_key.public_key_raw() {
        return Err(CaError::InvalidIssuerCertificate(
            "issuer private key does not match the issuer certificate".to_string(),
        ));
    }

    Ok(())
}
