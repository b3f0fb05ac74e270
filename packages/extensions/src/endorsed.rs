//! `generateEndorsedCert(publicKey, subjectName, sans, validityDays, issuerPrivateKey,
//! issuerCert, isCA, caPathLen?)`

use cleanroom_ca::{
    compute_cert_valid_to_string, create_endorsed_cert, sans_from_string_list, CaError, Pem,
};
use cleanroom_common::{LoggingTransformer, SensitiveString};
use cleanroom_js::{Result, ScriptContext, ScriptError, Value};
use tracing::info;

use crate::args;
use crate::installer::certificate_result;

/// Name under which the bridge is installed
pub const FUNCTION_NAME: &str = "generateEndorsedCert";
/// Declared parameter count, counting the optional path length
pub const FUNCTION_LENGTH: u32 = 8;

const MIN_ARGS: usize = 7;
const MAX_ARGS: usize = 8;

/// Validated arguments of one endorsement
struct EndorsementRequest {
    public_key: String,
    subject_name: String,
    subject_alt_names: Vec<String>,
    validity_period_days: u32,
    issuer_private_key: SensitiveString,
    issuer_cert: String,
    ca: bool,
    ca_path_len_constraint: Option<i32>,
}

/// Issue a certificate for `publicKey`, signed by the issuer key and certificate
///
/// Returns `{ cert }` holding the PEM certificate. The issuer private key is
/// kept in a zeroizing buffer for the duration of the call.
///
/// # Errors
///
/// * `TypeError` for a wrong argument count, a SAN argument that is not an
///   array of strings, or a non-boolean is-CA flag
/// * `RangeError` for a negative validity period
/// * any exception raised while coercing an argument
/// * `InternalError` when issuance fails, including an issuer key that does
///   not match the issuer certificate
pub fn generate_endorsed_cert(ctx: &ScriptContext, args: &[Value]) -> Result<Value> {
    args::check_arity(args, MIN_ARGS, MAX_ARGS)?;

    let request = EndorsementRequest {
        public_key: ctx.to_str(&args[0])?,
        subject_name: ctx.to_str(&args[1])?,
        subject_alt_names: args::subject_alt_names(ctx, &args[2])?,
        validity_period_days: args::validity_days(&args[3])?,
        issuer_private_key: SensitiveString::from(ctx.to_sensitive_str(&args[4])?),
        issuer_cert: ctx.to_str(&args[5])?,
        ca: args::ca_flag(&args[6], "7th")?,
        ca_path_len_constraint: args::path_len(args, 7)?,
    };

    info!(
        "Issuing endorsed certificate for {} (issuer key {}, {} SANs, {} days, ca: {})",
        request.subject_name,
        request.issuer_private_key.fingerprint(),
        request.subject_alt_names.len(),
        request.validity_period_days,
        request.ca
    );

    let pem = issue(request).map_err(|e| {
        LoggingTransformer::log_crypto_error(FUNCTION_NAME, e.kind());
        ScriptError::internal_error(format!("Failed to generate endorsed cert: {e}"))
    })?;

    Ok(certificate_result(ctx, pem))
}

fn issue(request: EndorsementRequest) -> std::result::Result<Pem, CaError> {
    let sans = sans_from_string_list(&request.subject_alt_names)?;
    let valid_from = args::backdated_valid_from();
    let valid_to = compute_cert_valid_to_string(
        &valid_from,
        args::extended_days(request.validity_period_days),
    )?;

    create_endorsed_cert(
        &request.public_key,
        &request.subject_name,
        &sans,
        &valid_from,
        &valid_to,
        request.issuer_private_key.expose(),
        &request.issuer_cert,
        request.ca,
        request.ca_path_len_constraint,
    )
}
