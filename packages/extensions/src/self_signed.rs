//! `generateSelfSignedCert(privateKey, subjectName, sans, validityDays, isCA, caPathLen?)`

use cleanroom_ca::{create_self_signed_cert, make_key_pair, sans_from_string_list, CaError, Pem};
use cleanroom_common::{LoggingTransformer, SensitiveString};
use cleanroom_js::{Result, ScriptContext, ScriptError, Value};
use tracing::info;

use crate::args;
use crate::installer::certificate_result;

/// Name under which the bridge is installed
pub const FUNCTION_NAME: &str = "generateSelfSignedCert";
/// Declared parameter count, counting the optional path length
pub const FUNCTION_LENGTH: u32 = 6;

const MIN_ARGS: usize = 5;
const MAX_ARGS: usize = 6;

/// Issue a certificate signed by the caller-supplied private key
///
/// Returns `{ cert }` holding the PEM certificate. The private key is held in
/// a zeroizing buffer that is wiped as soon as the key pair is built.
///
/// # Errors
///
/// * `TypeError` for a wrong argument count, a SAN argument that is not an
///   array of strings, or a non-boolean is-CA flag
/// * `RangeError` for a negative validity period
/// * any exception raised while coercing an argument
/// * `InternalError` when issuance fails
pub fn generate_self_signed_cert(ctx: &ScriptContext, args: &[Value]) -> Result<Value> {
    args::check_arity(args, MIN_ARGS, MAX_ARGS)?;

    let private_key = SensitiveString::from(ctx.to_sensitive_str(&args[0])?);
    let subject_name = ctx.to_str(&args[1])?;
    let subject_alt_names = args::subject_alt_names(ctx, &args[2])?;
    let validity_period_days = args::validity_days(&args[3])?;
    let ca = args::ca_flag(&args[4], "5th")?;
    let ca_path_len_constraint = args::path_len(args, 5)?;

    info!(
        "Issuing self-signed certificate for {subject_name} (key {}, {} SANs, {} days, ca: {ca})",
        private_key.fingerprint(),
        subject_alt_names.len(),
        validity_period_days
    );

    let pem = issue(
        private_key,
        &subject_name,
        &subject_alt_names,
        validity_period_days,
        ca,
        ca_path_len_constraint,
    )
    .map_err(|e| {
        LoggingTransformer::log_crypto_error(FUNCTION_NAME, e.kind());
        ScriptError::internal_error(format!("Failed to generate self signed cert: {e}"))
    })?;

    Ok(certificate_result(ctx, pem))
}

fn issue(
    private_key: SensitiveString,
    subject_name: &str,
    subject_alt_names: &[String],
    validity_period_days: u32,
    ca: bool,
    ca_path_len_constraint: Option<i32>,
) -> std::result::Result<Pem, CaError> {
    let key_pair = make_key_pair(private_key.expose());
    drop(private_key);
    let key_pair = key_pair?;

    let sans = sans_from_string_list(subject_alt_names)?;
    let valid_from = args::backdated_valid_from();
    create_self_signed_cert(
        &key_pair,
        subject_name,
        &sans,
        &valid_from,
        args::extended_days(validity_period_days),
        ca,
        ca_path_len_constraint,
    )
}
