//! Argument handling shared by both certificate bridges

use chrono::{Duration, Utc};
use cleanroom_ca::to_x509_time_string;
use cleanroom_js::{Result, ScriptContext, ScriptError, Value};
use tracing::debug;

use crate::extract::extract_string_array;

/// Certificates are backdated by one day to absorb clock skew
const BACKDATE_HOURS: i64 = 24;

/// Reject an argument count outside `min..=max`
pub(crate) fn check_arity(args: &[Value], min: usize, max: usize) -> Result<()> {
    if args.len() < min || args.len() > max {
        return Err(ScriptError::type_error(format!(
            "Passed {} arguments, but expected {min} or {max}",
            args.len()
        )));
    }
    Ok(())
}

/// SAN list argument (always the 3rd); empty arrays are allowed
pub(crate) fn subject_alt_names(ctx: &ScriptContext, arg: &Value) -> Result<Vec<String>> {
    extract_string_array(ctx, arg, true).map_err(|cause| {
        debug!("Rejected SAN argument: {cause}");
        ScriptError::type_error("3rd argument must be a string array")
    })
}

/// Validity period argument (always the 4th)
pub(crate) fn validity_days(arg: &Value) -> Result<u32> {
    let days = arg.to_int32()?;
    u32::try_from(days).map_err(|_| {
        ScriptError::range_error("4th argument must be a non-negative number of days")
    })
}

/// Is-CA flag; must be a boolean primitive, no coercion
pub(crate) fn ca_flag(arg: &Value, position: &str) -> Result<bool> {
    if !arg.is_bool() {
        return Err(ScriptError::type_error(format!(
            "{position} argument must be a boolean"
        )));
    }
    arg.to_boolean()
}

/// Optional trailing path-length constraint at `index`
pub(crate) fn path_len(args: &[Value], index: usize) -> Result<Option<i32>> {
    args.get(index).map(Value::to_int32).transpose()
}

/// Start of the validity window, one day before now
pub(crate) fn backdated_valid_from() -> String {
    to_x509_time_string(Utc::now() - Duration::hours(BACKDATE_HOURS))
}

/// Day count covering the backdated start plus the requested period
///
/// `days` comes from a non-negative `i32`, so the increment cannot overflow.
pub(crate) fn extended_days(days: u32) -> u32 {
    days + 1
}
