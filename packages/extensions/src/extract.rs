//! Dynamic-array extraction

use cleanroom_js::{Result, ScriptContext, ScriptError, Value};

/// Convert a script array of strings into native strings
///
/// Order and duplicates are preserved. An empty array is accepted only when
/// `allow_empty` is set.
///
/// # Errors
///
/// * `TypeError` when `value` is not an array or holds a non-string
/// * `RangeError` for an empty array when `allow_empty` is false
/// * `TypeError` naming the position of a string that is not valid UTF-16
/// * any exception raised while reading the array's length
pub fn extract_string_array(
    ctx: &ScriptContext,
    value: &Value,
    allow_empty: bool,
) -> Result<Vec<String>> {
    if !value.is_array() {
        return Err(ScriptError::type_error("First argument must be an array"));
    }

    let len = ctx.get_property(value, "length")?.to_uint32()?;
    if len == 0 {
        if allow_empty {
            return Ok(Vec::new());
        }
        return Err(ScriptError::range_error(
            "First argument must be a non-empty array",
        ));
    }

    let mut out = Vec::with_capacity(len as usize);
    for i in 0..len {
        let element = ctx.get_property(value, &i.to_string())?;
        if !element.is_string() {
            return Err(ScriptError::type_error(
                "First argument must be an array of strings, found non-string",
            ));
        }
        let text = ctx.to_str(&element).map_err(|_| {
            ScriptError::type_error(format!(
                "Failed to extract C string from JS string at position {i}"
            ))
        })?;
        out.push(text);
    }

    Ok(out)
}
