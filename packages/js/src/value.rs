//! Dynamic values crossing the script/native boundary
//!
//! [`Value`] is the only loosely typed surface native code sees. Coercions
//! follow the engine's rules (ToString, ToNumber, ToInt32, ToUint32,
//! ToBoolean) and every coercion of [`Value::Exception`] re-surfaces the
//! pending exception unchanged.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use zeroize::{Zeroize, Zeroizing};

use crate::context::ScriptContext;
use crate::{Result, ScriptError};

/// Signature of a native function callable from scripts
pub type NativeFn = fn(&ScriptContext, &[Value]) -> Result<Value>;

const TWO_POW_32: f64 = 4_294_967_296.0;
const TWO_POW_31: f64 = 2_147_483_648.0;
/// Decimal exponent from which numbers print in exponential form
const MAX_PLAIN_EXPONENT: i32 = 21;
/// Decimal exponent below which fractions print in exponential form
const MIN_PLAIN_EXPONENT: i32 = -6;

/// Script string, stored as UTF-16 code units like the engine does
///
/// Strings can hold lone surrogates, so conversion to UTF-8 can fail.
#[derive(Clone, PartialEq, Eq, Hash, Default, Zeroize)]
pub struct JsString(Vec<u16>);

impl JsString {
    /// Build from raw UTF-16 code units
    #[must_use]
    pub fn from_utf16(units: Vec<u16>) -> Self {
        Self(units)
    }

    /// Raw UTF-16 code units
    #[must_use]
    pub fn as_utf16(&self) -> &[u16] {
        &self.0
    }

    /// Number of UTF-16 code units
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the string is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Extract a native string, `None` when the string is not valid UTF-16
    #[must_use]
    pub fn to_utf8(&self) -> Option<String> {
        String::from_utf16(&self.0).ok()
    }

    /// Extract a native string into a buffer that is wiped on drop
    ///
    /// The UTF-8 length is measured first so the buffer is allocated once
    /// and never grows, leaving no unwiped partial copies on the heap.
    #[must_use]
    pub fn to_utf8_zeroizing(&self) -> Option<Zeroizing<String>> {
        let mut len = 0;
        for unit in char::decode_utf16(self.0.iter().copied()) {
            len += unit.ok()?.len_utf8();
        }

        let mut out = Zeroizing::new(String::with_capacity(len));
        for unit in char::decode_utf16(self.0.iter().copied()) {
            out.push(unit.ok()?);
        }
        Some(out)
    }
}

impl From<&str> for JsString {
    fn from(value: &str) -> Self {
        Self(value.encode_utf16().collect())
    }
}

impl From<String> for JsString {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl fmt::Display for JsString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf16_lossy(&self.0))
    }
}

impl fmt::Debug for JsString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", String::from_utf16_lossy(&self.0))
    }
}

/// Shared, mutable script object
///
/// Clones alias the same property table, so an object fetched from the
/// global environment can be extended in place.
#[derive(Clone, Default)]
pub struct Object(Rc<RefCell<BTreeMap<String, Value>>>);

impl Object {
    /// Create an empty object
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a property, `None` when absent
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Value> {
        self.0.borrow().get(key).cloned()
    }

    /// Create or overwrite a property
    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.borrow_mut().insert(key.into(), value.into());
    }

    /// Whether the property exists
    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        self.0.borrow().contains_key(key)
    }

    /// Property names in sorted order
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.0.borrow().keys().cloned().collect()
    }

    /// Whether both handles refer to the same object
    #[must_use]
    pub fn same_object(&self, other: &Object) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.0.borrow().iter()).finish()
    }
}

/// Native function exposed to scripts
#[derive(Clone)]
pub struct NativeFunction {
    name: &'static str,
    length: u32,
    func: NativeFn,
}

impl NativeFunction {
    /// Wrap `func` under `name`, declaring `length` formal parameters
    #[must_use]
    pub fn new(name: &'static str, length: u32, func: NativeFn) -> Self {
        Self { name, length, func }
    }

    /// Function name used in call stacks
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Declared number of parameters
    #[must_use]
    pub fn length(&self) -> u32 {
        self.length
    }

    pub(crate) fn invoke(&self, ctx: &ScriptContext, args: &[Value]) -> Result<Value> {
        (self.func)(ctx, args)
    }
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[native function {}/{}]", self.name, self.length)
    }
}

/// Dynamic script value
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// `undefined`
    #[default]
    Undefined,
    /// `null`
    Null,
    /// Boolean primitive
    Bool(bool),
    /// Number primitive
    Number(f64),
    /// String primitive
    String(JsString),
    /// Dense array
    Array(Vec<Value>),
    /// Plain object
    Object(Object),
    /// Native function
    Function(NativeFunction),
    /// Pending exception marker
    Exception(ScriptError),
}

impl Value {
    /// Convenience constructor for a string value
    pub fn string(value: impl Into<JsString>) -> Self {
        Self::String(value.into())
    }

    /// `typeof`-style name of the value's kind
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
            Self::Function(_) => "function",
            Self::Exception(_) => "exception",
        }
    }

    /// Whether the value is an array
    #[must_use]
    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array(_))
    }

    /// Whether the value is a boolean primitive
    #[must_use]
    pub fn is_bool(&self) -> bool {
        matches!(self, Self::Bool(_))
    }

    /// Whether the value is a string primitive
    #[must_use]
    pub fn is_string(&self) -> bool {
        matches!(self, Self::String(_))
    }

    /// Whether the value is `undefined`
    #[must_use]
    pub fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    /// Object handle, if the value is an object
    #[must_use]
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Self::Object(object) => Some(object),
            _ => None,
        }
    }

    /// ToString
    ///
    /// # Errors
    ///
    /// Re-surfaces a pending exception, including one nested in an array.
    pub fn to_js_string(&self) -> Result<JsString> {
        let text = match self {
            Self::Undefined => "undefined".to_string(),
            Self::Null => "null".to_string(),
            Self::Bool(b) => b.to_string(),
            Self::Number(n) => number_to_string(*n),
            Self::String(s) => return Ok(s.clone()),
            Self::Array(elements) => return join_elements(elements),
            Self::Object(_) => "[object Object]".to_string(),
            Self::Function(func) => format!("function {}() {{ [native code] }}", func.name),
            Self::Exception(err) => return Err(err.clone()),
        };
        Ok(JsString::from(text))
    }

    /// ToNumber
    ///
    /// # Errors
    ///
    /// Re-surfaces a pending exception.
    pub fn to_number(&self) -> Result<f64> {
        match self {
            Self::Undefined | Self::Object(_) | Self::Function(_) => Ok(f64::NAN),
            Self::Null => Ok(0.0),
            Self::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
            Self::Number(n) => Ok(*n),
            Self::String(s) => Ok(string_to_number(&s.to_string())),
            Self::Array(elements) => {
                let joined = join_elements(elements)?;
                Ok(string_to_number(&joined.to_string()))
            }
            Self::Exception(err) => Err(err.clone()),
        }
    }

    /// ToInt32 (modulo 2^32, NaN and infinities become 0)
    ///
    /// # Errors
    ///
    /// Re-surfaces a pending exception.
    pub fn to_int32(&self) -> Result<i32> {
        let wrapped = wrap_u32(self.to_number()?);
        let signed = if wrapped >= TWO_POW_31 {
            wrapped - TWO_POW_32
        } else {
            wrapped
        };
        // `signed` is an integer in [-2^31, 2^31)
        #[allow(clippy::cast_possible_truncation)]
        let int = signed as i32;
        Ok(int)
    }

    /// ToUint32 (modulo 2^32, NaN and infinities become 0)
    ///
    /// # Errors
    ///
    /// Re-surfaces a pending exception.
    pub fn to_uint32(&self) -> Result<u32> {
        // wrap_u32 yields an integer in [0, 2^32)
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let uint = wrap_u32(self.to_number()?) as u32;
        Ok(uint)
    }

    /// ToBoolean
    ///
    /// # Errors
    ///
    /// Re-surfaces a pending exception.
    pub fn to_boolean(&self) -> Result<bool> {
        match self {
            Self::Undefined | Self::Null => Ok(false),
            Self::Bool(b) => Ok(*b),
            Self::Number(n) => Ok(*n != 0.0 && !n.is_nan()),
            Self::String(s) => Ok(!s.is_empty()),
            Self::Array(_) | Self::Object(_) | Self::Function(_) => Ok(true),
            Self::Exception(err) => Err(err.clone()),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Undefined, Self::Undefined) | (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Array(a), Self::Array(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => a.same_object(b),
            (Self::Function(a), Self::Function(b)) => a.name == b.name && a.length == b.length,
            (Self::Exception(a), Self::Exception(b)) => a == b,
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(JsString::from(value))
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(JsString::from(value))
    }
}

impl From<JsString> for Value {
    fn from(value: JsString) -> Self {
        Self::String(value)
    }
}

impl From<Object> for Value {
    fn from(value: Object) -> Self {
        Self::Object(value)
    }
}

impl From<NativeFunction> for Value {
    fn from(value: NativeFunction) -> Self {
        Self::Function(value)
    }
}

impl From<ScriptError> for Value {
    fn from(value: ScriptError) -> Self {
        Self::Exception(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Self::Array(values.into_iter().map(Into::into).collect())
    }
}

fn join_elements(elements: &[Value]) -> Result<JsString> {
    let mut parts = Vec::with_capacity(elements.len());
    for element in elements {
        match element {
            Value::Undefined | Value::Null => parts.push(String::new()),
            other => parts.push(other.to_js_string()?.to_string()),
        }
    }
    Ok(JsString::from(parts.join(",")))
}

fn number_to_string(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }
    if n.is_infinite() {
        let text = if n > 0.0 { "Infinity" } else { "-Infinity" };
        return text.to_string();
    }

    // Shortest round-trip digits, e.g. "1.2345e-7"
    let scientific = format!("{:e}", n.abs());
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((&scientific, "0"));
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
    let k = i32::try_from(digits.len()).unwrap_or(i32::MAX);
    // The number is 0.digits * 10^point
    let point = exponent.parse::<i32>().unwrap_or(0) + 1;

    let body = if k <= point && point <= MAX_PLAIN_EXPONENT {
        format!("{digits}{}", "0".repeat((point - k).unsigned_abs() as usize))
    } else if 0 < point && point <= MAX_PLAIN_EXPONENT {
        let (int, frac) = digits.split_at(point.unsigned_abs() as usize);
        format!("{int}.{frac}")
    } else if MIN_PLAIN_EXPONENT < point && point <= 0 {
        format!("0.{}{digits}", "0".repeat(point.unsigned_abs() as usize))
    } else {
        let (lead, rest) = digits.split_at(1);
        let sign = if point > 0 { '+' } else { '-' };
        let exponent = (point - 1).unsigned_abs();
        if rest.is_empty() {
            format!("{lead}e{sign}{exponent}")
        } else {
            format!("{lead}.{rest}e{sign}{exponent}")
        }
    };

    if n < 0.0 {
        format!("-{body}")
    } else {
        body
    }
}

/// WhiteSpace and LineTerminator code points, which StringToNumber trims
fn is_js_whitespace(c: char) -> bool {
    (c.is_whitespace() && c != '\u{0085}') || c == '\u{FEFF}'
}

fn string_to_number(text: &str) -> f64 {
    let trimmed = text.trim_matches(is_js_whitespace);
    match trimmed {
        "" => return 0.0,
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    for (prefixes, radix) in [(["0x", "0X"], 16), (["0o", "0O"], 8), (["0b", "0B"], 2)] {
        if let Some(digits) = prefixes.iter().find_map(|p| trimmed.strip_prefix(p)) {
            return radix_to_number(digits, radix);
        }
    }

    // Rust accepts "inf" and "nan", the engine does not
    if trimmed
        .chars()
        .any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E')
    {
        return f64::NAN;
    }

    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

/// Unsigned digits of a prefixed literal; signs and empty bodies are NaN
fn radix_to_number(digits: &str, radix: u32) -> f64 {
    if digits.is_empty() {
        return f64::NAN;
    }
    digits
        .chars()
        .try_fold(0.0, |acc: f64, c| {
            c.to_digit(radix)
                .map(|d| acc * f64::from(radix) + f64::from(d))
        })
        .unwrap_or(f64::NAN)
}

fn wrap_u32(n: f64) -> f64 {
    if !n.is_finite() {
        return 0.0;
    }
    n.trunc().rem_euclid(TWO_POW_32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_formatting() {
        assert_eq!(number_to_string(365.0), "365");
        assert_eq!(number_to_string(-0.0), "0");
        assert_eq!(number_to_string(1.5), "1.5");
        assert_eq!(number_to_string(-123.456), "-123.456");
        assert_eq!(number_to_string(f64::NAN), "NaN");
        assert_eq!(number_to_string(f64::NEG_INFINITY), "-Infinity");
        assert_eq!(number_to_string(1e20), "100000000000000000000");
        assert_eq!(number_to_string(1e21), "1e+21");
        assert_eq!(number_to_string(-1.5e300), "-1.5e+300");
        assert_eq!(number_to_string(0.1), "0.1");
        assert_eq!(number_to_string(0.000_001), "0.000001");
        assert_eq!(number_to_string(1e-7), "1e-7");
        assert_eq!(number_to_string(1.25e-7), "1.25e-7");
        assert_eq!(number_to_string(f64::MAX), "1.7976931348623157e+308");
        assert_eq!(number_to_string(5e-324), "5e-324");
    }

    #[test]
    fn test_string_to_number() {
        assert_eq!(string_to_number(" 42 "), 42.0);
        assert_eq!(string_to_number(""), 0.0);
        assert_eq!(string_to_number("0x10"), 16.0);
        assert_eq!(string_to_number("0o17"), 15.0);
        assert_eq!(string_to_number("0B101"), 5.0);
        assert_eq!(string_to_number("1e3"), 1000.0);
        assert_eq!(string_to_number("\u{FEFF}\u{2028} 7\t"), 7.0);
        assert!(string_to_number("inf").is_nan());
        assert!(string_to_number("12abc").is_nan());
        assert!(string_to_number("0x").is_nan());
        assert!(string_to_number("0x+1").is_nan());
        assert!(string_to_number("0b12").is_nan());
        assert!(string_to_number("-0x10").is_nan());
        assert!(string_to_number("\u{0085}1").is_nan());
    }
}
