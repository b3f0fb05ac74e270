//! Single-threaded script context

use tracing::{debug, trace};
use zeroize::Zeroizing;

use crate::extension::Extensions;
use crate::value::{NativeFn, NativeFunction, Object, Value};
use crate::{Result, ScriptError};

const EXTRACTION_FAILED: &str = "Failed to extract C string from JS string";

/// Execution context owning the global environment
///
/// One context serves one request. Objects are reference counted without
/// synchronisation, so a context never leaves the thread that created it.
#[derive(Debug, Default)]
pub struct ScriptContext {
    global: Object,
}

impl ScriptContext {
    /// Create a context with an empty global object
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle to the global object
    #[must_use]
    pub fn global(&self) -> Object {
        self.global.clone()
    }

    /// Create an empty object
    #[must_use]
    pub fn new_object(&self) -> Object {
        Object::new()
    }

    /// Wrap a native function so scripts can call it
    #[must_use]
    pub fn new_native_function(&self, name: &'static str, length: u32, func: NativeFn) -> Value {
        Value::Function(NativeFunction::new(name, length, func))
    }

    /// Fetch global property `name`, creating it from `default` when absent
    ///
    /// An existing object is returned as is, so properties other installers
    /// placed on it survive.
    ///
    /// # Errors
    ///
    /// `TypeError` when the property exists but is not an object.
    pub fn get_or_create_global_property(&self, name: &str, default: Object) -> Result<Object> {
        match self.global.get(name) {
            Some(Value::Object(existing)) => Ok(existing),
            Some(other) => Err(ScriptError::type_error(format!(
                "Global property {name} is a {}, expected an object",
                other.type_name()
            ))),
            None => {
                trace!("Creating global property {name}");
                self.global.set(name, default.clone());
                Ok(default)
            }
        }
    }

    /// Read property `key` of `target`
    ///
    /// Arrays answer `length` and indices, functions answer `name` and
    /// `length`, primitives answer nothing.
    ///
    /// # Errors
    ///
    /// Re-surfaces a pending exception held by `target`.
    pub fn get_property(&self, target: &Value, key: &str) -> Result<Value> {
        let value = match target {
            Value::Exception(err) => return Err(err.clone()),
            Value::Object(object) => object.get(key),
            Value::Array(elements) => match key {
                "length" => u32::try_from(elements.len()).ok().map(Value::from),
                index => index
                    .parse::<usize>()
                    .ok()
                    .and_then(|i| elements.get(i).cloned()),
            },
            Value::Function(func) => match key {
                "name" => Some(Value::from(func.name())),
                "length" => Some(Value::from(func.length())),
                _ => None,
            },
            _ => None,
        };
        Ok(value.unwrap_or_default())
    }

    /// ToString followed by UTF-8 extraction
    ///
    /// # Errors
    ///
    /// Re-surfaces a pending exception; `TypeError` when the string holds
    /// lone surrogates.
    pub fn to_str(&self, value: &Value) -> Result<String> {
        value
            .to_js_string()?
            .to_utf8()
            .ok_or_else(|| ScriptError::type_error(EXTRACTION_FAILED))
    }

    /// [`ScriptContext::to_str`] for secrets
    ///
    /// A string value is decoded in place without copying its UTF-16 units.
    /// Any other value is coerced into a temporary that is wiped along with
    /// the result.
    ///
    /// # Errors
    ///
    /// Same as [`ScriptContext::to_str`].
    pub fn to_sensitive_str(&self, value: &Value) -> Result<Zeroizing<String>> {
        let extracted = match value {
            Value::String(s) => s.to_utf8_zeroizing(),
            other => Zeroizing::new(other.to_js_string()?).to_utf8_zeroizing(),
        };
        extracted.ok_or_else(|| ScriptError::type_error(EXTRACTION_FAILED))
    }

    /// Call `callee` with `args`
    ///
    /// # Errors
    ///
    /// `TypeError` when `callee` is not callable, otherwise whatever the
    /// function raises.
    pub fn call(&self, callee: &Value, args: &[Value]) -> Result<Value> {
        match callee {
            Value::Function(func) => {
                trace!("Calling native function {} with {} args", func.name(), args.len());
                func.invoke(self, args)
            }
            Value::Exception(err) => Err(err.clone()),
            other => Err(ScriptError::type_error(format!(
                "{} is not a function",
                other.type_name()
            ))),
        }
    }

    /// Resolve a dotted path from the global object and call it
    ///
    /// `ctx.call_path("cleanroom.crypto.generateSelfSignedCert", &args)`
    ///
    /// # Errors
    ///
    /// `TypeError` when a path segment is missing or not callable, otherwise
    /// whatever the function raises.
    pub fn call_path(&self, path: &str, args: &[Value]) -> Result<Value> {
        let mut current = Value::Object(self.global());
        for segment in path.split('.') {
            if !matches!(current, Value::Object(_)) {
                return Err(ScriptError::type_error(format!(
                    "Cannot read property {segment} of {}",
                    current.type_name()
                )));
            }
            current = self.get_property(&current, segment)?;
        }
        if current.is_undefined() {
            return Err(ScriptError::type_error(format!("{path} is not a function")));
        }
        self.call(&current, args)
    }

    /// Install every extension into this context, in order
    ///
    /// # Errors
    ///
    /// Stops at the first extension that fails to install.
    pub fn install(&self, extensions: &Extensions<'_>) -> Result<()> {
        for extension in extensions {
            extension.install(self)?;
        }
        debug!("Installed {} extension(s)", extensions.len());
        Ok(())
    }
}
