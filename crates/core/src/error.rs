//! Error types for the Lua bridge

use mlua::Value;

/// Errors reported to the calling script
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// Argument of the wrong Lua type
    #[error("{expected} expected, got {got}")]
    TypeMismatch {
        expected: &'static str,
        got: &'static str,
    },

    /// String handed to the vendor library contains a NUL byte
    #[error("'{0}' must not contain NUL bytes")]
    InteriorNul(&'static str),

    /// Error raised by the Lua runtime itself
    #[error(transparent)]
    Lua(#[from] mlua::Error),
}

impl BridgeError {
    pub(crate) fn type_mismatch(expected: &'static str, got: &Value) -> Self {
        Self::TypeMismatch {
            expected,
            got: got.type_name(),
        }
    }
}

impl From<BridgeError> for mlua::Error {
    fn from(err: BridgeError) -> Self {
        match err {
            BridgeError::Lua(e) => e,
            other => mlua::Error::external(other),
        }
    }
}

/// Result type for bridge operations
pub type BridgeResult<T> = Result<T, BridgeError>;

/// Interpret a Lua value as a boolean flag
///
/// Booleans map directly and numbers (including numeric strings) are true
/// when non-zero. Anything else is a type error.
pub fn coerce_bool(value: &Value) -> BridgeResult<bool> {
    match value {
        Value::Boolean(b) => Ok(*b),
        Value::Integer(i) => Ok(*i != 0),
        Value::Number(n) => Ok(*n != 0.0),
        Value::String(s) => s
            .to_str()
            .ok()
            .and_then(|s| s.trim().parse::<f64>().ok())
            .map(|n| n != 0.0)
            .ok_or_else(|| BridgeError::type_mismatch("boolean", value)),
        other => Err(BridgeError::type_mismatch("boolean", other)),
    }
}

#[cfg(test)]
mod tests {
    use mlua::Lua;

    use super::*;

    #[test]
    fn test_coerce_bool() {
        let lua = Lua::new();

        assert!(coerce_bool(&Value::Boolean(true)).unwrap());
        assert!(!coerce_bool(&Value::Boolean(false)).unwrap());
        assert!(coerce_bool(&Value::Integer(2)).unwrap());
        assert!(!coerce_bool(&Value::Number(0.0)).unwrap());

        let numeric = Value::String(lua.create_string("1").unwrap());
        assert!(coerce_bool(&numeric).unwrap());

        let word = Value::String(lua.create_string("yes").unwrap());
        assert!(matches!(
            coerce_bool(&word),
            Err(BridgeError::TypeMismatch { expected: "boolean", got: "string" })
        ));

        let table = Value::Table(lua.create_table().unwrap());
        assert!(coerce_bool(&table).is_err());
    }

    #[test]
    fn test_lua_errors_pass_through_unwrapped() {
        let err: mlua::Error = BridgeError::Lua(mlua::Error::runtime("boom")).into();
        assert!(matches!(err, mlua::Error::RuntimeError(ref m) if m == "boom"));
    }
}
