use std::fs;
use std::path::Path;

use meskit_io_fs::write_file_atomic;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Number, Value};

use crate::conf::{C_JSON_EMPTY_DOCUMENT, N_JSON_INDENT};
use crate::spec::JsonEditError;

////////////////////////////////////////////////////////////////////////////////
// #region ValueOps

/// Short type label used in error messages.
pub fn derive_json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Combine a stored value with appended data.
///
/// String + string concatenates, array + array extends, number + number
/// adds (integer when both sides are integers and the sum fits). Every other
/// pairing is a [`JsonEditError::TypeMismatch`].
pub fn derive_appended_json_value(existing: &Value, data: &Value) -> Result<Value, JsonEditError> {
    let derive_err = || JsonEditError::TypeMismatch {
        existing: derive_json_type_name(existing),
        data: derive_json_type_name(data),
    };

    match (existing, data) {
        (Value::String(lhs), Value::String(rhs)) => Ok(Value::String(format!("{lhs}{rhs}"))),
        (Value::Array(lhs), Value::Array(rhs)) => {
            let mut l_items = lhs.clone();
            l_items.extend(rhs.iter().cloned());
            Ok(Value::Array(l_items))
        }
        (Value::Number(lhs), Value::Number(rhs)) => {
            if let (Some(a), Some(b)) = (lhs.as_i64(), rhs.as_i64())
                && let Some(sum) = a.checked_add(b)
            {
                return Ok(Value::Number(Number::from(sum)));
            }
            let (Some(a), Some(b)) = (lhs.as_f64(), rhs.as_f64()) else {
                return Err(derive_err());
            };
            Number::from_f64(a + b)
                .map(Value::Number)
                .ok_or_else(derive_err)
        }
        _ => Err(derive_err()),
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region DocumentIO

/// Parse a file into a JSON value.
pub(crate) fn load_json_value(path_file: &Path) -> Result<Value, JsonEditError> {
    let v_bytes = fs::read(path_file).map_err(|e| JsonEditError::io(path_file, e))?;
    serde_json::from_slice(&v_bytes).map_err(|e| JsonEditError::Parse {
        path: path_file.to_path_buf(),
        source: e,
    })
}

/// Interpret a top-level value as a keyed document.
///
/// Files holding the JSON string `"{}"` (written by older auto-create code)
/// read as an empty object.
pub(crate) fn derive_document(
    value: Value,
    path_file: &Path,
) -> Result<Map<String, Value>, JsonEditError> {
    match value {
        Value::Object(map) => Ok(map),
        Value::String(txt) if txt == C_JSON_EMPTY_DOCUMENT => {
            log::warn!(
                "Document {} holds the string \"{{}}\"; reading it as an empty object.",
                path_file.display()
            );
            Ok(Map::new())
        }
        other => Err(JsonEditError::NotAnObject {
            path: path_file.to_path_buf(),
            found: derive_json_type_name(&other),
        }),
    }
}

/// Pretty-print with [`N_JSON_INDENT`] spaces.
pub fn derive_json_pretty_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, JsonEditError> {
    let c_indent = " ".repeat(N_JSON_INDENT);
    let formatter = PrettyFormatter::with_indent(c_indent.as_bytes());
    let mut v_bytes = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut v_bytes, formatter);
    value
        .serialize(&mut serializer)
        .map_err(JsonEditError::Serialize)?;
    Ok(v_bytes)
}

/// Rewrite `path_file` with `v_bytes` (temp file + rename).
pub(crate) fn save_json_bytes(path_file: &Path, v_bytes: &[u8]) -> Result<(), JsonEditError> {
    write_file_atomic(path_file, v_bytes).map_err(|e| JsonEditError::io(path_file, e))
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use std::path::Path;

    use serde_json::{Value, json};

    use super::*;

    #[test]
    fn test_derive_appended_json_value() {
        assert_eq!(
            derive_appended_json_value(&json!("a"), &json!("b")).expect("concat"),
            json!("ab")
        );
        assert_eq!(
            derive_appended_json_value(&json!([1]), &json!([2, 3])).expect("extend"),
            json!([1, 2, 3])
        );
        assert_eq!(
            derive_appended_json_value(&json!(2), &json!(3)).expect("add"),
            json!(5)
        );
        assert_eq!(
            derive_appended_json_value(&json!(1.5), &json!(1)).expect("add"),
            json!(2.5)
        );
        assert!(matches!(
            derive_appended_json_value(&json!({"a": 1}), &json!({"b": 2})),
            Err(JsonEditError::TypeMismatch {
                existing: "object",
                data: "object"
            })
        ));
        assert!(matches!(
            derive_appended_json_value(&json!("a"), &json!(1)),
            Err(JsonEditError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_derive_document_accepts_legacy_string() {
        let path = Path::new("doc.json");
        assert!(derive_document(json!("{}"), path).expect("legacy").is_empty());
        assert_eq!(
            derive_document(json!({"k": 1}), path).expect("object")["k"],
            json!(1)
        );
        assert!(matches!(
            derive_document(json!([1]), path),
            Err(JsonEditError::NotAnObject { found: "array", .. })
        ));
        assert!(matches!(
            derive_document(Value::String("x".to_string()), path),
            Err(JsonEditError::NotAnObject { found: "string", .. })
        ));
    }

    #[test]
    fn test_derive_json_pretty_bytes_uses_four_spaces() {
        let v_bytes = derive_json_pretty_bytes(&json!({"a": [1]})).expect("render");
        assert_eq!(
            String::from_utf8(v_bytes).expect("utf8"),
            "{\n    \"a\": [\n        1\n    ]\n}"
        );
    }
}
