//! Safe field extraction from a loosely-typed JSON tree.
//!
//! Every option field is optional and independent of its siblings.  For a
//! single key the rules are:
//!
//! | JSON value                           | Result                               |
//! |--------------------------------------|--------------------------------------|
//! | key missing                          | destination untouched, no log        |
//! | `null`, `[]`, `{}`                   | destination untouched, no log        |
//! | `""` for a text field                | destination untouched, no log        |
//! | value of the destination's type      | destination overwritten              |
//! | float or bool for a numeric field    | converted (floats truncate for ints) |
//! | anything else                        | destination untouched, one `warn!`   |
//!
//! [`try_get`] is the typed primitive.  Option groups describe themselves as
//! a table of `(key, &mut dyn FieldSlot)` pairs and hand it to
//! [`extract_group`], so a malformed field only costs that one field.

use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use super::wide::WideString;

/// Why a present, non-empty value was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("type must be {expected}, but is {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("{value} is out of range for {expected}")]
    OutOfRange { expected: &'static str, value: String },
}

/// A rejected field, recorded for the load report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldWarning {
    /// Dotted key, e.g. `window.maxFps`.
    pub key: String,
    pub error: FieldError,
}

/// A Rust type that can be read out of a single JSON value.
pub trait FromField: Sized {
    /// Returns `Ok(None)` when the value counts as empty for this type.
    fn from_field(value: &Value) -> Result<Option<Self>, FieldError>;
}

/// Name of the JSON type of `value`, for warnings.
fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "number (float)",
        Value::Number(_) => "number (integer)",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn mismatch(expected: &'static str, value: &Value) -> FieldError {
    FieldError::TypeMismatch {
        expected,
        found: json_type_name(value),
    }
}

/// `null`, `[]` and `{}` never overwrite a field.
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

impl FromField for bool {
    fn from_field(value: &Value) -> Result<Option<Self>, FieldError> {
        value
            .as_bool()
            .map(Some)
            .ok_or_else(|| mismatch("boolean", value))
    }
}

/// Numeric fields also take booleans (`true` is 1).
impl FromField for i32 {
    fn from_field(value: &Value) -> Result<Option<Self>, FieldError> {
        let number = match value {
            Value::Bool(flag) => return Ok(Some(i32::from(*flag))),
            Value::Number(number) => number,
            other => return Err(mismatch("integer", other)),
        };
        let out_of_range = || FieldError::OutOfRange {
            expected: "32-bit integer",
            value: number.to_string(),
        };
        if let Some(int) = number.as_i64() {
            return i32::try_from(int).map(Some).map_err(|_| out_of_range());
        }
        if number.is_u64() {
            return Err(out_of_range());
        }
        // Floats truncate toward zero.
        match number.as_f64().map(f64::trunc) {
            Some(float)
                if float.is_finite()
                    && float >= f64::from(i32::MIN)
                    && float <= f64::from(i32::MAX) =>
            {
                Ok(Some(float as i32))
            }
            _ => Err(out_of_range()),
        }
    }
}

impl FromField for f32 {
    fn from_field(value: &Value) -> Result<Option<Self>, FieldError> {
        match value {
            Value::Bool(flag) => Ok(Some(if *flag { 1.0 } else { 0.0 })),
            Value::Number(number) => number
                .as_f64()
                .map(|float| Some(float as f32))
                .ok_or_else(|| mismatch("number", value)),
            other => Err(mismatch("number", other)),
        }
    }
}

impl FromField for String {
    fn from_field(value: &Value) -> Result<Option<Self>, FieldError> {
        match value {
            Value::String(s) if s.is_empty() => Ok(None),
            Value::String(s) => Ok(Some(s.clone())),
            other => Err(mismatch("string", other)),
        }
    }
}

impl FromField for WideString {
    fn from_field(value: &Value) -> Result<Option<Self>, FieldError> {
        Ok(String::from_field(value)?.map(|narrow| WideString::from_narrow(&narrow)))
    }
}

impl<T: FromField> FromField for Option<T> {
    fn from_field(value: &Value) -> Result<Option<Self>, FieldError> {
        Ok(T::from_field(value)?.map(Some))
    }
}

/// Reads `key` from `object` as a `T`.
///
/// `Ok(None)` means "nothing to apply": the key is missing, blank, or
/// `object` is not an object at all.
///
/// # Errors
///
/// Returns [`FieldError`] when the value exists but cannot become a `T`.
pub fn try_get<T: FromField>(object: &Value, key: &str) -> Result<Option<T>, FieldError> {
    match object.get(key) {
        None => Ok(None),
        Some(value) if is_blank(value) => Ok(None),
        Some(value) => T::from_field(value),
    }
}

/// A typed destination that can be filled from a JSON object by key.
///
/// Blanket-implemented for every [`FromField`] type so option groups can
/// list heterogeneous fields in one table.
pub trait FieldSlot {
    /// Overwrites `self` if `object[key]` holds a usable value.
    ///
    /// Returns `Ok(true)` when the slot changed.
    fn fill_from(&mut self, object: &Value, key: &str) -> Result<bool, FieldError>;
}

impl<T: FromField> FieldSlot for T {
    fn fill_from(&mut self, object: &Value, key: &str) -> Result<bool, FieldError> {
        match try_get::<T>(object, key)? {
            Some(value) => {
                *self = value;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// One row of an option group's field table.
pub type FieldEntry<'a> = (&'static str, &'a mut dyn FieldSlot);

fn qualify(group: &str, key: &str) -> String {
    if group.is_empty() {
        key.to_string()
    } else {
        format!("{group}.{key}")
    }
}

/// Fills a single slot, logging and recording a warning on rejection.
pub fn extract(
    object: &Value,
    group: &str,
    key: &'static str,
    slot: &mut dyn FieldSlot,
    warnings: &mut Vec<FieldWarning>,
) {
    if let Err(error) = slot.fill_from(object, key) {
        let key = qualify(group, key);
        warn!("err parsing \"{key}\"; {error}");
        warnings.push(FieldWarning { key, error });
    }
}

/// Fills every slot in `fields` from `object`.
///
/// `group` is only used to qualify keys in warnings; pass `""` for
/// top-level fields.
pub fn extract_group(
    object: &Value,
    group: &str,
    fields: &mut [FieldEntry<'_>],
    warnings: &mut Vec<FieldWarning>,
) {
    for (key, slot) in fields.iter_mut() {
        extract(object, group, *key, &mut **slot, warnings);
    }
}
