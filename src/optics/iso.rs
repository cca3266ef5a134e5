//! Isomorphism constructors: lossless two-way conversions.

use crate::error::{OpticError, Result};
use crate::value::Value;

use super::optic::Optic;

/// An isomorphism that views states untouched but normalises every
/// value written through it. Best with an idempotent `normalise`, so
/// that writing a value twice is the same as writing it once.
///
/// ```
/// use refract::optics::normalising;
/// use refract::val;
/// use refract::value::Value;
///
/// let clamped = normalising(|value| {
///     Ok(val!(value.as_int().unwrap_or(0).clamp(0, 100)))
/// });
/// assert_eq!(clamped.view(&val!(7)).unwrap(), val!(7));
/// assert_eq!(clamped.set(&val!(7), val!(1000)).unwrap(), val!(100));
/// ```
pub fn normalising(
    normalise: impl Fn(Value) -> Result<Value> + Send + Sync + 'static,
) -> Optic {
    Optic::iso(Ok, normalise)
}

/// An isomorphism between byte strings and the text they encode as
/// UTF-8. Viewing decodes; setting encodes the replacement focus.
///
/// ```
/// use refract::optics::decode_utf8;
/// use refract::val;
/// use refract::value::Value;
///
/// let state = Value::new(b"hello".to_vec());
/// assert_eq!(decode_utf8().view(&state).unwrap(), val!("hello"));
/// assert_eq!(
///     decode_utf8().set(&state, val!("world")).unwrap(),
///     Value::new(b"world".to_vec()),
/// );
/// ```
#[must_use]
pub fn decode_utf8() -> Optic {
    Optic::iso(
        |state| {
            let bytes = state
                .downcast_ref::<Vec<u8>>()
                .ok_or(OpticError::TypeMismatch {
                    expected: "bytes",
                    found: state.type_name(),
                })?;
            let text = String::from_utf8(bytes.clone()).map_err(|error| {
                OpticError::Conversion(format!("invalid utf-8: {error}"))
            })?;
            Ok(Value::from(text))
        },
        |focus| {
            let text = focus.as_str().ok_or(OpticError::TypeMismatch {
                expected: "String",
                found: focus.type_name(),
            })?;
            Ok(Value::new(text.as_bytes().to_vec()))
        },
    )
}
