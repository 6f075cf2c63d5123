//! Literal runtypes

use crate::descriptor::{Descriptor, LiteralValue};
use crate::errors::{Failure, FailureCode};
use crate::runtype::Runtype;

/// Accepts exactly one primitive value
///
/// # Example
/// ```
/// use ouroboros_runtypes::{literal, Value};
///
/// let admin = literal("admin");
/// assert!(admin.guard(&Value::from("admin")));
/// assert!(!admin.guard(&Value::from("user")));
/// ```
pub fn literal(value: impl Into<LiteralValue>) -> Runtype {
    let expected = value.into();
    Runtype::create(Descriptor::Literal(expected.clone()), move |value, _, _| {
        if expected.matches(value) {
            Ok(value.clone())
        } else {
            Err(Failure::new(
                FailureCode::LiteralMismatch,
                format!("Expected literal '{}', but was '{}'", expected, value),
            ))
        }
    })
}

/// Accepts only `undefined`
pub fn undefined() -> Runtype {
    literal(LiteralValue::Undefined)
}

/// Accepts only `null`
pub fn null() -> Runtype {
    literal(LiteralValue::Null)
}
