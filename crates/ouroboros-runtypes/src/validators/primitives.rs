//! Primitive runtypes
//!
//! These are leaves: they never touch the traversal state.

use crate::descriptor::Descriptor;
use crate::errors::{Failure, FailureCode};
use crate::runtype::Runtype;
use crate::value::Value;

/// Build a runtype accepting values whose kind passes `accepts`
fn primitive(descriptor: Descriptor, accepts: fn(&Value) -> bool) -> Runtype {
    Runtype::create(descriptor, move |value, _, this| {
        if accepts(value) {
            Ok(value.clone())
        } else {
            Err(Failure::new(
                FailureCode::TypeMismatch,
                format!("Expected {}, but was {}", this.tag(), value.kind_name()),
            ))
        }
    })
}

/// Accepts any value
pub fn unknown() -> Runtype {
    Runtype::create(Descriptor::Unknown, |value, _, _| Ok(value.clone()))
}

/// Accepts no value
pub fn never() -> Runtype {
    Runtype::create(Descriptor::Never, |value, _, _| {
        Err(Failure::new(
            FailureCode::Never,
            format!("Expected nothing, but was {}", value),
        ))
    })
}

pub fn boolean() -> Runtype {
    primitive(Descriptor::Boolean, |v| matches!(v, Value::Boolean(_)))
}

pub fn number() -> Runtype {
    primitive(Descriptor::Number, |v| matches!(v, Value::Number(_)))
}

pub fn string() -> Runtype {
    primitive(Descriptor::String, |v| matches!(v, Value::String(_)))
}

pub fn function() -> Runtype {
    primitive(Descriptor::Function, |v| matches!(v, Value::Function(_)))
}
