//! Class-instance runtype

use crate::descriptor::Descriptor;
use crate::errors::{Failure, FailureCode};
use crate::runtype::Runtype;
use crate::value::{Prototype, Value};

/// Object whose prototype is `class`
pub fn instance_of(class: impl Into<String>) -> Runtype {
    let class = class.into();
    let descriptor = Descriptor::InstanceOf { class: class.clone() };
    Runtype::create(descriptor, move |x, _, this| match x {
        Value::Object(object) => match object.prototype() {
            Prototype::Class(name) if **name == *class => Ok(x.clone()),
            other => Err(Failure::new(
                FailureCode::WrongPrototype,
                format!("Expected {}, but was {}", this.show(), other),
            )),
        },
        other => Err(Failure::new(
            FailureCode::TypeMismatch,
            format!("Expected {}, but was {}", this.show(), other.kind_name()),
        )),
    })
}
