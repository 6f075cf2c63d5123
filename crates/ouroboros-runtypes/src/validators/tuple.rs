//! Tuple runtype

use crate::descriptor::Descriptor;
use crate::errors::{Failure, FailureCode};
use crate::runtype::Runtype;
use crate::traversal::{traverse_members, Member};
use crate::value::Value;

/// Fixed-length array with one runtype per position
pub fn tuple(components: impl IntoIterator<Item = Runtype>) -> Runtype {
    let components: Vec<Runtype> = components.into_iter().collect();
    let descriptor = Descriptor::Tuple {
        components: components.clone(),
    };
    Runtype::create(descriptor, move |x, traversal, _| {
        let Value::Array(items) = x else {
            return Err(Failure::new(
                FailureCode::TypeMismatch,
                format!("Expected tuple to be an array, but was {}", x.kind_name()),
            ));
        };
        let values = items.values();
        if values.len() != components.len() {
            return Err(Failure::new(
                FailureCode::LengthMismatch,
                format!(
                    "Expected an array of length {}, but was {}",
                    components.len(),
                    values.len()
                ),
            ));
        }
        let components = &components;
        traverse_members(
            traversal,
            x,
            move || {
                values
                    .into_iter()
                    .zip(components.iter())
                    .enumerate()
                    .map(|(i, (v, c))| Member::new(i.to_string(), v, c.clone()))
            },
            |_| Ok(()),
        )
    })
}
