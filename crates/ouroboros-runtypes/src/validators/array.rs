//! Array runtype

use crate::descriptor::Descriptor;
use crate::errors::{Failure, FailureCode};
use crate::runtype::Runtype;
use crate::traversal::{traverse_members, Member};
use crate::value::Value;

/// Homogeneous array; failing elements are reported by index
pub fn array(element: Runtype) -> Runtype {
    let descriptor = Descriptor::Array {
        element: element.clone(),
    };
    Runtype::create(descriptor, move |x, traversal, this| {
        let Value::Array(items) = x else {
            let code = if x.is_nullish() {
                FailureCode::NullOrUndefined
            } else {
                FailureCode::TypeMismatch
            };
            return Err(Failure::new(
                code,
                format!("Expected {}, but was {}", this.show(), x.kind_name()),
            ));
        };
        let element = &element;
        traverse_members(
            traversal,
            x,
            || {
                items
                    .entries()
                    .into_iter()
                    .map(move |(k, v)| Member::new(k, v, element.clone()))
            },
            |_| Ok(()),
        )
    })
}
