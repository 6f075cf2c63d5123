//! Record runtypes
//!
//! A record checks a fixed set of named fields and ignores any others.
//! Objects of any prototype (and arrays) qualify; a missing field reads as
//! `undefined`, which [`partial`] records accept.

use crate::descriptor::Descriptor;
use crate::errors::{Failure, FailureCode, Result, RuntypeError};
use crate::runtype::Runtype;
use crate::traversal::{traverse_members, Member};
use crate::value::Value;
use std::collections::HashSet;

/// Object with required fields
///
/// # Example
/// ```
/// use ouroboros_runtypes::{number, record, string, Object, Value};
///
/// let person = record([("name", string()), ("age", number())]).unwrap();
/// let ada = Object::from_entries([("name", Value::from("Ada")), ("age", Value::from(36))]);
/// assert!(person.guard(&Value::Object(ada)));
/// ```
pub fn record<K, I>(fields: I) -> Result<Runtype>
where
    K: Into<String>,
    I: IntoIterator<Item = (K, Runtype)>,
{
    build_record(fields, false)
}

/// Object whose declared fields may be absent or `undefined`
pub fn partial<K, I>(fields: I) -> Result<Runtype>
where
    K: Into<String>,
    I: IntoIterator<Item = (K, Runtype)>,
{
    build_record(fields, true)
}

fn build_record<K, I>(fields: I, partial: bool) -> Result<Runtype>
where
    K: Into<String>,
    I: IntoIterator<Item = (K, Runtype)>,
{
    let fields: Vec<(String, Runtype)> = fields.into_iter().map(|(k, v)| (k.into(), v)).collect();
    let mut seen = HashSet::new();
    for (name, _) in &fields {
        if !seen.insert(name.as_str()) {
            return Err(RuntypeError::DuplicateField(name.clone()));
        }
    }

    let descriptor = Descriptor::Record {
        fields: fields.clone(),
        partial,
    };
    Ok(Runtype::create(descriptor, move |x, traversal, this| {
        match x {
            Value::Object(_) | Value::Array(_) => {}
            Value::Undefined | Value::Null => {
                return Err(Failure::new(
                    FailureCode::NullOrUndefined,
                    format!("Expected {}, but was {}", this.show(), x),
                ));
            }
            other => {
                return Err(Failure::new(
                    FailureCode::TypeMismatch,
                    format!("Expected {}, but was {}", this.show(), other.kind_name()),
                ));
            }
        }
        let fields = &fields;
        traverse_members(
            traversal,
            x,
            move || {
                fields.iter().filter_map(move |(name, runtype)| {
                    let value = x.property(name);
                    if partial && matches!(value, Value::Undefined) {
                        None
                    } else {
                        Some(Member::new(name.clone(), value, runtype.clone()))
                    }
                })
            },
            |_| Ok(()),
        )
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validators::{number, string};
    use crate::value::{Object, Prototype};

    fn person() -> Runtype {
        record([("name", string()), ("age", number())]).unwrap()
    }

    #[test]
    fn test_duplicate_field_rejected() {
        let result = record([("a", number()), ("a", string())]);
        assert_eq!(result.unwrap_err(), RuntypeError::DuplicateField("a".to_string()));
    }

    #[test]
    fn test_missing_field() {
        let input = Value::Object(Object::from_entries([("name", Value::from("Ada"))]));
        let failure = person().validate(&input).unwrap_err();
        assert_eq!(failure.key.as_deref(), Some("age"));
        assert_eq!(failure.message, "Expected number, but was undefined");
    }

    #[test]
    fn test_extra_fields_ignored() {
        let input = Value::Object(Object::from_entries([
            ("name", Value::from("Ada")),
            ("age", Value::from(36)),
            ("extra", Value::Null),
        ]));
        assert!(person().guard(&input));
    }

    #[test]
    fn test_class_instances_qualify() {
        let instance = Object::with_prototype(Prototype::class("Person"));
        instance.set("name", Value::from("Ada"));
        instance.set("age", Value::from(36));
        assert!(person().guard(&Value::Object(instance)));
    }

    #[test]
    fn test_partial_allows_missing() {
        let patch = partial([("name", string()), ("age", number())]).unwrap();
        assert!(patch.guard(&Value::Object(Object::new())));
        let input = Value::Object(Object::from_entries([("age", Value::from("old"))]));
        assert_eq!(patch.validate(&input).unwrap_err().key.as_deref(), Some("age"));
    }

    #[test]
    fn test_non_object() {
        let failure = person().validate(&Value::Null).unwrap_err();
        assert_eq!(failure.message, "Expected { name: string; age: number; }, but was null");
        let failure = person().validate(&Value::from(3)).unwrap_err();
        assert_eq!(failure.code, FailureCode::TypeMismatch);
    }
}
