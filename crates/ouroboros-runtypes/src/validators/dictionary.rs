//! Dictionary runtype
//!
//! A keyed collection of homogeneous values: `{ [_: string]: V }` or
//! `{ [_: number]: V }`.
//!
//! # Accepted containers
//!
//! | Input                      | `KeyKind::String`       | `KeyKind::Number`        |
//! |----------------------------|-------------------------|--------------------------|
//! | plain object               | members checked         | keys must be numeric     |
//! | array                      | rejected                | members checked by index |
//! | object, other prototype    | rejected                | rejected                 |
//! | `null` / `undefined`       | rejected                | rejected                 |
//! | any other primitive        | rejected                | rejected                 |

use crate::descriptor::{Descriptor, KeyKind};
use crate::errors::{Failure, FailureCode, ValidationResult};
use crate::keys::is_numeric_key;
use crate::runtype::Runtype;
use crate::traversal::{traverse_members, Member, Traversal};
use crate::value::Value;

/// Dictionary with string keys
pub fn string_dictionary(value: Runtype) -> Runtype {
    dictionary(value, KeyKind::String)
}

/// Dictionary with numeric keys (arrays qualify)
pub fn number_dictionary(value: Runtype) -> Runtype {
    dictionary(value, KeyKind::Number)
}

/// Construct a runtype for arbitrary dictionaries
///
/// # Example
///
/// ```
/// use ouroboros_runtypes::{dictionary, number, KeyKind, Object, Value};
///
/// let scores = dictionary(number(), KeyKind::String);
/// let value = Value::Object(Object::from_entries([("ada", Value::from(3))]));
/// assert!(scores.guard(&value));
///
/// let bad = Value::Object(Object::from_entries([
///     ("ada", Value::from(3)),
///     ("bob", Value::from("three")),
/// ]));
/// let failure = scores.validate(&bad).unwrap_err();
/// assert_eq!(failure.key.as_deref(), Some("bob"));
/// ```
pub fn dictionary(value: Runtype, key: KeyKind) -> Runtype {
    let descriptor = Descriptor::Dictionary {
        key,
        value: value.clone(),
    };
    Runtype::create(descriptor, move |x, traversal, this| {
        validate_dictionary(x, traversal, this, &value, key)
    })
}

fn validate_dictionary(
    x: &Value,
    traversal: &mut Traversal,
    this: &Runtype,
    value: &Runtype,
    key: KeyKind,
) -> ValidationResult<Value> {
    match x {
        Value::Undefined | Value::Null => {
            return Err(Failure::new(
                FailureCode::NullOrUndefined,
                format!("Expected {}, but was {}", this.show(), x),
            ));
        }
        Value::Object(object) => {
            if !object.prototype().is_plain() {
                return Err(Failure::new(
                    FailureCode::WrongPrototype,
                    format!("Expected {}, but was {}", this.show(), object.prototype()),
                ));
            }
        }
        Value::Array(_) => {
            if key == KeyKind::String {
                return Err(Failure::new(
                    FailureCode::ArrayRejectedAsStringDictionary,
                    "Expected dictionary, but was array",
                ));
            }
        }
        primitive => {
            return Err(Failure::new(
                FailureCode::WrongPrimitiveKind,
                format!("Expected {}, but was {}", this.show(), primitive.type_of()),
            ));
        }
    }

    traverse_members(
        traversal,
        x,
        || entries_of(x).into_iter().map(move |(k, v)| Member::new(k, v, value.clone())),
        |k| check_key(k, key),
    )
}

/// Own entries of an object or array value
fn entries_of(container: &Value) -> Vec<(String, Value)> {
    match container {
        Value::Object(object) => object.entries(),
        Value::Array(array) => array.entries(),
        _ => Vec::new(),
    }
}

fn check_key(k: &str, key: KeyKind) -> ValidationResult<()> {
    if key == KeyKind::Number && !is_numeric_key(k) {
        return Err(Failure::new(
            FailureCode::NonNumericKey,
            "Expected dictionary key to be a number, but was string",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validators::{number, string, unknown};
    use crate::value::{Array, Object, Prototype};

    fn object(entries: Vec<(&str, Value)>) -> Value {
        Value::Object(Object::from_entries(entries))
    }

    #[test]
    fn test_descriptor() {
        let runtype = number_dictionary(string());
        assert_eq!(
            runtype.reflect(),
            &Descriptor::Dictionary {
                key: KeyKind::Number,
                value: string(),
            }
        );
    }

    #[test]
    fn test_nullish_rejected() {
        let runtype = string_dictionary(number());
        let failure = runtype.validate(&Value::Null).unwrap_err();
        assert_eq!(failure.code, FailureCode::NullOrUndefined);
        assert_eq!(failure.message, "Expected { [_: string]: number }, but was null");

        let failure = runtype.validate(&Value::Undefined).unwrap_err();
        assert_eq!(failure.message, "Expected { [_: string]: number }, but was undefined");
    }

    #[test]
    fn test_primitive_rejected_with_typeof() {
        let runtype = string_dictionary(number());
        for (input, kind) in [
            (Value::from(1), "number"),
            (Value::from("s"), "string"),
            (Value::from(true), "boolean"),
            (Value::Function("f".into()), "function"),
        ] {
            let failure = runtype.validate(&input).unwrap_err();
            assert_eq!(failure.code, FailureCode::WrongPrimitiveKind);
            assert!(failure.message.ends_with(kind), "{}", failure.message);
        }
    }

    #[test]
    fn test_wrong_prototype() {
        let runtype = string_dictionary(unknown());
        let date = Value::Object(Object::with_prototype(Prototype::class("Date")));
        let failure = runtype.validate(&date).unwrap_err();
        assert_eq!(failure.code, FailureCode::WrongPrototype);
        assert_eq!(failure.message, "Expected { [_: string]: unknown }, but was Date");

        let bare = Value::Object(Object::with_prototype(Prototype::Null));
        let failure = number_dictionary(unknown()).validate(&bare).unwrap_err();
        assert_eq!(failure.message, "Expected { [_: number]: unknown }, but was null");
    }

    #[test]
    fn test_array_depends_on_key_kind() {
        let numbers = Value::Array(Array::from_values([1, 2, 3].map(Value::from)));
        let failure = string_dictionary(number()).validate(&numbers).unwrap_err();
        assert_eq!(failure.code, FailureCode::ArrayRejectedAsStringDictionary);
        assert_eq!(failure.message, "Expected dictionary, but was array");

        assert!(number_dictionary(number()).guard(&numbers));
        let mixed = Value::Array(Array::from_values([Value::from(1), Value::from("x")]));
        let failure = number_dictionary(number()).validate(&mixed).unwrap_err();
        assert_eq!(failure.key.as_deref(), Some("1"));
    }

    #[test]
    fn test_numeric_keys() {
        let runtype = number_dictionary(number());
        let failure = runtype.validate(&object(vec![("a", Value::from(1))])).unwrap_err();
        assert_eq!(failure.code, FailureCode::NonNumericKey);
        assert_eq!(failure.message, "Expected dictionary key to be a number, but was string");
        assert_eq!(failure.key, None);

        assert!(runtype.guard(&object(vec![("2", Value::from(1))])));
        assert!(runtype.guard(&object(vec![("-1.5", Value::from(1))])));
    }

    #[test]
    fn test_string_keys_accept_anything() {
        let runtype = string_dictionary(number());
        assert!(runtype.guard(&object(vec![("2", Value::from(1)), ("a", Value::from(2))])));
        assert!(runtype.guard(&object(vec![])));
    }

    #[test]
    fn test_nested_path() {
        let runtype = string_dictionary(string_dictionary(number()));
        let input = object(vec![("x", object(vec![("y", Value::from("oops"))]))]);
        let failure = runtype.validate(&input).unwrap_err();
        assert_eq!(failure.key.as_deref(), Some("x.y"));
        assert_eq!(failure.message, "Expected number, but was string");
        assert_eq!(failure.code, FailureCode::TypeMismatch);
    }

    #[test]
    fn test_first_failure_in_enumeration_order() {
        let runtype = string_dictionary(number());
        let input = object(vec![("b", Value::from("x")), ("1", Value::from("y"))]);
        let failure = runtype.validate(&input).unwrap_err();
        assert_eq!(failure.key.as_deref(), Some("1"));
    }

    #[test]
    fn test_returns_input_identity() {
        let inner = Object::from_entries([("n", Value::from(1))]);
        let value = Value::Object(inner.clone());
        let validated = string_dictionary(number()).validate(&value).unwrap();
        assert_eq!(validated, value);
        assert!(validated.same_identity(&Value::Object(inner)));
    }
}
