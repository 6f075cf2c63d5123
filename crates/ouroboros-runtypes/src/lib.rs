//! Ouroboros Runtypes
//!
//! Composable runtime validators for dynamically-typed values.
//!
//! A [`Runtype`] checks that a [`Value`] has a given shape and returns the
//! value itself on success, or a [`Failure`] carrying a code, a message and
//! the dotted path to the offending member.
//!
//! Composite runtypes (dictionaries, arrays, tuples, records) thread one
//! [`Traversal`] through the whole check, so values containing reference
//! cycles validate in finite time.
//!
//! # Features
//!
//! - **Default** (`serde`): `serde_json::Value` conversion and `Serialize`
//!   for descriptors and failures
//!
//! # Example
//!
//! ```rust
//! use ouroboros_runtypes::{number, string_dictionary, Object, Value};
//!
//! let scores = string_dictionary(number());
//!
//! let object = Object::from_entries([("ada", Value::from(3))]);
//! assert!(scores.guard(&Value::Object(object.clone())));
//!
//! // A dictionary containing itself still terminates
//! let tree = string_dictionary(ouroboros_runtypes::unknown());
//! object.set("self", Value::Object(object.clone()));
//! assert!(tree.guard(&Value::Object(object.clone())));
//! object.clear();
//! ```

// Public modules
pub mod config;
pub mod descriptor;
pub mod errors;
pub mod keys;
pub mod runtype;
pub mod show;
pub mod traversal;
pub mod validators;
pub mod value;

// Re-export commonly used types
pub use config::TraversalConfig;
pub use descriptor::{Descriptor, KeyKind, LiteralValue};
pub use errors::{Failure, FailureCode, RuntypeError, ValidationError, ValidationResult};
pub use runtype::{CheckFn, Runtype};
pub use traversal::{traverse_members, Member, Scope, Traversal, Visit};
pub use validators::*;
pub use value::{Array, NodeId, Object, Prototype, Value};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
