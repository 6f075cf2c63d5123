//! Runtype factory and runtime
//!
//! A [`Runtype`] binds a [`Descriptor`] to a check function. Every concrete
//! validator in this crate is built through [`Runtype::create`] and exposes
//! the same surface: `validate`, `validate_with`, `guard`, `check`, `reflect`.

use crate::config::TraversalConfig;
use crate::descriptor::Descriptor;
use crate::errors::{ValidationError, ValidationResult};
use crate::show;
use crate::traversal::Traversal;
use crate::value::Value;
use std::fmt;
use std::sync::Arc;

/// Signature of a check function
///
/// Receives the value, the traversal state of the enclosing call, and the
/// runtype being applied (for rendering its own shape in messages).
pub type CheckFn = dyn Fn(&Value, &mut Traversal, &Runtype) -> ValidationResult<Value> + Send + Sync;

struct RuntypeInner {
    descriptor: Descriptor,
    check: Box<CheckFn>,
}

/// Immutable, shareable validator
///
/// Cloning is cheap (a reference count). A runtype carries no mutable state,
/// so one instance can validate any number of values, on any thread.
#[derive(Clone)]
pub struct Runtype(Arc<RuntypeInner>);

impl Runtype {
    /// Bind a descriptor to a check function
    ///
    /// # Example
    ///
    /// ```
    /// use ouroboros_runtypes::{Descriptor, Failure, FailureCode, Runtype, Value};
    ///
    /// let even = Runtype::create(Descriptor::Number, |value, _, _| match value {
    ///     Value::Number(n) if n % 2.0 == 0.0 => Ok(value.clone()),
    ///     other => Err(Failure::new(
    ///         FailureCode::TypeMismatch,
    ///         format!("Expected an even number, but was {}", other),
    ///     )),
    /// });
    /// assert!(even.guard(&Value::from(4)));
    /// assert!(!even.guard(&Value::from(3)));
    /// ```
    pub fn create<F>(descriptor: Descriptor, check: F) -> Self
    where
        F: Fn(&Value, &mut Traversal, &Runtype) -> ValidationResult<Value> + Send + Sync + 'static,
    {
        Self(Arc::new(RuntypeInner {
            descriptor,
            check: Box::new(check),
        }))
    }

    /// Validate a value with fresh traversal state
    ///
    /// On success the returned value is the input handle itself.
    pub fn validate(&self, value: &Value) -> ValidationResult<Value> {
        self.validate_with_config(value, TraversalConfig::default())
    }

    /// Validate a value with fresh traversal state and a custom config
    pub fn validate_with_config(&self, value: &Value, config: TraversalConfig) -> ValidationResult<Value> {
        let mut traversal = Traversal::with_config(config);
        let result = self.validate_with(value, &mut traversal);
        if let Err(failure) = &result {
            tracing::debug!(
                tag = self.tag(),
                code = %failure.code,
                key = failure.key.as_deref().unwrap_or(""),
                "validation failed"
            );
        }
        result
    }

    /// Validate a nested value, continuing an in-progress traversal
    ///
    /// Composite runtypes must call this (never [`Runtype::validate`]) for
    /// their members so that cycles are detected across the whole tree.
    pub fn validate_with(&self, value: &Value, traversal: &mut Traversal) -> ValidationResult<Value> {
        (self.0.check)(value, traversal, self)
    }

    /// Whether the value conforms
    pub fn guard(&self, value: &Value) -> bool {
        self.validate(value).is_ok()
    }

    /// Validate, converting a failure into an error for `?` propagation
    pub fn check(&self, value: &Value) -> Result<Value, ValidationError> {
        self.validate(value).map_err(ValidationError::from)
    }

    /// Reflected shape (lazy runtypes are resolved)
    pub fn reflect(&self) -> &Descriptor {
        match &self.0.descriptor {
            Descriptor::Lazy(lazy) => lazy.force().reflect(),
            descriptor => descriptor,
        }
    }

    /// Descriptor as constructed, without resolving lazies
    pub fn descriptor(&self) -> &Descriptor {
        &self.0.descriptor
    }

    /// Kind tag of the reflected shape
    pub fn tag(&self) -> &'static str {
        self.reflect().tag()
    }

    /// Human-readable shape, e.g. `{ [_: string]: number }`
    pub fn show(&self) -> String {
        show::show(self)
    }

    /// Whether both handles are the same runtype instance
    pub fn ptr_eq(&self, other: &Runtype) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn id(&self) -> usize {
        Arc::as_ptr(&self.0) as *const () as usize
    }
}

impl PartialEq for Runtype {
    /// Same instance, or structurally equal descriptors (lazies by identity)
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || self.0.descriptor == other.0.descriptor
    }
}

impl fmt::Debug for Runtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Runtype").field(&self.show()).finish()
    }
}

impl fmt::Display for Runtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.show())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Runtype {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.descriptor.serialize(serializer)
    }
}
