//! Deferred runtypes for recursive shapes
//!
//! A recursive shape refers to itself before it exists. Wrap the self
//! reference in [`lazy`]; the thunk runs once, on first use. Holding the
//! outer runtype in a `static` makes the recursion share one instance:
//!
//! ```
//! use once_cell::sync::Lazy;
//! use ouroboros_runtypes::{lazy, string_dictionary, Object, Runtype, Value};
//!
//! static TREE: Lazy<Runtype> = Lazy::new(|| string_dictionary(lazy(|| TREE.clone())));
//!
//! let leaf = Object::new();
//! let root = Object::from_entries([("leaf", Value::Object(leaf))]);
//! assert!(TREE.guard(&Value::Object(root)));
//! ```

use crate::descriptor::Descriptor;
use crate::runtype::Runtype;
use once_cell::sync::OnceCell;
use std::fmt;
use std::sync::Arc;

type Thunk = Box<dyn Fn() -> Runtype + Send + Sync>;

struct LazyCell {
    resolved: OnceCell<Runtype>,
    thunk: Thunk,
}

/// Handle to a deferred runtype
///
/// Compares by identity: two lazies are equal only if they are the same
/// handle.
#[derive(Clone)]
pub struct LazyRuntype(Arc<LazyCell>);

impl LazyRuntype {
    /// Resolve (once) and return the underlying runtype
    pub fn force(&self) -> &Runtype {
        self.0.resolved.get_or_init(|| (self.0.thunk)())
    }

    /// Whether the thunk has run
    pub fn is_resolved(&self) -> bool {
        self.0.resolved.get().is_some()
    }
}

impl PartialEq for LazyRuntype {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for LazyRuntype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyRuntype")
            .field("resolved", &self.is_resolved())
            .finish()
    }
}

/// Defer construction of a runtype until it is first used
pub fn lazy<F>(thunk: F) -> Runtype
where
    F: Fn() -> Runtype + Send + Sync + 'static,
{
    let handle = LazyRuntype(Arc::new(LazyCell {
        resolved: OnceCell::new(),
        thunk: Box::new(thunk),
    }));
    let target = handle.clone();
    Runtype::create(Descriptor::Lazy(handle), move |value, traversal, _| {
        target.force().validate_with(value, traversal)
    })
}
