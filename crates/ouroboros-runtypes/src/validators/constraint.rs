//! Refinements: constraints, predicates and brands

use crate::descriptor::Descriptor;
use crate::errors::{Failure, FailureCode};
use crate::runtype::Runtype;
use crate::value::Value;

impl Runtype {
    /// Refine with a check returning `Err(message)` on rejection
    ///
    /// # Example
    /// ```
    /// use ouroboros_runtypes::{number, Value};
    ///
    /// let positive = number().with_constraint(|v| match v.as_f64() {
    ///     Some(n) if n > 0.0 => Ok(()),
    ///     _ => Err("must be positive".to_string()),
    /// });
    /// assert!(positive.guard(&Value::from(1)));
    /// assert_eq!(positive.validate(&Value::from(-1)).unwrap_err().message, "must be positive");
    /// ```
    pub fn with_constraint<F>(&self, check: F) -> Runtype
    where
        F: Fn(&Value) -> Result<(), String> + Send + Sync + 'static,
    {
        self.constrained(None, move |v| check(v).map_err(Some))
    }

    /// Like [`Runtype::with_constraint`], rendered as `name` in messages
    pub fn with_named_constraint<F>(&self, name: impl Into<String>, check: F) -> Runtype
    where
        F: Fn(&Value) -> Result<(), String> + Send + Sync + 'static,
    {
        self.constrained(Some(name.into()), move |v| check(v).map_err(Some))
    }

    /// Refine with a boolean predicate and a generic failure message
    pub fn with_predicate<F>(&self, predicate: F) -> Runtype
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.constrained(None, move |v| if predicate(v) { Ok(()) } else { Err(None) })
    }

    /// Attach a nominal brand; validation is that of `self`
    pub fn with_brand(&self, brand: impl Into<String>) -> Runtype {
        let entity = self.clone();
        let descriptor = Descriptor::Brand {
            brand: brand.into(),
            entity: entity.clone(),
        };
        Runtype::create(descriptor, move |x, traversal, _| entity.validate_with(x, traversal))
    }

    fn constrained<F>(&self, name: Option<String>, check: F) -> Runtype
    where
        F: Fn(&Value) -> Result<(), Option<String>> + Send + Sync + 'static,
    {
        let underlying = self.clone();
        let descriptor = Descriptor::Constraint {
            underlying: underlying.clone(),
            name,
        };
        Runtype::create(descriptor, move |x, traversal, this| {
            let value = underlying.validate_with(x, traversal)?;
            check(&value).map_err(|message| {
                let message = message.unwrap_or_else(|| format!("Failed constraint check for {}", this.show()));
                Failure::new(FailureCode::ConstraintFailed, message)
            })?;
            Ok(value)
        })
    }
}
