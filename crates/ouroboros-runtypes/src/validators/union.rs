//! Union runtype

use crate::descriptor::Descriptor;
use crate::errors::{Failure, FailureCode, Result, RuntypeError};
use crate::runtype::Runtype;

/// Value matching at least one alternative, tried in order
///
/// Containers rejected by one alternative are marked failed, so the next
/// alternative checks them again rather than accepting them as revisits.
pub fn union(alternatives: impl IntoIterator<Item = Runtype>) -> Result<Runtype> {
    let alternatives: Vec<Runtype> = alternatives.into_iter().collect();
    if alternatives.is_empty() {
        return Err(RuntypeError::EmptyUnion);
    }
    Ok(build_union(alternatives))
}

fn build_union(alternatives: Vec<Runtype>) -> Runtype {
    let descriptor = Descriptor::Union {
        alternatives: alternatives.clone(),
    };
    Runtype::create(descriptor, move |x, traversal, this| {
        for alternative in &alternatives {
            if let Ok(value) = alternative.validate_with(x, traversal) {
                return Ok(value);
            }
        }
        Err(Failure::new(
            FailureCode::NoMatchingAlternative,
            format!("Expected {}, but was {}", this.show(), x.kind_name()),
        ))
    })
}

impl Runtype {
    /// `self | other`
    pub fn or(&self, other: &Runtype) -> Runtype {
        build_union(vec![self.clone(), other.clone()])
    }
}
