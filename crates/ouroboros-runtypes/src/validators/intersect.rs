//! Intersection runtype

use crate::descriptor::Descriptor;
use crate::errors::{Result, RuntypeError};
use crate::runtype::Runtype;
use crate::traversal::Scope;

/// Value matching every intersectee
///
/// Each intersectee runs in its own traversal scope: nodes entered by one
/// are not accepted as revisits by the next.
pub fn intersect(intersectees: impl IntoIterator<Item = Runtype>) -> Result<Runtype> {
    let intersectees: Vec<Runtype> = intersectees.into_iter().collect();
    if intersectees.is_empty() {
        return Err(RuntypeError::EmptyIntersection);
    }
    Ok(build_intersect(intersectees))
}

fn build_intersect(intersectees: Vec<Runtype>) -> Runtype {
    let descriptor = Descriptor::Intersect {
        intersectees: intersectees.clone(),
    };
    Runtype::create(descriptor, move |x, traversal, this| {
        for (branch, intersectee) in intersectees.iter().enumerate() {
            let outer = traversal.enter_scope(Scope::branch(this, branch));
            let result = intersectee.validate_with(x, traversal);
            traversal.restore_scope(outer);
            result?;
        }
        Ok(x.clone())
    })
}

impl Runtype {
    /// `self & other`
    pub fn and(&self, other: &Runtype) -> Runtype {
        build_intersect(vec![self.clone(), other.clone()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::FailureCode;
    use crate::validators::{number, record, string, string_dictionary, unknown};
    use crate::value::{Object, Value};

    #[test]
    fn test_empty_intersection_rejected() {
        assert_eq!(intersect(Vec::new()).unwrap_err(), RuntypeError::EmptyIntersection);
    }

    #[test]
    fn test_all_must_match() {
        let named = record([("name", string())]).unwrap();
        let aged = record([("age", number())]).unwrap();
        let both = named.and(&aged);

        let ada = Object::from_entries([("name", Value::from("Ada")), ("age", Value::from(36))]);
        assert!(both.guard(&Value::Object(ada)));

        let nameless = Object::from_entries([("age", Value::from(36))]);
        let failure = both.validate(&Value::Object(nameless)).unwrap_err();
        assert_eq!(failure.key.as_deref(), Some("name"));
    }

    #[test]
    fn test_second_intersectee_checks_visited_node() {
        let loose = string_dictionary(unknown());
        let strict = string_dictionary(number());
        let both = intersect([loose, strict]).unwrap();

        let object = Object::from_entries([("a", Value::from("text"))]);
        let failure = both.validate(&Value::Object(object)).unwrap_err();
        assert_eq!(failure.code, FailureCode::TypeMismatch);
        assert_eq!(failure.key.as_deref(), Some("a"));
    }

    #[test]
    fn test_restores_scope() {
        let both = string_dictionary(unknown()).and(&string_dictionary(unknown()));
        let object = Object::new();
        let mut traversal = crate::traversal::Traversal::new();
        both.validate_with(&Value::Object(object.clone()), &mut traversal).unwrap();
        assert_eq!(traversal.scope(), Scope::default());
        assert!(!traversal.is_visited(object.id()));
        assert_eq!(traversal.visited_count(), 2);
    }
}
