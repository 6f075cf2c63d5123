//! End-to-end runtype tests

use once_cell::sync::Lazy;
use ouroboros_runtypes::*;
use serde_json::json;

static TREE: Lazy<Runtype> = Lazy::new(|| string_dictionary(lazy(|| TREE.clone())));

/// Every member is itself such a dictionary, under both intersectees
static BOTH: Lazy<Runtype> = Lazy::new(|| {
    intersect([
        string_dictionary(lazy(|| BOTH.clone())),
        string_dictionary(lazy(|| BOTH.clone())),
    ])
    .unwrap()
});

/// Linked list whose payload is either a number or a string
static NODE: Lazy<Runtype> = Lazy::new(|| {
    let next = lazy(|| NODE.clone()).or(&null());
    union([
        record([("next", next.clone()), ("v", number())]).unwrap(),
        record([("next", next), ("v", string())]).unwrap(),
    ])
    .unwrap()
});

/// Run `f` on a thread with room for a thousand nested containers
fn with_large_stack<F: FnOnce() + Send + 'static>(f: F) {
    std::thread::Builder::new()
        .stack_size(256 * 1024 * 1024)
        .spawn(f)
        .unwrap()
        .join()
        .unwrap();
}

/// Ring of `size` objects, each holding the next under `next`
fn ring(size: usize) -> Vec<Object> {
    let nodes: Vec<Object> = (0..size).map(|_| Object::new()).collect();
    for (i, node) in nodes.iter().enumerate() {
        node.set("next", Value::Object(nodes[(i + 1) % size].clone()));
    }
    nodes
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::TRACE)
        .try_init();
}

fn object(entries: Vec<(&str, Value)>) -> Value {
    Value::Object(Object::from_entries(entries))
}

// ============================================================================
// Dictionary Acceptance
// ============================================================================

#[test]
fn test_valid_object_returned_by_identity() {
    let runtype = string_dictionary(number());
    for input in [
        object(vec![]),
        object(vec![("a", Value::from(1))]),
        object(vec![("a", Value::from(1)), ("b", Value::from(2.5)), ("3", Value::from(-1))]),
    ] {
        let validated = runtype.validate(&input).unwrap();
        assert!(validated.same_identity(&input));
    }
}

#[test]
fn test_nullish_failures_mention_shape() {
    let runtype = string_dictionary(number());
    for input in [Value::Null, Value::Undefined] {
        let failure = runtype.validate(&input).unwrap_err();
        assert!(failure.message.contains("{ [_: string]: number }"), "{}", failure.message);
        assert_eq!(failure.key, None);
    }
}

#[test]
fn test_primitive_failures_mention_typeof() {
    let runtype = string_dictionary(number());
    for input in [Value::from(0), Value::from(""), Value::from(false)] {
        let failure = runtype.validate(&input).unwrap_err();
        assert!(failure.message.ends_with(input.type_of()), "{}", failure.message);
    }
}

#[test]
fn test_arrays_and_key_kind() {
    let empty = Value::Array(Array::new());
    let failure = string_dictionary(number()).validate(&empty).unwrap_err();
    assert_eq!(failure.message, "Expected dictionary, but was array");

    let numbers = Value::Array(Array::from_values([1, 2, 3].map(Value::from)));
    assert!(number_dictionary(number()).guard(&numbers));
}

#[test]
fn test_numeric_key_enforcement() {
    let runtype = number_dictionary(number());
    let failure = runtype.validate(&object(vec![("a", Value::from(1))])).unwrap_err();
    assert_eq!(failure.code, FailureCode::NonNumericKey);
    assert!(runtype.guard(&object(vec![("2", Value::from(1))])));
}

#[test]
fn test_nested_failure_path() {
    let runtype = string_dictionary(string_dictionary(number()));
    let input = object(vec![("x", object(vec![("y", Value::from("oops"))]))]);
    let failure = runtype.validate(&input).unwrap_err();
    assert_eq!(failure.key.as_deref(), Some("x.y"));
    assert_eq!(failure.to_string(), "Expected number, but was string in x.y");
}

// ============================================================================
// Cycles
// ============================================================================

#[test]
fn test_self_reference_terminates() {
    init_tracing();
    let a = Object::new();
    a.set("self", Value::Object(a.clone()));

    assert!(string_dictionary(unknown()).guard(&Value::Object(a.clone())));
    assert!(TREE.guard(&Value::Object(a.clone())));
    a.clear();
}

#[test]
fn test_mutual_cycle_with_bad_leaf() {
    let a = Object::new();
    let b = Object::new();
    a.set("b", Value::Object(b.clone()));
    b.set("a", Value::Object(a.clone()));
    b.set("leaf", Value::from(1));

    let failure = TREE.validate(&Value::Object(a.clone())).unwrap_err();
    assert_eq!(failure.key.as_deref(), Some("b.leaf"));
    assert_eq!(failure.code, FailureCode::WrongPrimitiveKind);

    a.clear();
    b.clear();
}

#[test]
fn test_idempotent_top_level_calls() {
    let a = Object::new();
    a.set("self", Value::Object(a.clone()));
    let value = Value::Object(a.clone());

    let first = TREE.validate(&value).unwrap();
    let second = TREE.validate(&value).unwrap();
    assert!(first.same_identity(&value));
    assert!(second.same_identity(&value));
    a.clear();
}

#[test]
fn test_depth_cap_fails_deep_values() {
    let mut value = object(vec![]);
    for _ in 0..10 {
        value = object(vec![("child", value)]);
    }
    assert!(TREE.validate(&value).is_ok());

    let failure = TREE
        .validate_with_config(&value, TraversalConfig::new().max_depth(5))
        .unwrap_err();
    assert_eq!(failure.code, FailureCode::DepthExceeded);
    assert_eq!(failure.key.as_deref(), Some("child.child.child.child.child"));
}

#[test]
fn test_diamond_shared_node_accepted_on_second_path() {
    let shared = Object::from_entries([("x", Value::from(1))]);
    let diamond = object(vec![
        ("a", Value::Object(shared.clone())),
        ("b", Value::Object(shared.clone())),
    ]);

    let mut traversal = Traversal::new();
    string_dictionary(string_dictionary(number()))
        .validate_with(&diamond, &mut traversal)
        .unwrap();
    assert_eq!(traversal.visited_count(), 2);

    // Keyed by node identity: the second path is accepted without checking
    // it against its own field runtype
    let mixed = record([
        ("a", string_dictionary(number())),
        ("b", string_dictionary(string())),
    ])
    .unwrap();
    assert!(mixed.guard(&diamond));
}

#[test]
fn test_failed_node_rechecked_by_next_alternative() {
    let inner = Object::from_entries([("a", Value::from("text"))]);
    let outer = object(vec![("inner", Value::Object(inner))]);

    let numbers = string_dictionary(string_dictionary(number()));
    let strings = string_dictionary(string_dictionary(string()));
    let booleans = string_dictionary(string_dictionary(boolean()));

    assert!(numbers.or(&strings).guard(&outer));
    let failure = numbers.or(&booleans).validate(&outer).unwrap_err();
    assert_eq!(failure.code, FailureCode::NoMatchingAlternative);
}

#[test]
fn test_long_ring_through_intersection() {
    with_large_stack(|| {
        let nodes = ring(1_000);
        assert!(BOTH.guard(&Value::Object(nodes[0].clone())));

        nodes[500].set("leaf", Value::from(1));
        let failure = BOTH.validate(&Value::Object(nodes[0].clone())).unwrap_err();
        assert_eq!(failure.code, FailureCode::WrongPrimitiveKind);
        assert!(failure.key.as_deref().is_some_and(|k| k.ends_with("next.leaf")));

        for node in &nodes {
            node.clear();
        }
    });
}

#[test]
fn test_long_chain_through_union() {
    with_large_stack(|| {
        let mut head = Value::Null;
        for i in 0..1_000 {
            head = object(vec![("next", head), ("v", Value::from(format!("n{}", i)))]);
        }
        assert!(NODE.guard(&head));

        let tail_of_numbers = (0..1_000).fold(Value::Null, |next, i| {
            object(vec![("next", next), ("v", Value::from(i))])
        });
        assert!(NODE.guard(&tail_of_numbers));

        let broken = object(vec![("next", head), ("v", Value::from(true))]);
        let failure = NODE.validate(&broken).unwrap_err();
        assert_eq!(failure.code, FailureCode::NoMatchingAlternative);
    });
}

// ============================================================================
// JSON Fixtures
// ============================================================================

#[test]
fn test_json_document() {
    let user = record([
        ("name", string()),
        ("tags", array(string())),
        ("scores", string_dictionary(number())),
        ("role", union([literal("admin"), literal("member")]).unwrap()),
    ])
    .unwrap();

    let valid: Value = json!({
        "name": "ada",
        "tags": ["math"],
        "scores": { "algebra": 10, "logic": 9.5 },
        "role": "admin"
    })
    .into();
    assert!(user.guard(&valid));

    let invalid: Value = json!({
        "name": "ada",
        "tags": ["math"],
        "scores": { "algebra": "ten" },
        "role": "admin"
    })
    .into();
    let failure = user.validate(&invalid).unwrap_err();
    assert_eq!(failure.key.as_deref(), Some("scores.algebra"));
}

#[test]
fn test_failure_serializes() {
    let failure = string_dictionary(number())
        .validate(&json!({ "x": null }).into())
        .unwrap_err();
    assert_eq!(
        serde_json::to_value(&failure).unwrap(),
        json!({
            "code": "type_mismatch",
            "message": "Expected number, but was null",
            "key": "x"
        })
    );
}

#[test]
fn test_descriptor_serializes() {
    let runtype = number_dictionary(string());
    let reflected = serde_json::to_value(&runtype).unwrap();
    assert_eq!(reflected["tag"], "dictionary");
    assert_eq!(reflected["key"], "number");
    assert_eq!(reflected["value"]["tag"], "string");
}

// ============================================================================
// Error Propagation
// ============================================================================

#[test]
fn test_check_propagates_with_question_mark() {
    fn load(value: &Value) -> Result<usize, ValidationError> {
        let checked = string_dictionary(number()).check(value)?;
        Ok(checked.as_object().map(Object::len).unwrap_or_default())
    }

    assert_eq!(load(&json!({ "a": 1, "b": 2 }).into()).unwrap(), 2);
    let error = load(&json!({ "a": "1" }).into()).unwrap_err();
    assert_eq!(error.failure.key.as_deref(), Some("a"));
    assert!(error.to_string().starts_with("validation failed"));
}
