//! Dictionary Validation Example
//!
//! Validates keyed collections, including values that contain themselves.
//!
//! Run with:
//! ```bash
//! cargo run -p ouroboros-runtypes --example dictionary_validation
//! ```

use once_cell::sync::Lazy;
use ouroboros_runtypes::{
    lazy, number, number_dictionary, string_dictionary, Array, Object, Runtype, ValidationResult,
    Value,
};

/// Dictionary of dictionaries, all the way down
static TREE: Lazy<Runtype> = Lazy::new(|| string_dictionary(lazy(|| TREE.clone())));

// ============================================================================
// Flat Dictionaries
// ============================================================================

fn validate_flat() {
    println!("1. Flat Dictionaries");
    println!("--------------------");

    let scores = string_dictionary(number());
    let valid = Value::Object(Object::from_entries([
        ("ada", Value::from(10)),
        ("grace", Value::from(9.5)),
    ]));
    println!("  {} on {{ada: 10, grace: 9.5}}: {}", scores, result_str(&scores.validate(&valid)));

    let invalid = Value::Object(Object::from_entries([("ada", Value::from("ten"))]));
    println!("  {} on {{ada: \"ten\"}}: {}", scores, result_str(&scores.validate(&invalid)));

    let list = Value::Array(Array::from_values([1, 2, 3].map(Value::from)));
    println!("  {} on [1, 2, 3]: {}", scores, result_str(&scores.validate(&list)));

    let by_index = number_dictionary(number());
    println!("  {} on [1, 2, 3]: {}", by_index, result_str(&by_index.validate(&list)));
    println!();
}

// ============================================================================
// Cyclic Values
// ============================================================================

fn validate_cycles() {
    println!("2. Cyclic Values");
    println!("----------------");

    let a = Object::new();
    let b = Object::new();
    a.set("b", Value::Object(b.clone()));
    b.set("a", Value::Object(a.clone()));
    println!("  a <-> b: {}", result_str(&TREE.validate(&Value::Object(a.clone()))));

    b.set("leaf", Value::from(1));
    println!("  a <-> b, b.leaf = 1: {}", result_str(&TREE.validate(&Value::Object(a.clone()))));

    // Break the cycle so both handles are freed
    a.clear();
    b.clear();
    println!();
}

// ============================================================================
// Helper Functions
// ============================================================================

fn result_str(result: &ValidationResult<Value>) -> String {
    match result {
        Ok(_) => "OK".to_string(),
        Err(failure) => format!("INVALID ({})", failure),
    }
}

// ============================================================================
// Main
// ============================================================================

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    println!("Dictionary Validation Example");
    println!("=============================\n");

    validate_flat();
    validate_cycles();
}
