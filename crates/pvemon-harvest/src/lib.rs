//! Fact harvesting for the pvemon node agent.
//!
//! Each harvester module queries one category of node state through the
//! [`CommandRunner`] shim and returns a [`pvemon_common::facts::Facts`]
//! mapping. Harvesters absorb malformed output locally: a failed sub-query
//! degrades only its own facts and never aborts the pass.

pub mod ceph;
pub mod node;
pub mod services;
pub mod shim;
pub mod storage;


pub use shim::{CommandRunner, ShellRunner};

/// Rounds to two decimal places, matching how the report presents ratios.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Truthiness of a loosely-typed JSON field.
///
/// `pvesh` reports flags inconsistently across versions: booleans, 0/1
/// integers, sometimes strings. Empty containers and null are false,
/// everything non-empty/non-zero is true.
pub(crate) fn truthy(value: &serde_json::Value) -> bool {
    use serde_json::Value;
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}
