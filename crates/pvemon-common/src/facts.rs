use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single harvested fact value.
///
/// Harvesters record whatever an external tool reported: free text, counts,
/// ratios, flags, or name listings. Absence is expressed by the key not
/// being present in [`Facts`] at all; there is no null variant, and the
/// distinction between "absent" and "zero/false/empty" is significant for
/// conditional report modules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FactValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    List(Vec<String>),
}

impl From<&str> for FactValue {
    fn from(value: &str) -> Self {
        FactValue::Str(value.to_string())
    }
}

impl From<String> for FactValue {
    fn from(value: String) -> Self {
        FactValue::Str(value)
    }
}

impl From<i64> for FactValue {
    fn from(value: i64) -> Self {
        FactValue::Int(value)
    }
}

impl From<f64> for FactValue {
    fn from(value: f64) -> Self {
        FactValue::Float(value)
    }
}

impl From<bool> for FactValue {
    fn from(value: bool) -> Self {
        FactValue::Bool(value)
    }
}

impl From<Vec<String>> for FactValue {
    fn from(value: Vec<String>) -> Self {
        FactValue::List(value)
    }
}

/// An ordered fact mapping produced by one harvester.
///
/// Keys are harvester-specific (`node.status`, `ceph.osd_up`, ...). Lookups
/// are default-valued: a missing key is never an error, downstream consumers
/// read through the `*_or` accessors and get a conservative default.
///
/// # Examples
///
/// ```
/// use pvemon_common::facts::Facts;
///
/// let mut facts = Facts::new();
/// facts.set("node.name", "pve1");
/// facts.set("vm.total", 3i64);
/// assert_eq!(facts.str_or("node.name", "unknown"), "pve1");
/// assert_eq!(facts.int_or("vm.running", 0), 0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Facts {
    inner: BTreeMap<String, FactValue>,
}

impl Facts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<FactValue>) {
        self.inner.insert(key.into(), value.into());
    }

    pub fn contains(&self, key: &str) -> bool {
        self.inner.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&FactValue> {
        self.inner.get(key)
    }

    /// String fact, or `default` when the key is absent or not a string.
    pub fn str_or(&self, key: &str, default: &str) -> String {
        match self.inner.get(key) {
            Some(FactValue::Str(s)) => s.clone(),
            _ => default.to_string(),
        }
    }

    /// Integer fact, or `default` when the key is absent or not an integer.
    pub fn int_or(&self, key: &str, default: i64) -> i64 {
        match self.inner.get(key) {
            Some(FactValue::Int(v)) => *v,
            _ => default,
        }
    }

    /// Numeric fact as a float; integer facts coerce. `None` when absent.
    pub fn float(&self, key: &str) -> Option<f64> {
        match self.inner.get(key) {
            Some(FactValue::Float(v)) => Some(*v),
            Some(FactValue::Int(v)) => Some(*v as f64),
            _ => None,
        }
    }

    /// Boolean fact, or `default` when the key is absent or not a boolean.
    pub fn bool_or(&self, key: &str, default: bool) -> bool {
        match self.inner.get(key) {
            Some(FactValue::Bool(v)) => *v,
            _ => default,
        }
    }

    /// List fact, or `None` when absent or not a list.
    pub fn list(&self, key: &str) -> Option<&[String]> {
        match self.inner.get(key) {
            Some(FactValue::List(items)) => Some(items),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FactValue)> {
        self.inner.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_yield_defaults() {
        let facts = Facts::new();
        assert_eq!(facts.str_or("node.name", "unknown"), "unknown");
        assert_eq!(facts.int_or("vm.total", 0), 0);
        assert!(!facts.bool_or("cluster.quorate", false));
        assert_eq!(facts.float("node.memory_used_percent"), None);
        assert!(facts.list("ceph.pools").is_none());
    }

    #[test]
    fn typed_lookups_ignore_mismatched_variants() {
        let mut facts = Facts::new();
        facts.set("vm.total", 5i64);
        assert_eq!(facts.str_or("vm.total", "fallback"), "fallback");
        assert!(!facts.bool_or("vm.total", false));
        // Integers coerce to float, nothing else does
        assert_eq!(facts.float("vm.total"), Some(5.0));
    }

    #[test]
    fn set_overwrites_existing_value() {
        let mut facts = Facts::new();
        facts.set("ceph.health", "UNKNOWN");
        facts.set("ceph.health", "HEALTH_OK");
        assert_eq!(facts.str_or("ceph.health", ""), "HEALTH_OK");
        assert_eq!(facts.len(), 1);
    }

    #[test]
    fn list_facts_preserve_order() {
        let mut facts = Facts::new();
        facts.set(
            "ceph.pools",
            vec!["rbd".to_string(), "cephfs_data".to_string()],
        );
        assert_eq!(
            facts.list("ceph.pools").unwrap(),
            &["rbd".to_string(), "cephfs_data".to_string()]
        );
    }
}
