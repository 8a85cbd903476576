//! The atomic unit of the report: a named, typed, optionally
//! threshold-annotated value the monitoring server turns into a metric.

use std::fmt;

/// Module type vocabulary understood by the monitoring server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleType {
    /// Numeric gauge.
    GenericData,
    /// String gauge.
    GenericDataString,
    /// Boolean/process-state gauge (0/1).
    GenericProc,
}

impl ModuleType {
    pub fn as_str(self) -> &'static str {
        match self {
            ModuleType::GenericData => "generic_data",
            ModuleType::GenericDataString => "generic_data_string",
            ModuleType::GenericProc => "generic_proc",
        }
    }
}

impl fmt::Display for ModuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A module's reported value.
///
/// Numeric and text values render differently and determine which threshold
/// kind the module may carry: numeric thresholds go with numeric values,
/// string patterns with text values, never both.
#[derive(Debug, Clone, PartialEq)]
pub enum ModuleValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl ModuleValue {
    /// Renders the value the way the monitoring server expects: integers
    /// bare, floats rounded to two decimals with trailing zeros trimmed but
    /// at least one decimal digit kept (`50.0`, `33.33`).
    pub fn render(&self) -> String {
        match self {
            ModuleValue::Int(v) => v.to_string(),
            ModuleValue::Float(v) => format_float(*v),
            ModuleValue::Text(s) => s.clone(),
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, ModuleValue::Int(_) | ModuleValue::Float(_))
    }
}

impl From<i64> for ModuleValue {
    fn from(value: i64) -> Self {
        ModuleValue::Int(value)
    }
}

impl From<f64> for ModuleValue {
    fn from(value: f64) -> Self {
        ModuleValue::Float(value)
    }
}

impl From<&str> for ModuleValue {
    fn from(value: &str) -> Self {
        ModuleValue::Text(value.to_string())
    }
}

impl From<String> for ModuleValue {
    fn from(value: String) -> Self {
        ModuleValue::Text(value)
    }
}

pub(crate) fn format_float(value: f64) -> String {
    let mut rendered = format!("{value:.2}");
    while rendered.ends_with('0') && !rendered.ends_with(".0") {
        rendered.pop();
    }
    rendered
}

/// One report entry.
///
/// Threshold fields are `Option`s because explicit absence, not zero,
/// suppresses the corresponding tag in the serialized output.
#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    pub name: String,
    pub module_type: ModuleType,
    pub description: String,
    pub value: ModuleValue,
    pub group: Option<String>,
    pub min_warning: Option<f64>,
    pub max_warning: Option<f64>,
    pub min_critical: Option<f64>,
    pub max_critical: Option<f64>,
    pub str_warning: Option<String>,
    pub str_critical: Option<String>,
}

impl Module {
    pub fn new(
        name: impl Into<String>,
        module_type: ModuleType,
        description: impl Into<String>,
        value: impl Into<ModuleValue>,
    ) -> Self {
        Self {
            name: name.into(),
            module_type,
            description: description.into(),
            value: value.into(),
            group: None,
            min_warning: None,
            max_warning: None,
            min_critical: None,
            max_critical: None,
            str_warning: None,
            str_critical: None,
        }
    }

    pub fn group(mut self, group: &str) -> Self {
        self.group = Some(group.to_string());
        self
    }

    pub fn min_warning(mut self, value: f64) -> Self {
        self.min_warning = Some(value);
        self
    }

    pub fn max_warning(mut self, value: f64) -> Self {
        self.max_warning = Some(value);
        self
    }

    pub fn min_critical(mut self, value: f64) -> Self {
        self.min_critical = Some(value);
        self
    }

    pub fn max_critical(mut self, value: f64) -> Self {
        self.max_critical = Some(value);
        self
    }

    /// Sets both string-match thresholds. Only meaningful on text values.
    pub fn str_thresholds(mut self, warning: &str, critical: &str) -> Self {
        self.str_warning = Some(warning.to_string());
        self.str_critical = Some(critical.to_string());
        self
    }
}
