use serde::{Deserialize, Serialize};
use serde_json::Value;

/// What happens to the original key once a reference resolves under a
/// different name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpliceMode {
    /// Remove the original key.
    #[default]
    Replace,
    /// Keep the original key next to the resolved one.
    Augment,
}

#[allow(clippy::should_implement_trait)]
impl SpliceMode {
    /// Returns the string representation of this mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            SpliceMode::Replace => "replace",
            SpliceMode::Augment => "augment",
        }
    }

    /// Parses a string into a `SpliceMode`, returning `None` for unrecognized values.
    pub fn from_str(s: &str) -> Option<SpliceMode> {
        match s {
            "replace" => Some(SpliceMode::Replace),
            "augment" => Some(SpliceMode::Augment),
            _ => None,
        }
    }
}

/// How a defect on one element of a reference list is handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PluralPolicy {
    /// Drop the element from the resolved list and keep going.
    #[default]
    Omit,
    /// Fail the whole resolve call.
    Abort,
}

#[allow(clippy::should_implement_trait)]
impl PluralPolicy {
    /// Returns the string representation of this policy.
    pub fn as_str(&self) -> &'static str {
        match self {
            PluralPolicy::Omit => "omit",
            PluralPolicy::Abort => "abort",
        }
    }

    /// Parses a string into a `PluralPolicy`, returning `None` for unrecognized values.
    pub fn from_str(s: &str) -> Option<PluralPolicy> {
        match s {
            "omit" => Some(PluralPolicy::Omit),
            "abort" => Some(PluralPolicy::Abort),
            _ => None,
        }
    }
}

/// Kinds of recoverable fetch anomalies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DefectKind {
    EmptyFetchResult,
    NonObjectFetchResult,
    MalformedFetchResult,
}

impl DefectKind {
    /// Returns the string representation of this defect kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            DefectKind::EmptyFetchResult => "empty_fetch_result",
            DefectKind::NonObjectFetchResult => "non_object_fetch_result",
            DefectKind::MalformedFetchResult => "malformed_fetch_result",
        }
    }
}

/// A per-reference resolution failure that does not abort the walk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Defect {
    pub kind: DefectKind,
    /// Entity name the classifier produced for the field.
    pub entity: String,
    /// Identifier that was fetched.
    pub id: String,
}

impl std::fmt::Display for Defect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            DefectKind::EmptyFetchResult => {
                write!(f, "fetched nothing for {} id '{}'", self.entity, self.id)
            }
            DefectKind::NonObjectFetchResult => {
                write!(f, "fetched a non-object for {} id '{}'", self.entity, self.id)
            }
            DefectKind::MalformedFetchResult => {
                write!(f, "fetched a malformed object for {} id '{}'", self.entity, self.id)
            }
        }
    }
}

impl std::error::Error for Defect {}

/// Returns a short name for the JSON type of `value`, used in error messages.
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
