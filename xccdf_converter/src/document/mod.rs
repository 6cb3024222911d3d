//! Result document model
//!
//! The shapes serialized to JSON. Field order here is the key order in the
//! output; flattened attribute maps come first, sorted by name.

mod builder;

pub use builder::DocumentBuilder;

use crate::stream::AttributeMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Keys the root object reserves for converter-produced values
pub const BENCHMARK_KEYS: [&str; 7] = [
    "hostname", "user", "profile", "score", "profiles", "rules", "results",
];

/// Keys a rule-result object reserves for nested tag text
pub const RULE_RESULT_KEYS: [&str; 2] = ["result", "ident"];

/// Root result mapping built from one TestResult
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Benchmark {
    /// TestResult attributes other than `id`
    #[serde(flatten)]
    pub attributes: AttributeMap,
    pub hostname: String,
    pub user: String,
    pub profile: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<String>,
    pub profiles: BTreeMap<String, Vec<Selection>>,
    pub rules: Vec<Rule>,
    pub results: Vec<RuleResult>,
}

/// Attributes of one `select` child of a Profile
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selection(pub AttributeMap);

impl Selection {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub id: String,
    pub severity: String,
    /// Text of the first `title`
    pub check: String,
    /// All text under the first `description`
    pub recommendation: String,
    /// All text under the first `rationale`
    pub justification: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleResult {
    /// rule-result attributes other than `time`
    #[serde(flatten)]
    pub attributes: AttributeMap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ident: Option<String>,
}

impl RuleResult {
    /// Start a record from the element's attributes
    pub fn from_attributes(mut attributes: AttributeMap) -> Self {
        attributes.remove("time");
        attributes.retain(|key, _| !RULE_RESULT_KEYS.contains(&key.as_str()));
        Self {
            attributes,
            result: None,
            ident: None,
        }
    }

    pub fn idref(&self) -> Option<&str> {
        self.attributes.get("idref").map(String::as_str)
    }
}

impl Benchmark {
    pub fn rule(&self, id: &str) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.id == id)
    }

    /// Number of selections across all profiles
    pub fn selection_count(&self) -> usize {
        self.profiles.values().map(Vec::len).sum()
    }
}
