//! Declarative rules: group-link overrides, cross-links and data groups.

use serde::{Deserialize, Serialize};

/// Token in rule templates replaced by a captured or enumerated value.
pub const PLACEHOLDER: &str = "$!@%";

/// Rewrites a group link matching `pattern` to `replacement`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideRule {
    pub pattern: String,
    pub replacement: String,
}

impl OverrideRule {
    pub fn new(pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            replacement: replacement.into(),
        }
    }
}

/// One relation attached by a [`LinkRule`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkTarget {
    pub relation: String,
    pub pattern: String,
}

/// Links records whose reference matches `source` to records whose
/// reference matches each target pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRule {
    pub source: String,
    #[serde(default, rename = "target")]
    pub targets: Vec<LinkTarget>,
}

impl LinkRule {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            targets: Vec::new(),
        }
    }

    pub fn with_target(mut self, relation: impl Into<String>, pattern: impl Into<String>) -> Self {
        self.targets.push(LinkTarget {
            relation: relation.into(),
            pattern: pattern.into(),
        });
        self
    }
}

/// Enumerates data groups by the value of `field`, e.g. `crystal/$!@%/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRule {
    pub field: String,
    pub value: String,
}

impl GroupRule {
    pub fn new(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn instantiate(&self, index: usize) -> String {
        self.value.replace(PLACEHOLDER, &index.to_string())
    }
}

/// All rule tables, in the order they are applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    #[serde(default, rename = "override")]
    pub overrides: Vec<OverrideRule>,
    #[serde(default, rename = "link")]
    pub links: Vec<LinkRule>,
    #[serde(default, rename = "group")]
    pub groups: Vec<GroupRule>,
}

impl RuleSet {
    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty() && self.links.is_empty() && self.groups.is_empty()
    }
}
