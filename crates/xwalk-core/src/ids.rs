//! Identifier assignment: turns grouped records into typed, uniquely
//! identified document nodes.
//!
//! Identifiers are path-like: a root record of category `model` becomes
//! `model/1/`, and a nested `value` record under it `model/1/value/1/`. The
//! trailing number is the first one not already taken in the arena, so
//! siblings of the same category count up `/1/`, `/2/`, ...

use std::collections::{BTreeSet, HashMap, HashSet};

use xwalk_model::{Node, NodeValue, PipelineWarning, Record, Scalar, Value};

/// Category of a record with no declared id that aggregates identifiers.
pub const COMPOUND_CATEGORY: &str = "compound";
pub const UNDEFINED_CATEGORY: &str = "undefined";

/// Tracks the identifiers handed out within one scope.
#[derive(Debug, Clone, Default)]
pub struct IdArena {
    allocated: HashSet<String>,
    next_suffix: HashMap<String, usize>,
}

impl IdArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates `<parent><category>/<n>/` with the smallest free `n` from
    /// the last one handed out for that base.
    pub fn allocate(&mut self, parent: Option<&str>, category: &str) -> String {
        let base = format!("{}{category}/", parent.unwrap_or_default());
        let mut suffix = self.next_suffix.get(&base).copied().unwrap_or(1);
        let mut id = format!("{base}{suffix}/");
        while self.allocated.contains(&id) {
            suffix += 1;
            id = format!("{base}{suffix}/");
        }
        self.next_suffix.insert(base, suffix + 1);
        self.allocated.insert(id.clone());
        id
    }

    pub fn contains(&self, id: &str) -> bool {
        self.allocated.contains(id)
    }

    pub fn len(&self) -> usize {
        self.allocated.len()
    }

    pub fn is_empty(&self) -> bool {
        self.allocated.is_empty()
    }
}

/// Collects `prefix:term` references found in text values.
#[derive(Debug, Clone, Default)]
pub struct ReferenceRegistry {
    known_prefixes: HashSet<String>,
    references: BTreeSet<String>,
    warnings: Vec<PipelineWarning>,
}

impl ReferenceRegistry {
    pub fn new<I, S>(known_prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            known_prefixes: known_prefixes.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Records `text` if it has the shape `prefix:term`; URLs are ignored.
    ///
    /// Returns whether the text was a reference. An unknown prefix is reported
    /// once per distinct value but the reference is still recorded.
    pub fn register(&mut self, text: &str) -> bool {
        if text.contains("://") {
            return false;
        }
        let mut parts = text.split(':');
        let (Some(prefix), Some(term), None) = (parts.next(), parts.next(), parts.next()) else {
            return false;
        };
        if prefix.is_empty() || term.is_empty() {
            return false;
        }
        if self.references.insert(text.to_string()) && !self.known_prefixes.contains(prefix) {
            self.warnings.push(PipelineWarning::UnregisteredNamespace {
                prefix: prefix.to_string(),
                value: text.to_string(),
            });
        }
        true
    }

    pub fn references(&self) -> &BTreeSet<String> {
        &self.references
    }

    pub fn warnings(&self) -> &[PipelineWarning] {
        &self.warnings
    }

    pub fn into_parts(self) -> (BTreeSet<String>, Vec<PipelineWarning>) {
        (self.references, self.warnings)
    }
}

/// Category a record's identifier is derived from.
pub fn category(record: &Record) -> &str {
    match &record.id {
        Some(id) => id.as_str(),
        None if record.contains("descriptors") || record.contains("identifiers") => {
            COMPOUND_CATEGORY
        }
        None => UNDEFINED_CATEGORY,
    }
}

/// Assigns identifiers to one section's records, sharing a single arena.
pub fn assign_section(records: Vec<Record>, registry: &mut ReferenceRegistry) -> Vec<Node> {
    let mut arena = IdArena::new();
    records
        .into_iter()
        .map(|record| assign_record(record, None, &mut arena, registry))
        .collect()
}

/// Converts `record` into a node whose identifier is nested under `parent`.
pub fn assign_record(
    record: Record,
    parent: Option<&str>,
    arena: &mut IdArena,
    registry: &mut ReferenceRegistry,
) -> Node {
    let category = category(&record).to_string();
    let id = arena.allocate(parent, &category);
    let kind = record
        .kind
        .unwrap_or_else(|| format!("sdo:{category}"));

    let mut node = Node::new(id, kind);
    node.refs = record.refs;
    for (name, value) in record.fields {
        let value = assign_value(value, Some(&node.id), arena, registry);
        node.fields.push((name, value));
    }
    node
}

fn assign_value(
    value: Value,
    parent: Option<&str>,
    arena: &mut IdArena,
    registry: &mut ReferenceRegistry,
) -> NodeValue {
    match value {
        Value::Scalar(scalar) => register_scalar(scalar, registry),
        Value::Annotated(leaf) => register_scalar(leaf.value, registry),
        Value::List(items) => NodeValue::List(
            items
                .into_iter()
                .map(|item| assign_value(item, parent, arena, registry))
                .collect(),
        ),
        Value::Record(record) => NodeValue::from(assign_record(record, parent, arena, registry)),
    }
}

fn register_scalar(scalar: Scalar, registry: &mut ReferenceRegistry) -> NodeValue {
    if let Scalar::Text(text) = &scalar {
        registry.register(text);
    }
    NodeValue::Scalar(scalar)
}
