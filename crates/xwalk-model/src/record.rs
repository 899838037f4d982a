//! Intermediate records built between leaf extraction and identifier
//! assignment.

use crate::crosswalk::CrosswalkEntry;
use crate::scalar::Scalar;

/// An annotated leaf lifted out of the flattened tree, with its grouping keys.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedLeaf {
    /// Full flattened path, e.g. `compounds;qsar_predicted_properties;0;result_value`.
    pub path_key: String,
    /// Last path segment.
    pub local_key: String,
    pub group_key: String,
    /// Current group link; override rules rewrite this.
    pub group_link: String,
    /// Group link before any override was applied.
    pub original_link: String,
    pub value: Scalar,
    pub entry: CrosswalkEntry,
}

impl ExtractedLeaf {
    pub fn is_overridden(&self) -> bool {
        self.group_link != self.original_link
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Scalar(Scalar),
    Annotated(Box<ExtractedLeaf>),
    List(Vec<Value>),
    Record(Record),
}

impl Value {
    pub fn as_annotated(&self) -> Option<&ExtractedLeaf> {
        match self {
            Self::Annotated(leaf) => Some(leaf),
            _ => None,
        }
    }
}

impl From<Scalar> for Value {
    fn from(value: Scalar) -> Self {
        Self::Scalar(value)
    }
}

impl From<ExtractedLeaf> for Value {
    fn from(leaf: ExtractedLeaf) -> Self {
        Self::Annotated(Box::new(leaf))
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Self::Record(record)
    }
}

/// Bookkeeping carried by records until finalisation (`#` and `##`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct References {
    /// Resolved group link (`#`).
    pub link: Option<String>,
    /// Group link before overrides (`##`), kept only when tracing fields.
    pub original: Option<String>,
}

impl References {
    pub fn is_empty(&self) -> bool {
        self.link.is_none() && self.original.is_none()
    }

    pub fn clear(&mut self) {
        self.link = None;
        self.original = None;
    }
}

/// A composite record awaiting identifier assignment.
///
/// `id` is the category the identifier is derived from; `kind` overrides the
/// default `sdo:<category>` type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    pub id: Option<String>,
    pub kind: Option<String>,
    pub fields: Vec<(String, Value)>,
    pub refs: References,
}

impl Record {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.fields
            .iter_mut()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Replaces the value of an existing field in place, or appends it.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        match self.get_mut(&name) {
            Some(slot) => *slot = value,
            None => self.fields.push((name, value)),
        }
    }
}
