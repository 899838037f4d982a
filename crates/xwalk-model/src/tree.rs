//! The nested input record.
//!
//! A [`Tree`] is the document handed to the crosswalk pipeline: named fields,
//! ordered sequences and scalar leaves. Mapping order is preserved exactly as
//! read, since it decides the order in which groups and identifiers are
//! produced downstream.

use std::fmt;

use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};

use crate::crosswalk::CrosswalkEntry;
use crate::scalar::Scalar;

/// A scalar leaf that matched a crosswalk entry.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedLeaf {
    pub value: Scalar,
    pub entry: CrosswalkEntry,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Leaf {
    Scalar(Scalar),
    Annotated(AnnotatedLeaf),
}

impl Leaf {
    pub fn value(&self) -> &Scalar {
        match self {
            Self::Scalar(value) => value,
            Self::Annotated(leaf) => &leaf.value,
        }
    }

    pub fn annotation(&self) -> Option<&CrosswalkEntry> {
        match self {
            Self::Scalar(_) => None,
            Self::Annotated(leaf) => Some(&leaf.entry),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Tree {
    Leaf(Leaf),
    Sequence(Vec<Tree>),
    Mapping(Vec<(String, Tree)>),
}

impl Tree {
    pub fn scalar(value: impl Into<Scalar>) -> Self {
        Self::Leaf(Leaf::Scalar(value.into()))
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf(_))
    }

    /// Looks up a direct child of a mapping by field name.
    pub fn get(&self, field: &str) -> Option<&Tree> {
        match self {
            Self::Mapping(fields) => fields
                .iter()
                .find(|(name, _)| name == field)
                .map(|(_, child)| child),
            _ => None,
        }
    }

    /// Number of nested levels below this node; leaves have depth 0.
    pub fn depth(&self) -> usize {
        match self {
            Self::Leaf(_) => 0,
            Self::Sequence(items) => 1 + items.iter().map(Tree::depth).max().unwrap_or(0),
            Self::Mapping(fields) => {
                1 + fields
                    .iter()
                    .map(|(_, child)| child.depth())
                    .max()
                    .unwrap_or(0)
            }
        }
    }

    /// Counts the annotated leaves anywhere in the tree.
    pub fn annotated_count(&self) -> usize {
        match self {
            Self::Leaf(Leaf::Annotated(_)) => 1,
            Self::Leaf(Leaf::Scalar(_)) => 0,
            Self::Sequence(items) => items.iter().map(Tree::annotated_count).sum(),
            Self::Mapping(fields) => fields.iter().map(|(_, child)| child.annotated_count()).sum(),
        }
    }
}

/// Object fields keep their document order (`serde_json` is built with
/// `preserve_order`), so this matches deserializing the same text directly.
impl From<serde_json::Value> for Tree {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::scalar(Scalar::Null),
            serde_json::Value::Bool(value) => Self::scalar(value),
            serde_json::Value::Number(number) => Self::scalar(Scalar::from_number(&number)),
            serde_json::Value::String(text) => Self::scalar(text),
            serde_json::Value::Array(items) => {
                Self::Sequence(items.into_iter().map(Tree::from).collect())
            }
            serde_json::Value::Object(map) => Self::Mapping(
                map.into_iter()
                    .map(|(name, child)| (name, Tree::from(child)))
                    .collect(),
            ),
        }
    }
}

impl<'de> Deserialize<'de> for Tree {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(TreeVisitor)
    }
}

struct TreeVisitor;

impl<'de> Visitor<'de> for TreeVisitor {
    type Value = Tree;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a scalar, a sequence or a mapping")
    }

    fn visit_unit<E: de::Error>(self) -> Result<Tree, E> {
        Ok(Tree::scalar(Scalar::Null))
    }

    fn visit_none<E: de::Error>(self) -> Result<Tree, E> {
        Ok(Tree::scalar(Scalar::Null))
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Tree, D::Error> {
        Tree::deserialize(deserializer)
    }

    fn visit_bool<E: de::Error>(self, value: bool) -> Result<Tree, E> {
        Ok(Tree::scalar(value))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Tree, E> {
        Ok(Tree::scalar(value))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Tree, E> {
        Ok(match i64::try_from(value) {
            Ok(value) => Tree::scalar(value),
            Err(_) => Tree::scalar(value as f64),
        })
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Tree, E> {
        Ok(Tree::scalar(value))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Tree, E> {
        Ok(Tree::scalar(value))
    }

    fn visit_string<E: de::Error>(self, value: String) -> Result<Tree, E> {
        Ok(Tree::scalar(value))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Tree, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element::<Tree>()? {
            items.push(item);
        }
        Ok(Tree::Sequence(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Tree, A::Error> {
        let mut fields = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((name, child)) = map.next_entry::<String, Tree>()? {
            fields.push((name, child));
        }
        Ok(Tree::Mapping(fields))
    }
}
