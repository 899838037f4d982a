//! The assembled, identifier-bearing output document.

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::crosswalk::Section;
use crate::record::References;
use crate::scalar::Scalar;

/// A typed node with a unique identifier (`@id`) and ordered fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: String,
    pub kind: String,
    pub fields: Vec<(String, NodeValue)>,
    pub refs: References,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeValue {
    Scalar(Scalar),
    List(Vec<NodeValue>),
    Node(Box<Node>),
}

impl NodeValue {
    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Self::Node(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Scalar(scalar) => scalar.as_text(),
            _ => None,
        }
    }
}

impl From<Scalar> for NodeValue {
    fn from(value: Scalar) -> Self {
        Self::Scalar(value)
    }
}

impl From<Node> for NodeValue {
    fn from(node: Node) -> Self {
        Self::Node(Box::new(node))
    }
}

impl Node {
    pub fn new(id: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            fields: Vec::new(),
            refs: References::default(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&NodeValue> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut NodeValue> {
        self.fields
            .iter_mut()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<NodeValue>) {
        let name = name.into();
        let value = value.into();
        match self.get_mut(&name) {
            Some(slot) => *slot = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<NodeValue> {
        let index = self.fields.iter().position(|(field, _)| field == name)?;
        Some(self.fields.remove(index).1)
    }

    /// Nested nodes held in this node's `data` list.
    pub fn data(&self) -> impl Iterator<Item = &Node> {
        let items: &[NodeValue] = match self.get("data") {
            Some(NodeValue::List(items)) => items,
            _ => &[],
        };
        items.iter().filter_map(NodeValue::as_node)
    }
}

impl Serialize for NodeValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Scalar(value) => value.serialize(serializer),
            Self::List(items) => items.serialize(serializer),
            Self::Node(node) => node.serialize(serializer),
        }
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("@id", &self.id)?;
        map.serialize_entry("@type", &self.kind)?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        if let Some(link) = &self.refs.link {
            map.serialize_entry("#", link)?;
        }
        if let Some(original) = &self.refs.original {
            map.serialize_entry("##", original)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct MethodologySection {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub aspects: Vec<Node>,
}

impl MethodologySection {
    pub fn is_empty(&self) -> bool {
        self.aspects.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct SystemSection {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub facets: Vec<Node>,
}

impl SystemSection {
    pub fn is_empty(&self) -> bool {
        self.facets.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct DatasetSection {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub datagroup: Vec<Node>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub datapoint: Vec<Node>,
}

impl DatasetSection {
    pub fn is_empty(&self) -> bool {
        self.datagroup.is_empty() && self.datapoint.is_empty()
    }
}

/// The three-section document produced by the pipeline.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct Document {
    #[serde(skip_serializing_if = "MethodologySection::is_empty")]
    pub methodology: MethodologySection,
    #[serde(skip_serializing_if = "SystemSection::is_empty")]
    pub system: SystemSection,
    #[serde(skip_serializing_if = "DatasetSection::is_empty")]
    pub dataset: DatasetSection,
}

impl Document {
    /// Order in which sections are scanned when resolving links.
    pub const LINK_ORDER: [Section; 3] = [Section::Dataset, Section::Methodology, Section::System];

    pub fn nodes(&self, section: Section) -> &[Node] {
        match section {
            Section::Methodology => &self.methodology.aspects,
            Section::System => &self.system.facets,
            Section::Dataset => &self.dataset.datapoint,
        }
    }

    pub fn nodes_mut(&mut self, section: Section) -> &mut Vec<Node> {
        match section {
            Section::Methodology => &mut self.methodology.aspects,
            Section::System => &mut self.system.facets,
            Section::Dataset => &mut self.dataset.datapoint,
        }
    }

    /// Top-level section records in link order; datagroups are not included.
    pub fn records(&self) -> impl Iterator<Item = &Node> {
        Self::LINK_ORDER
            .into_iter()
            .flat_map(move |section| self.nodes(section).iter())
    }

    pub fn is_empty(&self) -> bool {
        self.methodology.is_empty() && self.system.is_empty() && self.dataset.is_empty()
    }
}
