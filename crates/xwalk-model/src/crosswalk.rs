//! Lookup-table rows: crosswalk entries, ontology terms and namespaces.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the three fixed top-level partitions of the output document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Methodology,
    System,
    Dataset,
}

impl Section {
    pub const ALL: [Section; 3] = [Section::Methodology, Section::System, Section::Dataset];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Methodology => "methodology",
            Self::System => "system",
            Self::Dataset => "dataset",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "methodology" => Some(Self::Methodology),
            "system" => Some(Self::System),
            "dataset" => Some(Self::Dataset),
            _ => None,
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A crosswalk row: classification metadata for a source field.
///
/// The section is kept as the raw table text; it is validated when leaves
/// are binned, so a bad row only fails a run that actually uses it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrosswalkEntry {
    #[serde(default)]
    pub id: Option<u32>,
    #[serde(default)]
    pub table: Option<String>,
    pub field: String,
    #[serde(alias = "ontterm")]
    pub ontterm_id: u32,
    #[serde(alias = "sdsection")]
    pub section: String,
    #[serde(alias = "sdsubsection")]
    pub subsection: String,
    #[serde(default, alias = "sdsubsubsection")]
    pub subsubsection: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default = "default_datatype")]
    pub datatype: String,
}

fn default_datatype() -> String {
    "string".to_string()
}

impl CrosswalkEntry {
    pub fn new(
        field: impl Into<String>,
        ontterm_id: u32,
        section: impl Into<String>,
        subsection: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            table: None,
            field: field.into(),
            ontterm_id,
            section: section.into(),
            subsection: subsection.into(),
            subsubsection: None,
            category: None,
            unit: None,
            datatype: default_datatype(),
        }
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    pub fn section(&self) -> Option<Section> {
        Section::from_name(&self.section)
    }

    pub fn is_dataset(&self) -> bool {
        self.section() == Some(Section::Dataset)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OntologyTerm {
    pub id: u32,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub definition: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    pub nspace_id: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Namespace {
    pub id: u32,
    #[serde(default)]
    pub name: Option<String>,
    /// Short prefix, e.g. `obo`.
    pub ns: String,
    /// URI the prefix expands to.
    pub path: String,
    #[serde(default)]
    pub homepage: Option<String>,
}
