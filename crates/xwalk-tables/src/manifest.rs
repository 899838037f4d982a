#![deny(unsafe_code)]

use serde::{Deserialize, Serialize};

pub const MANIFEST_SCHEMA: &str = "scidata-xwalk.tables-manifest";
pub const MANIFEST_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub manifest: ManifestHeader,
    #[serde(default)]
    pub notes: Option<ManifestNotes>,
    pub files: Vec<ManifestFile>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestHeader {
    pub schema: String,
    pub schema_version: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestNotes {
    pub summary: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestFile {
    pub path: String,
    pub kind: FileKind,
    pub role: TableRole,
    #[serde(default)]
    pub sha256: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Csv,
    Json,
    Toml,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableRole {
    Crosswalks,
    Ontterms,
    Namespaces,
    Rules,
}

impl TableRole {
    pub const REQUIRED: [TableRole; 3] = [Self::Crosswalks, Self::Ontterms, Self::Namespaces];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Crosswalks => "crosswalks",
            Self::Ontterms => "ontterms",
            Self::Namespaces => "namespaces",
            Self::Rules => "rules",
        }
    }

    /// File kinds a role may be stored as.
    pub fn accepts(self, kind: FileKind) -> bool {
        match self {
            Self::Rules => kind == FileKind::Toml,
            _ => matches!(kind, FileKind::Csv | FileKind::Json),
        }
    }
}

impl std::fmt::Display for TableRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
