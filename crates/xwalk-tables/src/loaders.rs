//! Row-table and rule-file readers.
//!
//! Row tables (crosswalks, ontology terms, namespaces) are read from CSV with
//! a header row or from a JSON array of objects. Empty CSV cells read as
//! absent values and columns the model does not know are ignored.

#![deny(unsafe_code)]

use std::path::Path;

use serde::de::DeserializeOwned;
use xwalk_model::{CrosswalkEntry, Namespace, OntologyTerm, RuleSet};

use crate::error::TablesError;
use crate::manifest::FileKind;

pub fn load_rows<T: DeserializeOwned>(path: &Path, kind: FileKind) -> Result<Vec<T>, TablesError> {
    let bytes = std::fs::read(path).map_err(|e| TablesError::io(path, e))?;
    match kind {
        FileKind::Csv => {
            let mut reader = csv::ReaderBuilder::new()
                .has_headers(true)
                .trim(csv::Trim::All)
                .from_reader(bytes.as_slice());
            reader
                .deserialize()
                .map(|row| row.map_err(|e| TablesError::csv(path, &e)))
                .collect()
        }
        FileKind::Json => serde_json::from_slice(&bytes).map_err(|e| TablesError::Json {
            path: path.to_path_buf(),
            source: e,
        }),
        FileKind::Toml => Err(TablesError::InvalidManifest {
            message: format!("row table {} cannot be stored as toml", path.display()),
        }),
    }
}

pub fn load_crosswalks(path: &Path, kind: FileKind) -> Result<Vec<CrosswalkEntry>, TablesError> {
    let mut rows: Vec<CrosswalkEntry> = load_rows(path, kind)?;
    for (index, row) in rows.iter_mut().enumerate() {
        if row.field.is_empty() {
            return Err(invalid_row(path, index, "empty field name"));
        }
        if row.section.is_empty() || row.subsection.is_empty() {
            return Err(invalid_row(path, index, "empty section or subsection"));
        }
        if row.datatype.is_empty() {
            row.datatype = "string".to_string();
        }
        if row.table.as_deref() == Some("") {
            row.table = None;
        }
    }
    Ok(rows)
}

pub fn load_ontology_terms(path: &Path, kind: FileKind) -> Result<Vec<OntologyTerm>, TablesError> {
    load_rows(path, kind)
}

pub fn load_namespaces(path: &Path, kind: FileKind) -> Result<Vec<Namespace>, TablesError> {
    let rows: Vec<Namespace> = load_rows(path, kind)?;
    if let Some(index) = rows.iter().position(|row| row.ns.is_empty()) {
        return Err(invalid_row(path, index, "empty namespace prefix"));
    }
    Ok(rows)
}

pub fn load_rules(path: &Path) -> Result<RuleSet, TablesError> {
    let contents = std::fs::read_to_string(path).map_err(|e| TablesError::io(path, e))?;
    toml::from_str(&contents).map_err(|e| TablesError::Toml {
        path: path.to_path_buf(),
        source: e,
    })
}

fn invalid_row(path: &Path, index: usize, message: &str) -> TablesError {
    TablesError::InvalidRow {
        path: path.to_path_buf(),
        row: index + 1,
        message: message.to_string(),
    }
}
