use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// A lookup table does not contain a row the pipeline references.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("ontology term {ontterm_id} not found (field {field})")]
    UnknownTerm { ontterm_id: u32, field: String },
    #[error("namespace {nspace_id} not found (ontology term {ontterm_id})")]
    UnknownNamespace { nspace_id: u32, ontterm_id: u32 },
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Lookup(#[from] LookupError),
    #[error("invalid section '{section}' for field {field} at {path}")]
    InvalidSection {
        section: String,
        field: String,
        path: String,
    },
    #[error("invalid {rule} pattern '{pattern}': {source}")]
    InvalidPattern {
        rule: &'static str,
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

pub type Result<T> = std::result::Result<T, PipelineError>;

/// Recoverable conditions reported alongside the pipeline output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PipelineWarning {
    /// A rule template contains the placeholder but the match had no second
    /// capture group; the template was used literally.
    PatternSubstitution { pattern: String, subject: String },
    /// A value looks like `prefix:term` but the prefix is not a known namespace.
    UnregisteredNamespace { prefix: String, value: String },
    /// More than one crosswalk entry matched a leaf.
    AmbiguousCrosswalk {
        field: String,
        table: String,
        candidates: usize,
        skipped: bool,
    },
}

impl fmt::Display for PipelineWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PatternSubstitution { pattern, subject } => write!(
                f,
                "pattern '{pattern}' has no second capture group for '{subject}'; template used literally"
            ),
            Self::UnregisteredNamespace { prefix, value } => {
                write!(f, "unregistered namespace prefix '{prefix}' in '{value}'")
            }
            Self::AmbiguousCrosswalk {
                field,
                table,
                candidates,
                skipped,
            } => {
                let action = if *skipped {
                    "left unannotated"
                } else {
                    "first entry used"
                };
                write!(
                    f,
                    "{candidates} crosswalk entries match {table}.{field}; {action}"
                )
            }
        }
    }
}
