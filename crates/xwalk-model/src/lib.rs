pub mod crosswalk;
pub mod document;
pub mod error;
pub mod options;
pub mod record;
pub mod rules;
pub mod scalar;
pub mod tables;
pub mod tree;

pub use crosswalk::{CrosswalkEntry, Namespace, OntologyTerm, Section};
pub use document::{DatasetSection, Document, MethodologySection, Node, NodeValue, SystemSection};
pub use error::{LookupError, PipelineError, PipelineWarning, Result};
pub use options::{AmbiguityPolicy, DatasetGrouping, PipelineOptions};
pub use record::{ExtractedLeaf, Record, References, Value};
pub use rules::{GroupRule, LinkRule, LinkTarget, OverrideRule, PLACEHOLDER, RuleSet};
pub use scalar::Scalar;
pub use tables::LookupTables;
pub use tree::{AnnotatedLeaf, Leaf, Tree};
