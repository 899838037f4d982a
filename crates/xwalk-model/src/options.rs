//! Configuration options for a crosswalk run.

use serde::{Deserialize, Serialize};

/// Tie-break when several crosswalk entries match the same leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AmbiguityPolicy {
    /// Use the first matching entry in table order.
    #[default]
    FirstEntry,
    /// Leave the leaf unannotated.
    Skip,
}

/// How dataset leaves are clustered into datapoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DatasetGrouping {
    /// Group link is `groupKey/subsection`, as for the other sections.
    #[default]
    BySubsection,
    /// Group link is `groupKey/`; every subsection at a position shares a datapoint.
    ByPosition,
}

/// Options controlling the crosswalk pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineOptions {
    /// Name of the table the input tree's top level belongs to.
    pub root_table: Option<String>,

    /// Require the crosswalk `table` to equal the enclosing field name.
    pub match_table: bool,

    pub ambiguity: AmbiguityPolicy,

    pub dataset_grouping: DatasetGrouping,

    /// Keep `##` and add `<field>#`/`<field>##` tracking fields to the output.
    pub trace_fields: bool,

    /// Leave `#`/`##` on records instead of removing them at the end.
    pub keep_references: bool,

    /// Namespace prefixes accepted in reference values besides the resolved ones.
    pub extra_namespaces: Vec<String>,
}

impl PipelineOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_root_table(mut self, table: impl Into<String>) -> Self {
        self.root_table = Some(table.into());
        self
    }

    pub fn with_match_table(mut self, enable: bool) -> Self {
        self.match_table = enable;
        self
    }

    pub fn with_ambiguity(mut self, policy: AmbiguityPolicy) -> Self {
        self.ambiguity = policy;
        self
    }

    pub fn with_dataset_grouping(mut self, grouping: DatasetGrouping) -> Self {
        self.dataset_grouping = grouping;
        self
    }

    pub fn with_trace_fields(mut self, enable: bool) -> Self {
        self.trace_fields = enable;
        self
    }

    pub fn with_keep_references(mut self, enable: bool) -> Self {
        self.keep_references = enable;
        self
    }

    pub fn with_extra_namespace(mut self, prefix: impl Into<String>) -> Self {
        self.extra_namespaces.push(prefix.into());
        self
    }
}
