use xwalk_map::NamespaceMap;
use xwalk_model::{LookupTables, PipelineOptions};

/// Read-only inputs shared by every stage of a run.
#[derive(Debug, Clone, Copy)]
pub struct CrosswalkContext<'a> {
    pub tables: &'a LookupTables,
    pub options: &'a PipelineOptions,
}

impl<'a> CrosswalkContext<'a> {
    pub fn new(tables: &'a LookupTables, options: &'a PipelineOptions) -> Self {
        Self { tables, options }
    }

    pub fn with_options(mut self, options: &'a PipelineOptions) -> Self {
        self.options = options;
        self
    }

    /// Prefixes accepted in reference values: the resolved namespaces plus
    /// any configured extras.
    pub fn known_prefixes(&self, resolved: &NamespaceMap) -> Vec<String> {
        resolved
            .keys()
            .chain(self.options.extra_namespaces.iter())
            .cloned()
            .collect()
    }
}
