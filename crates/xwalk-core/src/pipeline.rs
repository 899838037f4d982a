//! The crosswalk entry point.
//!
//! Stages run strictly in order, each consuming the previous stage's full
//! output: annotate, flatten, extract leaves, override group links, resolve
//! namespaces, bin, group, reshape the dataset, strip metadata, assign
//! identifiers, then the document steps (cross-link, data groups, finalize).

use std::collections::BTreeSet;
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info, info_span, warn};
use xwalk_map::{Annotator, GroupLinkRewriter, NamespaceMap, extract_leaves, flatten, resolve_namespaces};
use xwalk_model::{
    Document, ExtractedLeaf, LookupTables, PipelineOptions, PipelineWarning, Result, Section, Tree,
};

use crate::bins::{bin_leaves, group_bins};
use crate::context::CrosswalkContext;
use crate::dataset::reshape_dataset;
use crate::ids::{ReferenceRegistry, assign_section};
use crate::steps::{DocumentPipeline, PipelineState, build_document_pipeline};
use crate::strip::strip_records;

/// Everything a run produces.
#[derive(Debug, Clone, Serialize)]
pub struct CrosswalkOutput {
    /// Namespace prefix to URI for the ontology terms in use.
    pub namespaces: NamespaceMap,
    #[serde(flatten)]
    pub document: Document,
    /// `prefix:term` values found in the document, sorted.
    pub references: BTreeSet<String>,
    pub warnings: Vec<PipelineWarning>,
}

impl CrosswalkOutput {
    pub fn record_count(&self, section: Section) -> usize {
        self.document.nodes(section).len()
    }
}

/// Annotated leaves after group-link overrides, before binning.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub leaves: Vec<ExtractedLeaf>,
    pub warnings: Vec<PipelineWarning>,
}

/// A configured pipeline with its rules compiled.
pub struct Crosswalker<'a> {
    tables: &'a LookupTables,
    options: &'a PipelineOptions,
    rewriter: GroupLinkRewriter,
    steps: DocumentPipeline,
}

impl<'a> Crosswalker<'a> {
    pub fn new(tables: &'a LookupTables, options: &'a PipelineOptions) -> Result<Self> {
        Ok(Self {
            tables,
            options,
            rewriter: GroupLinkRewriter::new(&tables.rules.overrides)?,
            steps: build_document_pipeline(&tables.rules.links)?,
        })
    }

    pub fn context(&self) -> CrosswalkContext<'a> {
        CrosswalkContext::new(self.tables, self.options)
    }

    /// Runs the stages up to and including group-link overrides.
    pub fn extract(&self, input: &Tree) -> Extraction {
        let annotation = info_span!("annotate")
            .in_scope(|| Annotator::new(&self.tables.crosswalks, self.options).annotate(input));
        let mut warnings = annotation.warnings;

        let flat = info_span!("flatten").in_scope(|| flatten(annotation.tree));
        let mut leaves = extract_leaves(&flat, self.options.dataset_grouping);
        debug!(
            flattened = flat.len(),
            annotated = leaves.len(),
            "leaves extracted"
        );

        let override_warnings = info_span!("group_link_override").in_scope(|| {
            let found = self.rewriter.apply(&mut leaves);
            debug!(
                rules = self.rewriter.len(),
                overridden = leaves.iter().filter(|leaf| leaf.is_overridden()).count(),
                "group links rewritten"
            );
            found
        });
        warnings.extend(override_warnings);

        Extraction { leaves, warnings }
    }

    pub fn run(&self, input: &Tree) -> Result<CrosswalkOutput> {
        let start = Instant::now();
        let ctx = self.context();
        let Extraction {
            leaves,
            mut warnings,
        } = self.extract(input);

        let namespaces = info_span!("namespaces")
            .in_scope(|| resolve_namespaces(&leaves, self.tables))?;

        let mut grouped = info_span!("bin").in_scope(|| -> Result<_> {
            let bins = bin_leaves(leaves)?;
            let mut grouped = group_bins(&bins);
            grouped.dataset = reshape_dataset(std::mem::take(&mut grouped.dataset));
            debug!(
                methodology = grouped.methodology.len(),
                system = grouped.system.len(),
                dataset = grouped.dataset.len(),
                "bins grouped"
            );
            Ok(grouped)
        })?;

        let trace_fields = self.options.trace_fields;
        for section in Section::ALL {
            strip_records(grouped.get_mut(section), trace_fields);
        }

        let mut registry = ReferenceRegistry::new(ctx.known_prefixes(&namespaces));
        let mut document = info_span!("assign_ids").in_scope(|| {
            let mut document = Document::default();
            for section in Section::ALL {
                let records = std::mem::take(grouped.get_mut(section));
                *document.nodes_mut(section) = assign_section(records, &mut registry);
            }
            document
        });
        let (references, registry_warnings) = registry.into_parts();
        warnings.extend(registry_warnings);

        let mut state = PipelineState::new();
        info_span!("document_steps").in_scope(|| self.steps.execute(&mut document, &ctx, &mut state))?;
        warnings.extend(state.warnings);

        let warnings = dedup_warnings(warnings);
        for warning in &warnings {
            warn!(%warning, "crosswalk warning");
        }
        info!(
            aspects = document.methodology.aspects.len(),
            facets = document.system.facets.len(),
            datapoints = document.dataset.datapoint.len(),
            datagroups = document.dataset.datagroup.len(),
            namespaces = namespaces.len(),
            warnings = warnings.len(),
            duration_ms = start.elapsed().as_millis(),
            "crosswalk complete"
        );

        Ok(CrosswalkOutput {
            namespaces,
            document,
            references,
            warnings,
        })
    }
}

/// Runs the full pipeline once.
pub fn run_pipeline(
    input: &Tree,
    tables: &LookupTables,
    options: &PipelineOptions,
) -> Result<CrosswalkOutput> {
    Crosswalker::new(tables, options)?.run(input)
}

fn dedup_warnings(warnings: Vec<PipelineWarning>) -> Vec<PipelineWarning> {
    let mut unique: Vec<PipelineWarning> = Vec::with_capacity(warnings.len());
    for warning in warnings {
        if !unique.contains(&warning) {
            unique.push(warning);
        }
    }
    unique
}
