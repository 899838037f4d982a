//! Ordered steps run over the assembled document.
//!
//! # Standard Step Order
//!
//! 1. **CrossLinkStep** - attach relations from link rules
//! 2. **DataGroupStep** - build data groups from group rules
//! 3. **FinalizeStep** - remove `#`/`##` bookkeeping

use xwalk_model::{Document, LinkRule, PipelineWarning, Result};

use crate::context::CrosswalkContext;
use crate::finalize::finalize;
use crate::groups::build_groups;
use crate::link::CrossLinker;

/// A single step over the assembled document.
pub trait DocumentStep: Send + Sync {
    fn execute(
        &self,
        document: &mut Document,
        ctx: &CrosswalkContext<'_>,
        state: &mut PipelineState,
    ) -> Result<()>;

    /// Human-readable name for this step (for logging/debugging).
    fn step_name(&self) -> &str;

    fn should_skip(&self, _ctx: &CrosswalkContext<'_>) -> bool {
        false
    }
}

/// Mutable state shared across document steps.
#[derive(Debug, Default)]
pub struct PipelineState {
    pub warnings: Vec<PipelineWarning>,
    pub executed_steps: Vec<String>,
}

impl PipelineState {
    pub fn new() -> Self {
        Self::default()
    }
}

pub struct DocumentPipeline {
    steps: Vec<Box<dyn DocumentStep>>,
}

impl Default for DocumentPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentPipeline {
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    pub fn add_step(mut self, step: Box<dyn DocumentStep>) -> Self {
        self.steps.push(step);
        self
    }

    pub fn execute(
        &self,
        document: &mut Document,
        ctx: &CrosswalkContext<'_>,
        state: &mut PipelineState,
    ) -> Result<()> {
        for step in &self.steps {
            if step.should_skip(ctx) {
                continue;
            }
            step.execute(document, ctx, state)?;
            state.executed_steps.push(step.step_name().to_string());
        }
        Ok(())
    }

    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.step_name()).collect()
    }
}

pub struct CrossLinkStep {
    linker: CrossLinker,
}

impl CrossLinkStep {
    pub fn new(rules: &[LinkRule]) -> Result<Self> {
        Ok(Self {
            linker: CrossLinker::new(rules)?,
        })
    }
}

impl DocumentStep for CrossLinkStep {
    fn execute(
        &self,
        document: &mut Document,
        _ctx: &CrosswalkContext<'_>,
        state: &mut PipelineState,
    ) -> Result<()> {
        let warnings = self.linker.link(document)?;
        state.warnings.extend(warnings);
        Ok(())
    }

    fn step_name(&self) -> &str {
        "cross_link"
    }

    fn should_skip(&self, _ctx: &CrosswalkContext<'_>) -> bool {
        self.linker.is_empty()
    }
}

pub struct DataGroupStep;

impl DocumentStep for DataGroupStep {
    fn execute(
        &self,
        document: &mut Document,
        ctx: &CrosswalkContext<'_>,
        _state: &mut PipelineState,
    ) -> Result<()> {
        let groups = build_groups(&ctx.tables.rules.groups, &mut document.dataset.datapoint);
        document.dataset.datagroup.extend(groups);
        Ok(())
    }

    fn step_name(&self) -> &str {
        "data_group"
    }

    fn should_skip(&self, ctx: &CrosswalkContext<'_>) -> bool {
        ctx.tables.rules.groups.is_empty()
    }
}

pub struct FinalizeStep;

impl DocumentStep for FinalizeStep {
    fn execute(
        &self,
        document: &mut Document,
        _ctx: &CrosswalkContext<'_>,
        _state: &mut PipelineState,
    ) -> Result<()> {
        finalize(document);
        Ok(())
    }

    fn step_name(&self) -> &str {
        "finalize"
    }

    fn should_skip(&self, ctx: &CrosswalkContext<'_>) -> bool {
        ctx.options.keep_references
    }
}

/// Build the standard document pipeline for a rule set's link rules.
pub fn build_document_pipeline(links: &[LinkRule]) -> Result<DocumentPipeline> {
    Ok(DocumentPipeline::new()
        .add_step(Box::new(CrossLinkStep::new(links)?))
        .add_step(Box::new(DataGroupStep))
        .add_step(Box::new(FinalizeStep)))
}
