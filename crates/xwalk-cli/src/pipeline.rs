//! Input loading and pipeline invocation for the CLI commands.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{info, info_span, trace};
use xwalk_core::{CrosswalkOutput, Crosswalker};
use xwalk_model::{ExtractedLeaf, LookupTables, PipelineOptions, Tree};
use xwalk_tables::{TableRegistry, VerifySummary, tables_root};

use crate::logging::redact_value;

/// Tables loaded for a run, with their verification summary.
#[derive(Debug)]
pub struct LoadedTables {
    pub tables: LookupTables,
    pub summary: VerifySummary,
}

/// One annotated leaf as shown by `flatten`.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatRow {
    pub path_key: String,
    pub local_key: String,
    pub section: String,
    pub subsection: String,
    pub original_link: String,
    pub group_link: String,
    pub value: String,
}

impl From<&ExtractedLeaf> for FlatRow {
    fn from(leaf: &ExtractedLeaf) -> Self {
        Self {
            path_key: leaf.path_key.clone(),
            local_key: leaf.local_key.clone(),
            section: leaf.entry.section.clone(),
            subsection: leaf.entry.subsection.clone(),
            original_link: leaf.original_link.clone(),
            group_link: leaf.group_link.clone(),
            value: leaf.value.to_string(),
        }
    }
}

pub fn load_tables(dir: Option<&Path>) -> Result<LoadedTables> {
    let dir: PathBuf = dir.map_or_else(tables_root, Path::to_path_buf);
    let (registry, summary) = TableRegistry::verify_and_load(&dir)
        .with_context(|| format!("load tables from {}", dir.display()))?;
    Ok(LoadedTables {
        tables: registry.tables,
        summary,
    })
}

pub fn load_input(path: &Path) -> Result<Tree> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read input {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parse input {}", path.display()))
}

pub fn run_crosswalk(
    input: &Tree,
    tables: &LookupTables,
    options: &PipelineOptions,
) -> Result<CrosswalkOutput> {
    let start = Instant::now();
    let output = info_span!("crosswalk", root = options.root_table.as_deref().unwrap_or_default())
        .in_scope(|| -> Result<CrosswalkOutput> {
            let crosswalker = Crosswalker::new(tables, options).context("compile rules")?;
            crosswalker.run(input).context("run crosswalk")
        })?;
    info!(duration_ms = start.elapsed().as_millis(), "run complete");
    Ok(output)
}

pub fn flatten_rows(
    input: &Tree,
    tables: &LookupTables,
    options: &PipelineOptions,
) -> Result<Vec<FlatRow>> {
    let crosswalker = Crosswalker::new(tables, options).context("compile rules")?;
    let extraction = crosswalker.extract(input);
    let rows: Vec<FlatRow> = extraction.leaves.iter().map(FlatRow::from).collect();
    for row in &rows {
        trace!(path = %row.path_key, value = redact_value(&row.value), "annotated leaf");
    }
    Ok(rows)
}

pub fn render_output(output: &CrosswalkOutput, pretty: bool) -> Result<String> {
    let text = if pretty {
        serde_json::to_string_pretty(output)
    } else {
        serde_json::to_string(output)
    };
    text.context("serialize output")
}

pub fn write_output(output: &CrosswalkOutput, path: &Path, pretty: bool) -> Result<()> {
    let text = render_output(output, pretty)?;
    std::fs::write(path, text).with_context(|| format!("write output {}", path.display()))
}
