use std::io::Write;

use anyhow::{Context, Result};
use tracing::info_span;
use xwalk_core::CrosswalkOutput;

use xwalk_cli::pipeline::{
    FlatRow, flatten_rows, load_input, load_tables, render_output, run_crosswalk, write_output,
};
use xwalk_tables::VerifySummary;

use crate::cli::{FlattenArgs, RunArgs, TablesArgs};

pub fn run_run(args: &RunArgs) -> Result<CrosswalkOutput> {
    let _span = info_span!("run", input = %args.input.input.display()).entered();
    let loaded = load_tables(args.input.tables.tables.as_deref())?;
    let input = load_input(&args.input.input)?;
    let output = run_crosswalk(&input, &loaded.tables, &args.options())?;

    match &args.output {
        Some(path) => write_output(&output, path, args.pretty)?,
        None => {
            let text = render_output(&output, args.pretty)?;
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{text}").context("write output to stdout")?;
        }
    }
    Ok(output)
}

pub fn run_tables(args: &TablesArgs) -> Result<VerifySummary> {
    let loaded = load_tables(args.tables.as_deref())?;
    Ok(loaded.summary)
}

pub fn run_flatten(args: &FlattenArgs) -> Result<Vec<FlatRow>> {
    let loaded = load_tables(args.input.tables.tables.as_deref())?;
    let input = load_input(&args.input.input)?;
    flatten_rows(&input, &loaded.tables, &args.input.options())
}
