//! CLI argument definitions for the SciData crosswalk.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use xwalk_model::{AmbiguityPolicy, DatasetGrouping, PipelineOptions};

#[derive(Parser)]
#[command(
    name = "scidata-xwalk",
    version,
    about = "SciData crosswalk - Convert nested database records to SciData JSON-LD",
    long_about = "Annotate nested database records with crosswalk entries and assemble\n\
                  the methodology, system and dataset sections of a SciData document.\n\n\
                  Lookup tables are read from a directory described by manifest.toml."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow record values to appear in logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the crosswalk over a JSON record and write the document.
    Run(RunArgs),

    /// Verify the table manifest and print table counts.
    Tables(TablesArgs),

    /// Print the annotated, flattened leaves for writing override and link rules.
    Flatten(FlattenArgs),
}

#[derive(Args)]
pub struct TablesArgs {
    /// Table directory (default: $XWALK_TABLES_DIR or the bundled tables/).
    #[arg(long = "tables", value_name = "DIR")]
    pub tables: Option<PathBuf>,
}

#[derive(Args)]
pub struct InputArgs {
    /// JSON file holding the nested record.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Name of the root (central) table of the record.
    #[arg(long = "root", value_name = "TABLE")]
    pub root: String,

    #[command(flatten)]
    pub tables: TablesArgs,

    /// Require crosswalk entries to match the enclosing table name.
    #[arg(long = "match-table")]
    pub match_table: bool,

    /// Leave a leaf unannotated when several crosswalk entries match it.
    #[arg(long = "skip-ambiguous")]
    pub skip_ambiguous: bool,

    /// Group dataset leaves by record position instead of by subsection.
    #[arg(long = "group-by-position")]
    pub group_by_position: bool,
}

#[derive(Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Output file for the document (default: stdout).
    #[arg(long = "output", short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Keep per-field `k#`/`k##` trace fields and the pre-override `##` link.
    #[arg(long = "trace-fields")]
    pub trace_fields: bool,

    /// Keep `#`/`##` bookkeeping on every record.
    #[arg(long = "keep-references")]
    pub keep_references: bool,

    /// Prefix accepted in `prefix:term` values besides the resolved namespaces.
    #[arg(long = "namespace", value_name = "PREFIX")]
    pub extra_namespaces: Vec<String>,

    /// Pretty-print the output JSON.
    #[arg(long = "pretty")]
    pub pretty: bool,
}

#[derive(Args)]
pub struct FlattenArgs {
    #[command(flatten)]
    pub input: InputArgs,
}

impl InputArgs {
    pub fn options(&self) -> PipelineOptions {
        PipelineOptions::new()
            .with_root_table(self.root.clone())
            .with_match_table(self.match_table)
            .with_ambiguity(if self.skip_ambiguous {
                AmbiguityPolicy::Skip
            } else {
                AmbiguityPolicy::FirstEntry
            })
            .with_dataset_grouping(if self.group_by_position {
                DatasetGrouping::ByPosition
            } else {
                DatasetGrouping::BySubsection
            })
    }
}

impl RunArgs {
    pub fn options(&self) -> PipelineOptions {
        self.extra_namespaces.iter().fold(
            self.input
                .options()
                .with_trace_fields(self.trace_fields)
                .with_keep_references(self.keep_references),
            |options, prefix| options.with_extra_namespace(prefix.clone()),
        )
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
