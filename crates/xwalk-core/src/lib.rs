#![deny(unsafe_code)]

pub mod bins;
pub mod context;
pub mod dataset;
pub mod finalize;
pub mod groups;
pub mod ids;
pub mod link;
pub mod pipeline;
pub mod steps;
pub mod strip;

pub use bins::{Bins, DATUM_MARKER, bin_leaves, group_bin, group_bins};
pub use context::CrosswalkContext;
pub use dataset::reshape_dataset;
pub use finalize::{clear_references, finalize};
pub use groups::build_groups;
pub use ids::{IdArena, ReferenceRegistry, assign_record, assign_section, category};
pub use link::{CrossLinker, record_references};
pub use pipeline::{CrosswalkOutput, Crosswalker, Extraction, run_pipeline};
pub use steps::{
    CrossLinkStep, DataGroupStep, DocumentPipeline, DocumentStep, FinalizeStep, PipelineState,
    build_document_pipeline,
};
pub use strip::{strip_record, strip_records};
