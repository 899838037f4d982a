//! CLI library components for the SciData crosswalk.

pub mod logging;
pub mod pipeline;
