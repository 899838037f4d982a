#![deny(unsafe_code)]

pub mod error;
pub mod hash;
pub mod loaders;
pub mod manifest;
pub mod paths;
pub mod registry;

pub use crate::error::TablesError;
pub use crate::paths::{TABLES_ENV_VAR, tables_root};
pub use crate::registry::{TableRegistry, VerifySummary};
