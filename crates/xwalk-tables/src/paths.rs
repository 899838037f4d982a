//! Table directory path resolution.

use std::path::PathBuf;

/// Environment variable for overriding the tables directory.
pub const TABLES_ENV_VAR: &str = "XWALK_TABLES_DIR";

/// Get the tables root directory.
///
/// Resolution order:
/// 1. `XWALK_TABLES_DIR` environment variable
/// 2. `tables/` directory relative to workspace root
pub fn tables_root() -> PathBuf {
    if let Ok(root) = std::env::var(TABLES_ENV_VAR) {
        return PathBuf::from(root);
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../tables")
}
