//! Loaders for the TOML-configurable parts of the combat data: the tunables
//! table and elemental affinity overrides. The skill catalog and handlers
//! stay in code; their formulas are behavior, not data.

pub mod config;
pub mod elements;

pub use config::ConfigLoader;
pub use elements::ElementTableLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
