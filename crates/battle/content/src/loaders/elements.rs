//! Elemental affinity table loader.
//!
//! The file holds overrides on top of the built-in table, one `[[entry]]`
//! per cell. Deployments ship only the cells they tune.

use std::path::Path;

use serde::Deserialize;

use battle_core::{Element, ElementTable};

use crate::loaders::{LoadResult, read_file};
use crate::tables::standard_elements;

#[derive(Debug, Deserialize)]
struct ElementEntry {
    def_level: u8,
    attack: Element,
    defend: Element,
    pct: i16,
}

#[derive(Debug, Default, Deserialize)]
struct ElementFile {
    #[serde(default)]
    entry: Vec<ElementEntry>,
}

/// Loader applying affinity overrides from a TOML file.
pub struct ElementTableLoader;

impl ElementTableLoader {
    pub fn load(path: &Path) -> LoadResult<ElementTable> {
        let content = read_file(path)?;
        Self::from_str(&content)
    }

    pub fn from_str(content: &str) -> LoadResult<ElementTable> {
        let file: ElementFile = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse element table TOML: {}", e))?;
        let mut table = standard_elements();
        for entry in file.entry {
            table.set(entry.def_level, entry.attack, entry.defend, entry.pct);
        }
        Ok(table)
    }
}
