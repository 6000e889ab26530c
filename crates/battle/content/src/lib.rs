//! Static combat content and loaders.
//!
//! This crate houses everything the combat core treats as data: the skill
//! catalog (per-skill constants and formula handlers), the elemental affinity
//! table, and TOML loaders for the deployment config. The core consumes it
//! all through oracles and the handler registry; nothing here appears in
//! combat state.

pub mod catalog;
pub mod skills;
pub mod tables;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use catalog::{SkillCatalog, ids};
pub use skills::register_all;
pub use tables::standard_elements;

#[cfg(feature = "loaders")]
pub use loaders::{ConfigLoader, ElementTableLoader};
