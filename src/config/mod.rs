// src/config/mod.rs

//! Configuration loading and validation for status-reporter.
//!
//! Responsibilities:
//! - Define the optional TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Merge CLI, environment and file values into validated settings
//!   structs that are passed into constructors (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_from_path, load_optional};
pub use model::{ApiSection, ClusterSection, LabelSection, RawConfigFile};
pub use validate::{
    ApiSettings, ClusterSettings, LabelSettings, ReportSettings, WatchSettings,
};
