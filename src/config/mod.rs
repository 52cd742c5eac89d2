// src/config/mod.rs

//! Configuration loading and validation.
//!
//! - [`model`]: the TOML-backed data model.
//! - [`loader`]: reading a file from disk (or falling back to defaults).
//! - [`validate`]: turning the raw model into a checked `ConfigFile`.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_config, load_from_path};
pub use model::{ConfigFile, JobsConfig, RawConfigFile, RawJobsSection, ShellSection};
pub use validate::{parse_duration, parse_grace_period, MAX_GRACE_PERIOD};
