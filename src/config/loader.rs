// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::Result;

/// Load a configuration file and return the raw, unvalidated model.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path and validate it.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw_config = load_from_path(&path)?;
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}

/// Resolve the configuration for a run.
///
/// An explicitly requested file must exist. The default file is optional:
/// when it is absent the built-in defaults apply.
pub fn load_config(explicit: Option<&Path>) -> Result<ConfigFile> {
    match explicit {
        Some(path) => load_and_validate(path),
        None => {
            let path = default_config_path();
            if path.is_file() {
                load_and_validate(&path)
            } else {
                debug!(path = %path.display(), "no config file; using defaults");
                Ok(ConfigFile::default())
            }
        }
    }
}

/// `Minish.toml` in the current working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Minish.toml")
}
