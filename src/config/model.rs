// src/config/model.rs

use std::time::Duration;

use serde::Deserialize;

/// Configuration as read from a TOML file, before validation.
///
/// ```toml
/// [shell]
/// prompt = "$: "
/// show_cwd = true
/// report_timing = true
///
/// [jobs]
/// grace_period = "2s"
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub shell: ShellSection,

    #[serde(default)]
    pub jobs: RawJobsSection,
}

/// `[shell]` section: interactive presentation.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShellSection {
    /// Printed after the working directory line.
    #[serde(default = "default_prompt")]
    pub prompt: String,

    /// Print the current working directory above each prompt.
    #[serde(default = "default_true")]
    pub show_cwd: bool,

    /// Print elapsed time and exit code after every foreground command.
    #[serde(default = "default_true")]
    pub report_timing: bool,
}

fn default_prompt() -> String {
    "$: ".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for ShellSection {
    fn default() -> Self {
        Self {
            prompt: default_prompt(),
            show_cwd: true,
            report_timing: true,
        }
    }
}

/// `[jobs]` section as written in the file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawJobsSection {
    /// Duration string such as `"500ms"` or `"2s"`.
    #[serde(default)]
    pub grace_period: Option<String>,
}

/// Validated `[jobs]` section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobsConfig {
    pub grace_period: Duration,
}

/// Validated configuration. Only obtainable through `TryFrom<RawConfigFile>`
/// or `Default`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub shell: ShellSection,
    pub jobs: JobsConfig,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(shell: ShellSection, jobs: JobsConfig) -> Self {
        Self { shell, jobs }
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            shell: ShellSection::default(),
            jobs: JobsConfig {
                grace_period: crate::shell::DEFAULT_GRACE_PERIOD,
            },
        }
    }
}
