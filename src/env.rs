// src/env.rs

//! Environment variable storage.
//!
//! The shell never mutates its own process environment. Builtins write into
//! an [`EnvStore`], and the launcher applies the store to every child it
//! spawns.

use std::collections::{BTreeMap, HashMap};
use std::fmt::Debug;

use tokio::process::Command;

/// Key/value store for the shell's environment.
pub trait EnvStore: Send + Debug {
    fn get(&self, name: &str) -> Option<String>;
    fn set(&mut self, name: &str, value: &str);
    fn remove(&mut self, name: &str);

    /// Configure a child command so it sees exactly this environment.
    fn apply(&self, cmd: &mut Command);
}

/// Production store: the inherited process environment plus an overlay of
/// changes made by `export` / `unset` / `cd`.
#[derive(Debug, Clone, Default)]
pub struct ShellEnv {
    /// `Some(value)` for exported names, `None` for unset ones.
    overlay: HashMap<String, Option<String>>,
}

impl ShellEnv {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EnvStore for ShellEnv {
    fn get(&self, name: &str) -> Option<String> {
        match self.overlay.get(name) {
            Some(value) => value.clone(),
            None => std::env::var(name).ok(),
        }
    }

    fn set(&mut self, name: &str, value: &str) {
        self.overlay
            .insert(name.to_string(), Some(value.to_string()));
    }

    fn remove(&mut self, name: &str) {
        self.overlay.insert(name.to_string(), None);
    }

    fn apply(&self, cmd: &mut Command) {
        for (name, value) in &self.overlay {
            match value {
                Some(value) => cmd.env(name, value),
                None => cmd.env_remove(name),
            };
        }
    }
}

/// Self-contained store that does not inherit anything from the process.
///
/// Children launched with it get exactly these variables (`env_clear`).
#[derive(Debug, Clone, Default)]
pub struct MemoryEnv {
    vars: BTreeMap<String, String>,
}

impl MemoryEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_var(mut self, name: &str, value: &str) -> Self {
        self.set(name, value);
        self
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl EnvStore for MemoryEnv {
    fn get(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }

    fn set(&mut self, name: &str, value: &str) {
        self.vars.insert(name.to_string(), value.to_string());
    }

    fn remove(&mut self, name: &str) {
        self.vars.remove(name);
    }

    fn apply(&self, cmd: &mut Command) {
        cmd.env_clear().envs(&self.vars);
    }
}
