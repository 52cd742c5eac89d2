// src/parse/mod.rs

//! Turning an input line into something the executor can run.
//!
//! - [`tokenizer`] splits a line into words and strips a trailing `&`.
//! - [`redirect`] pulls `<`, `>`, `>>` out of a command segment.
//! - [`pipeline`] splits a token sequence on `|`.
//! - [`classify`] decides, once per line, which execution path applies.

pub mod classify;
pub mod pipeline;
pub mod redirect;
pub mod tokenizer;

pub use classify::{classify, parse_line, Clause, CommandLine, SimpleCommand};
pub use pipeline::split_pipeline;
pub use redirect::extract_redirections;
pub use tokenizer::{strip_background, tokenize};
