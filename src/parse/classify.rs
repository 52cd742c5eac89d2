// src/parse/classify.rs

//! One-shot classification of a tokenised line.
//!
//! All the compatibility rules between builtins, pipelines, `||` and `&` live
//! here, so the executor only ever sees well-formed shapes.

use std::fmt;

use crate::builtins::Builtin;
use crate::errors::{Result, ShellError};
use crate::types::Redirection;

use super::pipeline::split_pipeline;
use super::redirect::extract_redirections;
use super::tokenizer::{strip_background, tokenize};

/// A single program invocation with its redirections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleCommand {
    /// Program name followed by its arguments; never empty.
    pub argv: Vec<String>,
    pub redirections: Vec<Redirection>,
}

impl SimpleCommand {
    pub fn program(&self) -> &str {
        &self.argv[0]
    }

    pub fn args(&self) -> &[String] {
        &self.argv[1..]
    }
}

impl fmt::Display for SimpleCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.argv.join(" "))
    }
}

/// One side of a `||` chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Clause {
    Builtin(Builtin),
    Simple(SimpleCommand),
    Pipeline(Vec<SimpleCommand>),
}

/// The shape of a whole input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandLine {
    Empty,
    Builtin(Builtin),
    Simple(SimpleCommand),
    Background(SimpleCommand),
    Pipeline(Vec<SimpleCommand>),
    /// `c1 || c2 [|| c3 ...]`; always at least two clauses.
    Conditional(Vec<Clause>),
}

/// Strip `&`, tokenise and classify a raw input line.
pub fn parse_line(line: &str) -> Result<CommandLine> {
    let (line, background) = strip_background(line);
    let tokens = tokenize(line);
    classify(&tokens, background)
}

/// Classify an already tokenised line.
pub fn classify(tokens: &[String], background: bool) -> Result<CommandLine> {
    if tokens.is_empty() {
        return if background {
            Err(ShellError::syntax("missing command"))
        } else {
            Ok(CommandLine::Empty)
        };
    }

    let has_or = tokens.iter().any(|t| t == "||");
    let has_pipe = tokens.iter().any(|t| t == "|");

    if background && (has_or || has_pipe) {
        return Err(unsupported());
    }

    if has_or {
        let clauses = tokens
            .split(|t| t == "||")
            .map(|side| {
                if side.is_empty() {
                    Err(ShellError::syntax("missing command around ||"))
                } else {
                    classify_clause(side)
                }
            })
            .collect::<Result<Vec<_>>>()?;
        return Ok(CommandLine::Conditional(clauses));
    }

    let line = match (classify_clause(tokens)?, background) {
        (Clause::Builtin(_), true) => return Err(unsupported()),
        (Clause::Builtin(builtin), false) => CommandLine::Builtin(builtin),
        (Clause::Simple(cmd), true) => CommandLine::Background(cmd),
        (Clause::Simple(cmd), false) => CommandLine::Simple(cmd),
        (Clause::Pipeline(stages), _) => CommandLine::Pipeline(stages),
    };
    Ok(line)
}

fn unsupported() -> ShellError {
    ShellError::syntax("unsupported combination")
}

fn classify_clause(tokens: &[String]) -> Result<Clause> {
    let mut segments = split_pipeline(tokens);

    match segments.len() {
        0 => Err(ShellError::syntax("empty pipeline")),
        1 => single_segment(&segments.remove(0)),
        _ => {
            let stages = segments
                .iter()
                .map(|segment| pipeline_stage(segment))
                .collect::<Result<Vec<_>>>()?;
            Ok(Clause::Pipeline(stages))
        }
    }
}

fn single_segment(tokens: &[String]) -> Result<Clause> {
    let (argv, redirections) = extract_redirections(tokens)?;
    if argv.is_empty() {
        return Err(ShellError::syntax("missing command"));
    }

    match Builtin::from_argv(&argv) {
        Some(_) if !redirections.is_empty() => Err(unsupported()),
        Some(builtin) => Ok(Clause::Builtin(builtin)),
        None => Ok(Clause::Simple(SimpleCommand { argv, redirections })),
    }
}

fn pipeline_stage(tokens: &[String]) -> Result<SimpleCommand> {
    let (argv, redirections) = extract_redirections(tokens)?;
    match argv.first() {
        None => Err(ShellError::syntax("missing command")),
        Some(name) if Builtin::is_builtin_name(name) => {
            Err(ShellError::Pipeline("builtin in pipeline".to_string()))
        }
        Some(_) => Ok(SimpleCommand { argv, redirections }),
    }
}
