// src/parse/redirect.rs

//! Extraction of `<`, `>` and `>>` from a command segment.

use crate::errors::{Result, ShellError};
use crate::types::{RedirectKind, Redirection};

/// True for tokens that can never be used as a filename operand.
fn is_operator(token: &str) -> bool {
    matches!(token, "<" | ">" | ">>" | "|" | "||")
}

/// Split a segment into its command tokens and its redirections.
///
/// Non-operator tokens keep their relative order. Redirections are returned
/// in encounter order, which is also the order they are applied in.
pub fn extract_redirections(tokens: &[String]) -> Result<(Vec<String>, Vec<Redirection>)> {
    let mut command = Vec::with_capacity(tokens.len());
    let mut redirections = Vec::new();
    let mut iter = tokens.iter();

    while let Some(token) = iter.next() {
        match RedirectKind::from_operator(token) {
            Some(kind) => {
                let target = iter
                    .next()
                    .filter(|t| !is_operator(t))
                    .ok_or_else(|| ShellError::syntax("missing filename"))?;
                redirections.push(Redirection::new(kind, target));
            }
            None => command.push(token.clone()),
        }
    }

    Ok((command, redirections))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn toks(s: &str) -> Vec<String> {
        s.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn pulls_out_all_three_operators() {
        let (cmd, redirs) = extract_redirections(&toks("sort < in.txt -r > out.txt >> log")).unwrap();
        assert_eq!(cmd, toks("sort -r"));
        assert_eq!(
            redirs,
            vec![
                Redirection::new(RedirectKind::Read, "in.txt"),
                Redirection::new(RedirectKind::Write, "out.txt"),
                Redirection::new(RedirectKind::Append, "log"),
            ]
        );
    }

    #[test]
    fn missing_filename_is_a_syntax_error() {
        let err = extract_redirections(&toks("echo hi >")).unwrap_err();
        assert!(matches!(err, ShellError::Syntax(ref m) if m == "missing filename"));

        let err = extract_redirections(&toks("cat < > out")).unwrap_err();
        assert!(matches!(err, ShellError::Syntax(_)));
    }

    #[test]
    fn operator_only_segment_yields_empty_command() {
        let (cmd, redirs) = extract_redirections(&toks("> out")).unwrap();
        assert!(cmd.is_empty());
        assert_eq!(redirs.len(), 1);
    }

    proptest! {
        #[test]
        fn redirection_free_segments_pass_through(
            words in proptest::collection::vec("[a-z0-9./-]{1,8}", 0..8)
        ) {
            let (cmd, redirs) = extract_redirections(&words).unwrap();
            prop_assert_eq!(cmd, words);
            prop_assert!(redirs.is_empty());
        }
    }
}
