// src/parse/pipeline.rs

//! Splitting a token sequence into pipeline segments.

/// Split on the literal `|` token.
///
/// Empty segments (leading/trailing `|`, or `| |`) are dropped. A result with
/// fewer than two segments is not a pipeline; the caller decides what to do.
pub fn split_pipeline(tokens: &[String]) -> Vec<Vec<String>> {
    tokens
        .split(|t| t == "|")
        .filter(|segment| !segment.is_empty())
        .map(<[String]>::to_vec)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn toks(s: &str) -> Vec<String> {
        s.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn splits_into_ordered_segments() {
        let segments = split_pipeline(&toks("cat f | grep x | wc -l"));
        assert_eq!(
            segments,
            vec![toks("cat f"), toks("grep x"), toks("wc -l")]
        );
    }

    #[test]
    fn drops_empty_segments() {
        assert_eq!(split_pipeline(&toks("| ls |")), vec![toks("ls")]);
        assert_eq!(split_pipeline(&toks("a | | b")), vec![toks("a"), toks("b")]);
        assert!(split_pipeline(&toks("|")).is_empty());
    }

    #[test]
    fn double_bar_is_not_a_pipe() {
        assert_eq!(split_pipeline(&toks("a || b")), vec![toks("a || b")]);
    }

    proptest! {
        #[test]
        fn pipe_free_input_is_one_segment(
            words in proptest::collection::vec("[a-z<>&]{1,6}", 1..10)
        ) {
            prop_assume!(words.iter().all(|w| w != "|"));
            let segments = split_pipeline(&words);
            prop_assert_eq!(segments, vec![words]);
        }
    }
}
