// src/parse/tokenizer.rs

//! Line → word tokens.
//!
//! Words are separated by whitespace. A backslash makes the following
//! character literal; there is no other quoting.
//!
//! Escapes are resolved while splitting, not before it, so an escaped blank
//! joins words: `a\ b` is the single word `a b`. This is intentional and
//! gives a way to pass a path containing spaces.

/// Strip a trailing background marker from a raw line.
///
/// Returns the remaining line (with the whitespace before `&` removed) and
/// whether a marker was found. An escaped `\&` is left in place.
pub fn strip_background(line: &str) -> (&str, bool) {
    let trimmed = line.trim_end();
    let Some(rest) = trimmed.strip_suffix('&') else {
        return (trimmed, false);
    };

    let backslashes = rest.chars().rev().take_while(|&c| c == '\\').count();
    if backslashes % 2 == 1 {
        return (trimmed, false);
    }

    (rest.trim_end(), true)
}

/// Split a line into word tokens, collapsing backslash escapes.
pub fn tokenize(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current: Option<String> = None;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                // A lone trailing backslash stays literal.
                let literal = chars.next().unwrap_or('\\');
                current.get_or_insert_with(String::new).push(literal);
            }
            c if c.is_whitespace() => {
                if let Some(word) = current.take() {
                    tokens.push(word);
                }
            }
            c => current.get_or_insert_with(String::new).push(c),
        }
    }

    if let Some(word) = current {
        tokens.push(word);
    }

    tokens
}
