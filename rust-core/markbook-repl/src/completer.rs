// SPDX-License-Identifier: PMPL-1.0-or-later
//!
//! Tab-completion for the Markbook shell.
//!
//! Completes command verbs and clause keywords (SHOW, SORT BY, ASC, ...)
//! plus the `FIELD=` argument markers. Matching is case-insensitive; the
//! replacement preserves the user's casing style (upper if the prefix is
//! uppercase, otherwise lowercase).

use rustyline::completion::{Completer, Pair};
use rustyline::Context;

/// Command verbs and clause keywords.
const KEYWORDS: &[&str] = &[
    "OPEN", "SHOW", "ALL", "SUMMARY", "PROGRAMME", "SORT", "BY", "ASC", "DESC",
    "FIND", "INSERT", "QUERY", "UPDATE", "DELETE", "SET", "AUTOSAVE", "ON",
    "OFF", "SAVE", "UNDO", "HELP", "EXIT", "QUIT",
];

/// Argument markers, offered with the trailing `=` already in place.
const FIELD_MARKERS: &[&str] = &["ID=", "NAME=", "PROGRAMME=", "MARK="];

/// Tab-completer for command input.
pub struct CommandCompleter;

impl Completer for CommandCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let (start, prefix) = find_word_start(line, pos);
        let mut candidates = Vec::new();

        if prefix.is_empty() {
            return Ok((start, candidates));
        }

        let upper_prefix = prefix.to_uppercase();
        let use_upper = prefix
            .chars()
            .all(|c| c.is_uppercase() || !c.is_alphabetic());

        for word in FIELD_MARKERS.iter().chain(KEYWORDS) {
            if word.starts_with(&upper_prefix) {
                let replacement = if use_upper {
                    word.to_string()
                } else {
                    word.to_lowercase()
                };
                candidates.push(Pair {
                    display: word.to_string(),
                    replacement,
                });
            }
        }

        Ok((start, candidates))
    }
}

/// Find the start position and text of the word being completed.
///
/// Scans backwards from `pos` to find the beginning of the current token.
/// Tokens are delimited by whitespace and double quotes.
fn find_word_start(line: &str, pos: usize) -> (usize, &str) {
    let bytes = line.as_bytes();
    let mut start = pos;

    while start > 0 {
        let ch = bytes[start - 1] as char;
        if ch.is_whitespace() || ch == '"' {
            break;
        }
        start -= 1;
    }

    (start, &line[start..pos])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_word_start_middle() {
        let (start, prefix) = find_word_start("SHOW SUMM", 9);
        assert_eq!(start, 5);
        assert_eq!(prefix, "SUMM");
    }

    #[test]
    fn test_find_word_start_beginning() {
        let (start, prefix) = find_word_start("INS", 3);
        assert_eq!(start, 0);
        assert_eq!(prefix, "INS");
    }

    #[test]
    fn test_find_word_start_after_quote() {
        let (start, prefix) = find_word_start("FIND NAME=\"mi", 13);
        assert_eq!(start, 11);
        assert_eq!(prefix, "mi");
    }

    #[test]
    fn test_find_word_start_empty() {
        let (start, prefix) = find_word_start("SHOW ", 5);
        assert_eq!(start, 5);
        assert_eq!(prefix, "");
    }

    // Note: full Completer::complete tests require a rustyline Context,
    // which is difficult to construct in unit tests. The word-finding
    // logic tested above is the core of the completion behaviour.
}
