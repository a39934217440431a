// SPDX-License-Identifier: PMPL-1.0-or-later
//!
//! Syntax highlighting for the Markbook shell.
//!
//! Implements `rustyline::highlight::Highlighter` to colour command verbs,
//! field markers, quoted string values, and numeric values as the user
//! types.

use colored::Colorize;
use rustyline::highlight::Highlighter;
use std::borrow::Cow;

/// Command verbs and clause keywords, coloured blue/bold.
const COMMAND_KEYWORDS: &[&str] = &[
    "OPEN", "SHOW", "ALL", "SUMMARY", "SORT", "BY", "ASC", "DESC", "FIND",
    "INSERT", "QUERY", "UPDATE", "DELETE", "SET", "AUTOSAVE", "ON", "OFF",
    "SAVE", "UNDO", "HELP", "EXIT", "QUIT",
];

/// Field markers (also the PROGRAMME clause keyword), coloured green/bold.
const FIELD_NAMES: &[&str] = &["ID", "NAME", "PROGRAMME", "MARK"];

/// Syntax highlighter for command input lines.
///
/// This is used by the rustyline `Editor` to provide real-time colouring
/// as the user types commands.
pub struct CommandHighlighter;

impl Highlighter for CommandHighlighter {
    /// Highlight the input line with ANSI colour codes.
    ///
    /// The highlighting strategy is token-based:
    /// 1. Double-quoted values are coloured yellow.
    /// 2. Tokens matching command keywords are coloured blue and bold.
    /// 3. Tokens matching field names are coloured green and bold.
    /// 4. Numeric tokens are coloured cyan.
    /// 5. Everything else is left uncoloured.
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        Cow::Owned(highlight_line(line))
    }

    /// Indicate that we always want to repaint when the line changes.
    fn highlight_char(
        &self,
        _line: &str,
        _pos: usize,
        _forced: rustyline::highlight::CmdKind,
    ) -> bool {
        true
    }

    /// The prompt is coloured in main, not here.
    fn highlight_prompt<'b, 's: 'b, 'p: 'b>(
        &'s self,
        prompt: &'p str,
        _default: bool,
    ) -> Cow<'b, str> {
        Cow::Borrowed(prompt)
    }

    /// Highlight a hint (dimmed text shown after the cursor).
    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Cow::Owned(hint.dimmed().to_string())
    }

    fn highlight_candidate<'c>(
        &self,
        candidate: &'c str,
        _completion: rustyline::CompletionType,
    ) -> Cow<'c, str> {
        Cow::Borrowed(candidate)
    }
}

/// Apply syntax highlighting to a single command line.
///
/// Quoted values are handled as atomic units so that keywords inside them
/// are not incorrectly coloured.
fn highlight_line(line: &str) -> String {
    let mut result = String::with_capacity(line.len() * 2);
    let chars: Vec<char> = line.chars().collect();
    let len = chars.len();
    let mut i = 0;

    while i < len {
        let ch = chars[i];

        // Quoted values.
        if ch == '"' {
            let start = i;
            i += 1;
            while i < len && chars[i] != '"' {
                i += 1;
            }
            if i < len {
                i += 1; // Consume closing quote.
            }
            let value: String = chars[start..i].iter().collect();
            result.push_str(&value.yellow().to_string());
            continue;
        }

        // Word tokens (verbs and field names).
        if ch.is_alphabetic() || ch == '_' {
            let start = i;
            while i < len && (chars[i].is_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            let word: String = chars[start..i].iter().collect();
            let upper = word.to_uppercase();

            if FIELD_NAMES.contains(&upper.as_str()) {
                result.push_str(&word.green().bold().to_string());
            } else if COMMAND_KEYWORDS.contains(&upper.as_str()) {
                result.push_str(&word.blue().bold().to_string());
            } else {
                result.push_str(&word);
            }
            continue;
        }

        // Numeric values (ids and marks).
        if ch.is_ascii_digit() || (ch == '-' && i + 1 < len && chars[i + 1].is_ascii_digit()) {
            let start = i;
            if ch == '-' {
                i += 1;
            }
            while i < len && (chars[i].is_ascii_digit() || chars[i] == '.') {
                i += 1;
            }
            let num: String = chars[start..i].iter().collect();
            result.push_str(&num.cyan().to_string());
            continue;
        }

        // Pass through everything else (whitespace, '=', etc.).
        result.push(ch);
        i += 1;
    }

    result
}
