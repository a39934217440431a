// SPDX-License-Identifier: PMPL-1.0-or-later
//! Command-argument grammar: `KEY=value` and `KEY="quoted value"` extraction.
//!
//! Commands carry their arguments as flat `KEY=value` pairs in any order,
//! mixing quoted text values and bare numeric values. Rather than a boundary
//! heuristic re-derived per lookup, a single left-to-right scan tokenises the
//! line into recognised field markers and quoted spans:
//!
//! - A marker is a known field name followed by `=`, case-insensitive, at
//!   the start of the line or after whitespace. Markers inside quoted spans
//!   are not markers.
//! - A quoted value runs to the next `"`; a missing closing quote is a
//!   parse failure.
//! - A bare value runs to the next marker or end of line, with trailing
//!   whitespace trimmed.
//! - An absent field is `None`, not an error; callers decide whether
//!   absence is fatal. The first occurrence of a duplicated field wins.

use std::fmt;

use crate::error::MarkbookError;
use crate::record::{MAX_MARK, MIN_MARK};

/// The fixed field vocabulary of the command surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Id,
    Name,
    Programme,
    Mark,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::Id, Field::Name, Field::Programme, Field::Mark];

    /// The marker text as it appears (case-insensitively) in a command.
    pub fn marker(self) -> &'static str {
        match self {
            Field::Id => "ID",
            Field::Name => "NAME",
            Field::Programme => "PROGRAMME",
            Field::Mark => "MARK",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.marker())
    }
}

/// A recognised `FIELD=` occurrence in the raw line.
#[derive(Debug, Clone, Copy)]
struct Marker {
    field: Field,
    /// Byte offset of the field name.
    start: usize,
    /// Byte offset of the first value character (just past `=`).
    value_at: usize,
}

/// Extract the value of `field` from a raw command line.
///
/// Returns `Ok(None)` when the field marker does not occur anywhere in the
/// line, and `Err(UnclosedQuote)` when a quoted value is never terminated.
pub fn extract(raw: &str, field: Field) -> Result<Option<String>, MarkbookError> {
    let markers = scan_markers(raw);
    let Some(pos) = markers.iter().position(|m| m.field == field) else {
        return Ok(None);
    };
    let marker = markers[pos];
    let rest = &raw[marker.value_at..];

    if let Some(quoted) = rest.strip_prefix('"') {
        match quoted.find('"') {
            Some(end) => Ok(Some(quoted[..end].to_string())),
            None => Err(MarkbookError::UnclosedQuote(field)),
        }
    } else {
        let end = markers
            .get(pos + 1)
            .map(|next| next.start)
            .unwrap_or(raw.len());
        Ok(Some(raw[marker.value_at..end].trim_end().to_string()))
    }
}

/// Parse a positive record identifier. Strict: `"12abc"` is rejected.
pub fn parse_id(value: &str) -> Result<u32, MarkbookError> {
    value
        .parse::<u32>()
        .ok()
        .filter(|&id| id > 0)
        .ok_or(MarkbookError::InvalidId)
}

/// Parse a mark and range-check it against `[MIN_MARK, MAX_MARK]`.
pub fn parse_mark(value: &str) -> Result<f64, MarkbookError> {
    value
        .parse::<f64>()
        .ok()
        .filter(|m| m.is_finite() && (MIN_MARK..=MAX_MARK).contains(m))
        .ok_or(MarkbookError::InvalidMark)
}

/// Scan the line once, left to right, recording every field marker that is
/// outside a quoted span and preceded by whitespace (or at offset zero).
fn scan_markers(raw: &str) -> Vec<Marker> {
    let bytes = raw.as_bytes();
    let mut markers = Vec::new();
    let mut in_quote = false;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'"' {
            in_quote = !in_quote;
            i += 1;
            continue;
        }
        let at_boundary = i == 0 || bytes[i - 1].is_ascii_whitespace();
        if !in_quote && at_boundary {
            if let Some((field, len)) = match_marker(&raw[i..]) {
                markers.push(Marker {
                    field,
                    start: i,
                    value_at: i + len,
                });
                i += len;
                continue;
            }
        }
        i += 1;
    }

    markers
}

/// Match a `FIELD=` marker at the start of `rest`, returning the field and
/// the marker length including the `=`.
fn match_marker(rest: &str) -> Option<(Field, usize)> {
    for field in Field::ALL {
        let name = field.marker();
        if rest.len() > name.len()
            && rest.as_bytes()[name.len()] == b'='
            && rest[..name.len()].eq_ignore_ascii_case(name)
        {
            return Some((field, name.len() + 1));
        }
    }
    None
}
