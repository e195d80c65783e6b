//! Splits `|`-delimited log lines into the columns named by a [`LogColumnMap`].
//!
//! Terminal colour codes are stripped before anything is compared or stored,
//! so `"\x1b[0;31mERROR\x1b[0m"` and `"ERROR"` are the same level.

use crate::model::LogColumnMap;
use std::borrow::Cow;


pub const DELIMITER: char = '|';

pub const LEVEL_ERROR: &str = "ERROR";
pub const LEVEL_WARN: &str = "WARN";
pub const LEVEL_WARNING: &str = "WARNING";

/// Borrowed view over one well-formed line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine<'a> {
    pub timestamp: &'a str,
    pub user: &'a str,
    pub request_id: &'a str,
    /// Colour-free, upper-cased.
    pub level: String,
    pub message: &'a str,
}

impl LogLine<'_> {
    pub fn is_error(&self) -> bool {
        self.level == LEVEL_ERROR
    }

    pub fn is_warning(&self) -> bool {
        self.level == LEVEL_WARN || self.level == LEVEL_WARNING
    }
}

/// Returns `None` for lines with fewer fields than the map references.
pub fn tokenize<'a>(line: &'a str, columns: &LogColumnMap) -> Option<LogLine<'a>> {
    let tokens: Vec<&'a str> = line.split(DELIMITER).map(str::trim).collect();
    if tokens.len() < columns.min_tokens() {
        return None;
    }

    Some(LogLine {
        timestamp: tokens[columns.timestamp],
        user: tokens[columns.user],
        request_id: tokens[columns.request_id],
        level: normalize_level(tokens[columns.level]),
        message: tokens[columns.message],
    })
}

pub fn normalize_level(raw: &str) -> String {
    strip_ansi(raw).trim().to_uppercase()
}

/// Removes ANSI escape sequences (`ESC [ params final-byte`).
pub fn strip_ansi(text: &str) -> Cow<'_, str> {
    if !text.contains('\x1b') {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\x1b' {
            out.push(c);
            continue;
        }
        if chars.peek() != Some(&'[') {
            // Lone ESC, nothing to strip beyond it.
            continue;
        }
        chars.next();
        for c in chars.by_ref() {
            if ('@'..='~').contains(&c) {
                break;
            }
        }
    }
    Cow::Owned(out)
}
