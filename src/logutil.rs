//! Logging helpers for keeping user-supplied text (owner ids, puppy names, chat
//! lines) on one log line.

use std::fmt::Write;

use crate::validation::{classify_char, TextChar};

/// Longest user text echoed into a log line, in characters.
pub const MAX_PREVIEW: usize = 120;

/// Render user text for a single log line.
///
/// Characters are classed the same way chat sanitizing classes them: line
/// breaks and tabs get their short escapes (`\n`, `\r`, `\t`), other control
/// characters become `\xNN`, and a literal backslash is doubled so escapes
/// stay unambiguous. Anything past [`MAX_PREVIEW`] characters is cut with an
/// ellipsis.
pub fn escape_log(s: &str) -> String {
    let mut out = String::with_capacity(s.len().min(MAX_PREVIEW) + 8);
    let mut chars = s.chars();
    for ch in chars.by_ref().take(MAX_PREVIEW) {
        match (classify_char(ch), ch) {
            (TextChar::Spacing, '\n') => out.push_str("\\n"),
            (TextChar::Spacing, '\r') => out.push_str("\\r"),
            (TextChar::Spacing, _) => out.push_str("\\t"),
            (TextChar::Control, c) => {
                let _ = write!(out, "\\x{:02X}", c as u32);
            }
            (TextChar::Plain, '\\') => out.push_str("\\\\"),
            (TextChar::Plain, c) => out.push(c),
        }
    }
    if chars.next().is_some() {
        out.push('…');
    }
    out
}
