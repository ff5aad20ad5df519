//! Line classifier.
//!
//! [`parse_line`] runs a single left-to-right scan over one logical line and
//! decides what it is. Backslash escapes are resolved inline through
//! [`crate::escape::unescape`] in both key and value; comment bodies are
//! taken verbatim.
//!
//! ## Examples
//!
//! ```rust
//! use commented_properties::parser::{parse_line, Line};
//!
//! assert_eq!(
//!     parse_line("test : 123", 1).unwrap(),
//!     Line::Entry { key: "test".into(), value: "123".into() }
//! );
//! assert_eq!(parse_line("  #  Title", 1).unwrap(), Line::Comment("Title".into()));
//! assert_eq!(parse_line(" \t ", 1).unwrap(), Line::Blank);
//! ```

use std::str::Chars;

use crate::error::{Error, Result};
use crate::escape::unescape;

/// Classification of one logical line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    /// Nothing but whitespace.
    Blank,
    /// A `#` or `!` comment; holds the body after the marker and its
    /// following whitespace.
    Comment(String),
    /// A key/value pair, both unescaped.
    Entry { key: String, value: String },
    /// Separators only, with neither key nor value.
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    LineStart,
    CommentStart,
    Comment,
    Key,
    ValueStart,
    Value,
}

fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\x0C' | '\r')
}

fn is_separator(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\x0C' | '=' | ':')
}

/// Parses one logical line. `line` is only used for error positions.
///
/// Leading whitespace is skipped. A `#` or `!` as the first non-blank
/// character starts a comment. Otherwise the key runs until the first
/// unescaped separator, after which any run of whitespace, `=` and `:` is
/// skipped. An escape in the value ends that skipping, so `\ ` keeps a
/// leading space.
///
/// # Errors
///
/// Returns [`Error::MalformedEscape`] for a truncated or non-hex `\uXXXX`
/// escape or an unpaired surrogate.
pub fn parse_line(text: &str, line: usize) -> Result<Line> {
    let mut chars = text.chars();
    let mut state = State::LineStart;
    let mut key = String::new();
    let mut value = String::new();

    while let Some(c) = chars.next() {
        match state {
            State::LineStart if is_whitespace(c) => {}
            State::LineStart if c == '#' || c == '!' => state = State::CommentStart,
            State::CommentStart if is_whitespace(c) => {}
            State::CommentStart | State::Comment => {
                state = State::Comment;
                value.push(c);
            }
            State::LineStart | State::Key => {
                state = State::Key;
                match c {
                    '\\' => push_unescaped(&mut key, &mut chars, text, line)?,
                    c if is_separator(c) => state = State::ValueStart,
                    '\r' => {}
                    c => key.push(c),
                }
            }
            State::ValueStart if is_whitespace(c) || is_separator(c) => {}
            State::ValueStart | State::Value => {
                state = State::Value;
                if c == '\\' {
                    push_unescaped(&mut value, &mut chars, text, line)?;
                } else {
                    value.push(c);
                }
            }
        }
    }

    Ok(match state {
        State::LineStart => Line::Blank,
        State::CommentStart | State::Comment => Line::Comment(value),
        _ if key.is_empty() && value.is_empty() => Line::Empty,
        _ => Line::Entry { key, value },
    })
}

fn push_unescaped(out: &mut String, chars: &mut Chars<'_>, text: &str, line: usize) -> Result<()> {
    // byte offset of the backslash just consumed
    let offset = text.len() - chars.as_str().len() - 1;
    match unescape(chars) {
        Ok(Some(c)) => {
            out.push(c);
            Ok(())
        }
        Ok(None) => Ok(()),
        Err(source) => {
            let col = text[..offset].chars().count() + 1;
            Err(Error::malformed_escape(line, col, source))
        }
    }
}
