//! Escaping engine for keys and values.
//!
//! Writing is a single left-to-right pass that expands each character into
//! its escaped form. Everything outside Basic Latin is written as one
//! `\uXXXX` escape per UTF-16 code unit, so the output is always ASCII.
//!
//! Reading goes through [`unescape`], which consumes exactly one escape
//! sequence from a character stream positioned just after the backslash.
//!
//! ## Examples
//!
//! ```rust
//! use commented_properties::escape::{escape_key, escape_value};
//!
//! assert_eq!(escape_key("te st"), "te\\ st");
//! assert_eq!(escape_value(" 123", true), "\\ 123");
//! assert_eq!(escape_value("a=b", true), "a\\=b");
//! assert_eq!(escape_value("a=b", false), "a=b");
//! assert_eq!(escape_value("°", true), "\\u00B0");
//! ```

use crate::error::EscapeError;

const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// Escapes a value for the right-hand side of `key=value`.
///
/// A leading space or form feed gets an extra backslash so the reader does
/// not trim it.
/// In strict mode `=` and `:` are escaped everywhere; in lenient mode only
/// when they are the first character, where a reader would otherwise treat
/// them as part of the separator.
#[must_use]
pub fn escape_value(value: &str, strict: bool) -> String {
    let mut out = String::with_capacity(value.len() + 8);
    for (index, c) in value.chars().enumerate() {
        match c {
            ' ' | '\x0C' if index == 0 => {
                out.push('\\');
                out.push(c);
            }
            '=' | ':' if strict || index == 0 => {
                out.push('\\');
                out.push(c);
            }
            _ => push_escaped(&mut out, c),
        }
    }
    out
}

/// Escapes a key for the left-hand side of `key=value`.
///
/// Spaces, form feeds, `=` and `:` are escaped in both modes since any of
/// them would end the key when read back. A form feed is written as a
/// backslash followed by the literal character; there is no `\f` on write.
#[must_use]
pub fn escape_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 8);
    for c in key.chars() {
        match c {
            ' ' | '\x0C' | '=' | ':' => {
                out.push('\\');
                out.push(c);
            }
            _ => push_escaped(&mut out, c),
        }
    }
    out
}

fn push_escaped(out: &mut String, c: char) {
    match c {
        '\\' => out.push_str("\\\\"),
        // CR folds into the LF escape.
        '\n' | '\r' => out.push_str("\\n"),
        '\t' => out.push_str("\\t"),
        '#' => out.push_str("\\#"),
        '!' => out.push_str("\\!"),
        c if (c as u32) > 0x7F => push_unicode(out, c),
        c => out.push(c),
    }
}

fn push_unicode(out: &mut String, c: char) {
    let mut units = [0u16; 2];
    for unit in c.encode_utf16(&mut units).iter() {
        out.push_str("\\u");
        for shift in [12u16, 8, 4, 0] {
            out.push(HEX_DIGITS[usize::from((unit >> shift) & 0xF)] as char);
        }
    }
}

/// Decodes one escape sequence. `chars` must be positioned just after the
/// backslash.
///
/// Returns `Ok(None)` when the stream is already exhausted, i.e. the
/// backslash was the last character of the line.
///
/// # Errors
///
/// Fails on a `\u` escape that is truncated, contains a non-hex digit, or
/// names a surrogate that is not part of a well-formed `\uD8xx\uDCxx` pair.
///
/// # Examples
///
/// ```rust
/// use commented_properties::escape::unescape;
///
/// let mut chars = "u00e9rest".chars();
/// assert_eq!(unescape(&mut chars), Ok(Some('é')));
/// assert_eq!(chars.as_str(), "rest");
///
/// assert_eq!(unescape(&mut "q".chars()), Ok(Some('q')));
/// assert!(unescape(&mut "u12".chars()).is_err());
/// ```
pub fn unescape<I>(chars: &mut I) -> Result<Option<char>, EscapeError>
where
    I: Iterator<Item = char>,
{
    let c = match chars.next() {
        Some(c) => c,
        None => return Ok(None),
    };
    let decoded = match c {
        'u' => decode_unicode(chars)?,
        't' => '\t',
        'r' => '\r',
        'n' => '\n',
        'f' => '\x0C',
        other => other,
    };
    Ok(Some(decoded))
}

fn decode_unicode<I>(chars: &mut I) -> Result<char, EscapeError>
where
    I: Iterator<Item = char>,
{
    let unit = read_hex4(chars)?;
    match unit {
        0xD800..=0xDBFF => {
            let low = match (chars.next(), chars.next()) {
                (Some('\\'), Some('u')) => read_hex4(chars)?,
                _ => return Err(EscapeError::UnpairedSurrogate(unit)),
            };
            char::decode_utf16([unit, low])
                .next()
                .and_then(|r| r.ok())
                .ok_or(EscapeError::UnpairedSurrogate(unit))
        }
        0xDC00..=0xDFFF => Err(EscapeError::UnpairedSurrogate(unit)),
        _ => char::from_u32(u32::from(unit)).ok_or(EscapeError::UnpairedSurrogate(unit)),
    }
}

fn read_hex4<I>(chars: &mut I) -> Result<u16, EscapeError>
where
    I: Iterator<Item = char>,
{
    let mut unit: u16 = 0;
    for read in 0..4 {
        let c = chars.next().ok_or(EscapeError::Truncated(read))?;
        let digit = c.to_digit(16).ok_or(EscapeError::InvalidHexDigit(c))?;
        // to_digit(16) is always below 16
        unit = (unit << 4) | digit as u16;
    }
    Ok(unit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_value_specials() {
        assert_eq!(escape_value("\\", true), "\\\\");
        assert_eq!(escape_value("a\nb", true), "a\\nb");
        assert_eq!(escape_value("a\rb", true), "a\\nb");
        assert_eq!(escape_value("a\tb", true), "a\\tb");
        assert_eq!(escape_value("#!", true), "\\#\\!");
    }

    #[test]
    fn test_escape_value_only_first_space() {
        assert_eq!(escape_value("  a b", true), "\\  a b");
    }

    #[test]
    fn test_escape_value_lenient_separators() {
        assert_eq!(escape_value("a=b:c", false), "a=b:c");
        assert_eq!(escape_value("=a", false), "\\=a");
        assert_eq!(escape_value(":a=b", false), "\\:a=b");
        assert_eq!(escape_value("a=b:c", true), "a\\=b\\:c");
    }

    #[test]
    fn test_escape_key() {
        assert_eq!(escape_key(" test"), "\\ test");
        assert_eq!(escape_key("a=b"), "a\\=b");
        assert_eq!(escape_key("a:b"), "a\\:b");
        assert_eq!(escape_key("a#b"), "a\\#b");
        assert_eq!(escape_key("a\x0Cb"), "a\\\x0Cb");
    }

    #[test]
    fn test_escape_value_leading_form_feed() {
        assert_eq!(escape_value("\x0Ca", true), "\\\x0Ca");
        assert_eq!(escape_value("a\x0Cb", false), "a\x0Cb");
    }

    #[test]
    fn test_escape_non_latin() {
        assert_eq!(escape_value("°§╓", true), "\\u00B0\\u00A7\\u2553");
        assert_eq!(escape_value("\u{7F}", true), "\u{7F}");
        assert_eq!(escape_value("😂", true), "\\uD83D\\uDE02");
    }

    #[test]
    fn test_unescape_controls() {
        assert_eq!(unescape(&mut "t".chars()), Ok(Some('\t')));
        assert_eq!(unescape(&mut "r".chars()), Ok(Some('\r')));
        assert_eq!(unescape(&mut "n".chars()), Ok(Some('\n')));
        assert_eq!(unescape(&mut "f".chars()), Ok(Some('\x0C')));
        assert_eq!(unescape(&mut "\\".chars()), Ok(Some('\\')));
        assert_eq!(unescape(&mut " ".chars()), Ok(Some(' ')));
        assert_eq!(unescape(&mut "".chars()), Ok(None));
    }

    #[test]
    fn test_unescape_unicode_case_insensitive() {
        assert_eq!(unescape(&mut "u00b0".chars()), Ok(Some('°')));
        assert_eq!(unescape(&mut "u00B0".chars()), Ok(Some('°')));
    }

    #[test]
    fn test_unescape_surrogate_pair() {
        let mut chars = "uD83D\\uDE02=123".chars();
        assert_eq!(unescape(&mut chars), Ok(Some('😂')));
        assert_eq!(chars.as_str(), "=123");
    }

    #[test]
    fn test_unescape_errors() {
        assert_eq!(
            unescape(&mut "u12".chars()),
            Err(EscapeError::Truncated(2))
        );
        assert_eq!(
            unescape(&mut "u123Z".chars()),
            Err(EscapeError::InvalidHexDigit('Z'))
        );
        assert_eq!(
            unescape(&mut "uD83Dx".chars()),
            Err(EscapeError::UnpairedSurrogate(0xD83D))
        );
        assert_eq!(
            unescape(&mut "uDE02".chars()),
            Err(EscapeError::UnpairedSurrogate(0xDE02))
        );
        assert_eq!(
            unescape(&mut "uD83D\\u0041".chars()),
            Err(EscapeError::UnpairedSurrogate(0xD83D))
        );
    }
}
