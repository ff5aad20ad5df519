//! String codecs for typed config values.
//!
//! The document only ever stores strings. [`ValueCodec`] is the conversion a
//! [`crate::ConfigEntry`] uses to read and write its typed value. A failed
//! [`ValueCodec::decode`] is not an error: the entry falls back to its
//! default.
//!
//! | Type | Stored as |
//! |------|-----------|
//! | `bool` | `true` / `false`, read case-insensitively, anything else is `false` |
//! | `i32`, `i64` | decimal |
//! | `f32`, `f64` | shortest round-trip form, always with a fraction (`1.0`) |
//! | `String` | as is |
//! | `Vec<String>` | `;`-separated, a literal `;` is written `\;` and `\` as `\\` |
//! | `Vec<i32>` | `,`-separated |
//! | `IndexMap<String, String>` | `"key"="value"` pairs separated by `,` |
//!
//! Fieldless enums can be stored by variant name with
//! [`value_codec_enum!`](crate::value_codec_enum).

use indexmap::IndexMap;

/// Conversion between a typed value and its stored string.
///
/// # Examples
///
/// ```rust
/// use commented_properties::ValueCodec;
///
/// assert_eq!(2.5f64.encode(), "2.5");
/// assert_eq!(i32::decode("42"), Some(42));
/// assert_eq!(i32::decode("forty-two"), None);
/// assert_eq!(bool::decode("TRUE"), Some(true));
///
/// let list = vec!["a;b".to_string(), "c".to_string()];
/// assert_eq!(list.encode(), "a\\;b;c");
/// assert_eq!(Vec::<String>::decode("a\\;b;c"), Some(list));
/// ```
pub trait ValueCodec: Sized + Clone + PartialEq {
    fn encode(&self) -> String;

    /// Returns `None` when `text` does not describe a value of this type.
    fn decode(text: &str) -> Option<Self>;
}

impl ValueCodec for bool {
    fn encode(&self) -> String {
        self.to_string()
    }

    fn decode(text: &str) -> Option<Self> {
        Some(text.trim().eq_ignore_ascii_case("true"))
    }
}

macro_rules! parsed_codec {
    ($($ty:ty),*) => {
        $(
            impl ValueCodec for $ty {
                fn encode(&self) -> String {
                    self.to_string()
                }

                fn decode(text: &str) -> Option<Self> {
                    text.trim().parse().ok()
                }
            }
        )*
    };
}

parsed_codec!(i32, i64);

macro_rules! float_codec {
    ($($ty:ty),*) => {
        $(
            impl ValueCodec for $ty {
                fn encode(&self) -> String {
                    format!("{:?}", self)
                }

                fn decode(text: &str) -> Option<Self> {
                    text.trim().parse().ok()
                }
            }
        )*
    };
}

float_codec!(f32, f64);

impl ValueCodec for String {
    fn encode(&self) -> String {
        self.clone()
    }

    fn decode(text: &str) -> Option<Self> {
        Some(text.to_string())
    }
}

impl ValueCodec for Vec<String> {
    fn encode(&self) -> String {
        self.iter()
            .map(|item| item.replace('\\', "\\\\").replace(';', "\\;"))
            .collect::<Vec<_>>()
            .join(";")
    }

    fn decode(text: &str) -> Option<Self> {
        if text.is_empty() {
            return Some(Vec::new());
        }
        let mut items = Vec::new();
        let mut current = String::new();
        let mut chars = text.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '\\' if matches!(chars.peek(), Some(';' | '\\')) => {
                    if let Some(escaped) = chars.next() {
                        current.push(escaped);
                    }
                }
                ';' => items.push(std::mem::take(&mut current)),
                c => current.push(c),
            }
        }
        items.push(current);
        Some(items)
    }
}

impl ValueCodec for Vec<i32> {
    fn encode(&self) -> String {
        self.iter()
            .map(i32::to_string)
            .collect::<Vec<_>>()
            .join(",")
    }

    fn decode(text: &str) -> Option<Self> {
        if text.trim().is_empty() {
            return Some(Vec::new());
        }
        text.split(',').map(|item| item.trim().parse().ok()).collect()
    }
}

impl ValueCodec for IndexMap<String, String> {
    fn encode(&self) -> String {
        self.iter()
            .map(|(k, v)| format!("\"{}\"=\"{}\"", quote(k), quote(v)))
            .collect::<Vec<_>>()
            .join(",")
    }

    fn decode(text: &str) -> Option<Self> {
        let mut map = IndexMap::new();
        let mut chars = text.chars().peekable();
        skip_spaces(&mut chars);
        if chars.peek().is_none() {
            return Some(map);
        }
        loop {
            let key = read_quoted(&mut chars)?;
            skip_spaces(&mut chars);
            if chars.next()? != '=' {
                return None;
            }
            skip_spaces(&mut chars);
            let value = read_quoted(&mut chars)?;
            map.insert(key, value);
            skip_spaces(&mut chars);
            match chars.next() {
                None => return Some(map),
                Some(',') => skip_spaces(&mut chars),
                Some(_) => return None,
            }
        }
    }
}

fn quote(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

fn skip_spaces(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) {
    while chars.peek().map_or(false, |c| c.is_whitespace()) {
        chars.next();
    }
}

fn read_quoted(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> Option<String> {
    if chars.next()? != '"' {
        return None;
    }
    let mut out = String::new();
    loop {
        match chars.next()? {
            '"' => return Some(out),
            '\\' => out.push(chars.next()?),
            c => out.push(c),
        }
    }
}
