//! The comment-preserving document model.
//!
//! [`CommentedProperties`] keeps an ordered map from key to [`Property`]
//! (value plus the comment lines written above it) and a separate list of
//! header comments. Loading replaces the whole document; saving writes header
//! comments, a blank line, then every entry in map order.
//!
//! ## Examples
//!
//! ```rust
//! use commented_properties::CommentedProperties;
//!
//! let input = "# Server settings\n\n# Port to bind\nport = 8080\nhost: localhost\n";
//!
//! let mut props = CommentedProperties::new();
//! props.load(input.as_bytes()).unwrap();
//!
//! assert_eq!(props.header_comments(), ["Server settings"]);
//! assert_eq!(props.get("port"), Some("8080"));
//! assert_eq!(props.get_comments("port"), Some(&["Port to bind".to_string()][..]));
//!
//! props.set("port", "9090", &["Port to bind"]);
//! let mut out = Vec::new();
//! props.save(&mut out).unwrap();
//! ```

use indexmap::IndexMap;
use std::cmp::Ordering;
use std::fmt;
use std::io::{BufReader, Read, Write};
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::escape::{escape_key, escape_value};
use crate::options::PropertiesOptions;
use crate::parser::{parse_line, Line};
use crate::reader::LineReader;

/// One entry: the value and the comment lines directly above it.
///
/// Comment lines never contain line breaks; multi-line input is split when
/// the comments are set.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Property {
    value: String,
    comments: Vec<String>,
}

impl Property {
    /// Creates a property without comments.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Property {
            value: value.into(),
            comments: Vec::new(),
        }
    }

    /// Replaces the comments, splitting any that span several lines.
    #[must_use]
    pub fn with_comments<I, S>(mut self, comments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.comments = split_comments(comments);
        self
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    #[must_use]
    pub fn comments(&self) -> &[String] {
        &self.comments
    }
}

/// Splits comments on `\n` and `\r\n`. An empty comment stays one empty line.
///
/// Follows [`str::lines`]: a single trailing line break ends the last line
/// rather than adding an empty one, so `"\n"` is one empty line and
/// `"a\n\n"` is `["a", ""]`. Nothing is dropped, so every stored comment
/// still writes at least one `#` line.
fn split_comments<I, S>(comments: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut lines = Vec::new();
    for comment in comments {
        let comment = comment.as_ref();
        if comment.is_empty() {
            lines.push(String::new());
        } else {
            lines.extend(comment.lines().map(str::to_string));
        }
    }
    lines
}

/// An ordered, commented `.properties` document.
///
/// Insertion order is preserved and decides save order. Re-setting an
/// existing key keeps its position.
///
/// The document is not synchronized; wrap it in a mutex to share it between
/// threads (see [`crate::PropertyConfig`]).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CommentedProperties {
    header_comments: Vec<String>,
    properties: IndexMap<String, Property>,
    options: PropertiesOptions,
}

impl CommentedProperties {
    /// Creates an empty strict document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty document with the given options.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use commented_properties::{CommentedProperties, PropertiesOptions};
    ///
    /// let props = CommentedProperties::with_options(PropertiesOptions::lenient());
    /// assert!(!props.is_strict());
    /// ```
    #[must_use]
    pub fn with_options(options: PropertiesOptions) -> Self {
        CommentedProperties {
            header_comments: Vec::new(),
            properties: IndexMap::new(),
            options,
        }
    }

    #[must_use]
    pub fn options(&self) -> &PropertiesOptions {
        &self.options
    }

    #[must_use]
    pub fn is_strict(&self) -> bool {
        self.options.strict
    }

    /// Comments written at the top of the file, above the first blank line.
    #[must_use]
    pub fn header_comments(&self) -> &[String] {
        &self.header_comments
    }

    pub fn set_header_comments<I, S>(&mut self, comments: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.header_comments = split_comments(comments);
    }

    pub fn add_header_comment(&mut self, comment: &str) {
        self.header_comments.extend(split_comments([comment]));
    }

    /// Returns the value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(Property::value)
    }

    /// Returns the comment lines attached to `key`.
    #[must_use]
    pub fn get_comments(&self, key: &str) -> Option<&[String]> {
        self.properties.get(key).map(Property::comments)
    }

    #[must_use]
    pub fn get_property(&self, key: &str) -> Option<&Property> {
        self.properties.get(key)
    }

    /// Stores `value` with `comments` under `key`, replacing any previous
    /// property in place.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use commented_properties::CommentedProperties;
    ///
    /// let mut props = CommentedProperties::new();
    /// props.set("a", "1", &[]);
    /// props.set("b", "2", &["second\nentry"]);
    /// props.set("a", "3", &[]);
    ///
    /// assert_eq!(props.keys().collect::<Vec<_>>(), ["a", "b"]);
    /// assert_eq!(props.get_comments("b").unwrap(), ["second", "entry"]);
    /// ```
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>, comments: &[&str]) {
        self.set_property(key, Property::new(value).with_comments(comments));
    }

    /// Stores a prepared property, replacing any previous one in place.
    pub fn set_property(&mut self, key: impl Into<String>, property: Property) {
        self.properties.insert(key.into(), property);
    }

    /// Replaces the comments of `key`. A missing key is created with an
    /// empty value.
    pub fn set_comments<I, S>(&mut self, key: &str, comments: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let comments = split_comments(comments);
        match self.properties.get_mut(key) {
            Some(property) => property.comments = comments,
            None => {
                self.properties.insert(
                    key.to_string(),
                    Property {
                        value: String::new(),
                        comments,
                    },
                );
            }
        }
    }

    /// Map-style insert: replaces the whole property, dropping its comments,
    /// and returns the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.properties
            .insert(key.into(), Property::new(value))
            .map(|old| old.value)
    }

    /// Removes `key`, keeping the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.properties.shift_remove(key).map(|old| old.value)
    }

    /// Removes every property and the header comments.
    pub fn clear(&mut self) {
        self.header_comments.clear();
        self.properties.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    #[must_use]
    pub fn contains_value(&self, value: &str) -> bool {
        self.properties.values().any(|p| p.value == value)
    }

    /// Returns an iterator over the keys, in document order.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.properties.keys().map(String::as_str)
    }

    /// Returns an iterator over the values, in document order.
    pub fn values(&self) -> impl Iterator<Item = &str> + '_ {
        self.properties.values().map(Property::value)
    }

    /// Returns an iterator over `(key, value)` pairs, in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.properties
            .iter()
            .map(|(k, p)| (k.as_str(), p.value.as_str()))
    }

    /// Returns an iterator over keys and full properties, in document order.
    pub fn properties(&self) -> indexmap::map::Iter<'_, String, Property> {
        self.properties.iter()
    }

    /// Reorders the entries by comparing keys.
    pub fn sort_by<F>(&mut self, mut compare: F)
    where
        F: FnMut(&str, &str) -> Ordering,
    {
        self.properties.sort_by(|k1, _, k2, _| compare(k1, k2));
    }

    /// Keeps only the entries for which `keep` returns `true`.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&str, &Property) -> bool,
    {
        self.properties.retain(|k, p| keep(k, p));
    }

    /// Replaces the document with the contents of `reader`.
    ///
    /// On error the previous contents are left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if reading fails and [`Error::MalformedEscape`]
    /// for a bad `\uXXXX` escape.
    pub fn load<R: Read>(&mut self, reader: R) -> Result<()> {
        let mut lines = LineReader::new(BufReader::new(reader));
        let mut header_comments = Vec::new();
        let mut properties = IndexMap::new();
        let mut pending: Vec<String> = Vec::new();
        let mut header = true;

        while let Some(line) = lines.next_line()? {
            match parse_line(&line.text, line.number)? {
                Line::Blank => {
                    if header {
                        header_comments.append(&mut pending);
                        header = false;
                    }
                }
                Line::Comment(text) => pending.push(text),
                Line::Entry { key, value } => {
                    let property = Property {
                        value,
                        comments: std::mem::take(&mut pending),
                    };
                    properties.insert(key, property);
                    header = false;
                }
                Line::Empty => {}
            }
        }

        if header {
            header_comments.append(&mut pending);
        } else if !pending.is_empty() {
            log::debug!("dropping {} trailing comment lines with no entry", pending.len());
        }

        log::debug!(
            "loaded {} properties and {} header comments",
            properties.len(),
            header_comments.len()
        );
        self.header_comments = header_comments;
        self.properties = properties;
        Ok(())
    }

    /// Loads from a string, see [`CommentedProperties::load`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedEscape`] for a bad `\uXXXX` escape.
    pub fn load_str(&mut self, input: &str) -> Result<()> {
        self.load(input.as_bytes())
    }

    /// Writes the document to `writer` and flushes it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if writing or flushing fails.
    pub fn save<W: Write>(&self, mut writer: W) -> Result<()> {
        let text = self.render();
        writer.write_all(text.as_bytes())?;
        writer.flush()?;
        log::debug!("saved {} properties", self.properties.len());
        Ok(())
    }

    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        self.render().into_bytes()
    }

    fn render(&self) -> String {
        let eol = self.options.line_ending.as_str();
        let mut out = String::new();
        for comment in &self.header_comments {
            push_comment(&mut out, comment, eol);
        }
        if !self.header_comments.is_empty() {
            out.push_str(eol);
        }
        for (key, property) in &self.properties {
            for comment in &property.comments {
                push_comment(&mut out, comment, eol);
            }
            out.push_str(&escape_key(key));
            out.push('=');
            out.push_str(&escape_value(&property.value, self.options.strict));
            out.push_str(eol);
        }
        out
    }
}

fn push_comment(out: &mut String, comment: &str, eol: &str) {
    out.push_str("# ");
    out.push_str(comment);
    out.push_str(eol);
}

impl fmt::Display for CommentedProperties {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl FromStr for CommentedProperties {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut props = CommentedProperties::new();
        props.load_str(s)?;
        Ok(props)
    }
}

impl IntoIterator for CommentedProperties {
    type Item = (String, Property);
    type IntoIter = indexmap::map::IntoIter<String, Property>;

    fn into_iter(self) -> Self::IntoIter {
        self.properties.into_iter()
    }
}

impl<'a> IntoIterator for &'a CommentedProperties {
    type Item = (&'a String, &'a Property);
    type IntoIter = indexmap::map::Iter<'a, String, Property>;

    fn into_iter(self) -> Self::IntoIter {
        self.properties.iter()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for CommentedProperties {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut props = CommentedProperties::new();
        props.extend(iter);
        props
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for CommentedProperties {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}
