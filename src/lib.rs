//! # commented_properties
//!
//! A reader and writer for Java-style `.properties` files that keeps what
//! `java.util.Properties` throws away: comments and order.
//!
//! ## Key Features
//!
//! - **Comment-Preserving**: header comments and per-key comments survive a
//!   load/save round trip
//! - **Order-Preserving**: keys are written back in the order they were read
//!   or inserted
//! - **Compatible**: reads everything `java.util.Properties` reads, including
//!   line continuations and `\uXXXX` escapes; strict mode writes
//!   byte-identical escaping
//! - **Typed Config Layer**: [`ConfigEntry`] and [`ConfigBuilder`] turn a file
//!   into typed, defaulted, range-checked settings
//! - **Serde Compatible**: flat structs go to and from properties with
//!   [`to_string`] and [`from_str`]
//!
//! ## Quick Start
//!
//! ```rust
//! use commented_properties::CommentedProperties;
//!
//! let input = "# Server config\n\n# Port to bind\nport=8080\nhost=localhost\n";
//! let mut props: CommentedProperties = input.parse().unwrap();
//!
//! assert_eq!(props.header_comments(), ["Server config"]);
//! assert_eq!(props.get_comments("port").unwrap(), ["Port to bind"]);
//!
//! props.set("timeout", "30", &["Seconds"]);
//! let output = props.to_string();
//! assert!(output.contains("# Seconds"));
//! ```
//!
//! ### Serde
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use commented_properties::{from_str, to_string};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct Database {
//!     url: String,
//!     pool_size: u32,
//!     read_only: bool,
//! }
//!
//! let db = Database {
//!     url: "jdbc:h2:mem".to_string(),
//!     pool_size: 8,
//!     read_only: false,
//! };
//!
//! let text = to_string(&db).unwrap();
//! assert!(text.contains("url=jdbc\\:h2\\:mem"));
//!
//! let db_back: Database = from_str(&text).unwrap();
//! assert_eq!(db, db_back);
//! ```
//!
//! ## Layout
//!
//! - [`escape`] and [`reader`]: character escaping and logical line assembly
//! - [`parser`]: classifies each logical line
//! - [`properties`]: the document model, loader and serializer
//! - [`config`]: a file-backed, thread-safe document with background saves
//! - [`value`], [`entry`]: typed entries on top of a config
//! - [`ser`], [`de`]: the Serde bridge
//!
//! ## Safety Guarantees
//!
//! - No `unsafe` code blocks
//! - A malformed `\uXXXX` escape fails the whole load and leaves the
//!   document untouched

pub mod config;
pub mod de;
pub mod entry;
pub mod error;
pub mod escape;
pub mod macros;
pub mod options;
pub mod parser;
pub mod properties;
pub mod reader;
pub mod ser;
pub mod value;

pub use config::PropertyConfig;
pub use de::Deserializer;
pub use entry::{ConfigBuilder, ConfigEntry, EntryRegistry};
pub use error::{Error, EscapeError, Result};
pub use options::{LineEnding, PropertiesOptions};
pub use properties::{CommentedProperties, Property};
pub use ser::Serializer;
pub use value::ValueCodec;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::io;

/// Serialize any `T: Serialize` into a [`CommentedProperties`] document.
///
/// `T` must be a struct or a map with string keys; each field becomes one
/// property, in order. `None` fields are left out.
///
/// # Examples
///
/// ```rust
/// use commented_properties::to_properties;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Point { x: i32, y: i32 }
///
/// let props = to_properties(&Point { x: 1, y: 2 }).unwrap();
/// assert_eq!(props.get("y"), Some("2"));
/// ```
///
/// # Errors
///
/// Returns [`Error::UnsupportedType`] if `T` or one of its fields has no flat
/// string representation (sequences, nested structs, data-carrying enums).
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_properties<T>(value: &T) -> Result<CommentedProperties>
where
    T: ?Sized + Serialize,
{
    to_properties_with_options(value, PropertiesOptions::default())
}

/// Serialize any `T: Serialize` into a document with the given options.
///
/// # Errors
///
/// Returns an error if the value cannot be serialized.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_properties_with_options<T>(
    value: &T,
    options: PropertiesOptions,
) -> Result<CommentedProperties>
where
    T: ?Sized + Serialize,
{
    let mut serializer = Serializer::new(options);
    value.serialize(&mut serializer)?;
    Ok(serializer.into_inner())
}

/// Serialize any `T: Serialize` to `.properties` text.
///
/// # Examples
///
/// ```rust
/// use commented_properties::{to_string_with_options, LineEnding, PropertiesOptions};
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Point { x: i32, y: i32 }
///
/// let options = PropertiesOptions::new().with_line_ending(LineEnding::Lf);
/// let text = to_string_with_options(&Point { x: 1, y: 2 }, options).unwrap();
/// assert_eq!(text, "x=1\ny=2\n");
/// ```
///
/// # Errors
///
/// Returns an error if the value cannot be serialized.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string<T>(value: &T) -> Result<String>
where
    T: ?Sized + Serialize,
{
    to_string_with_options(value, PropertiesOptions::default())
}

/// Serialize any `T: Serialize` to `.properties` text with custom options.
///
/// # Errors
///
/// Returns an error if the value cannot be serialized.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_with_options<T>(value: &T, options: PropertiesOptions) -> Result<String>
where
    T: ?Sized + Serialize,
{
    Ok(to_properties_with_options(value, options)?.to_string())
}

/// Serialize any `T: Serialize` to a writer as `.properties` text.
///
/// # Examples
///
/// ```rust
/// use commented_properties::to_writer;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Point { x: i32, y: i32 }
///
/// let mut buffer = Vec::new();
/// to_writer(&mut buffer, &Point { x: 1, y: 2 }).unwrap();
/// assert!(String::from_utf8(buffer).unwrap().starts_with("x=1"));
/// ```
///
/// # Errors
///
/// Returns an error if serialization fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W, T>(writer: W, value: &T) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    to_properties(value)?.save(writer)
}

/// Deserialize an instance of type `T` from a loaded document.
///
/// String fields may borrow from the document.
///
/// # Examples
///
/// ```rust
/// use commented_properties::{from_properties, CommentedProperties};
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Named<'a> { name: &'a str }
///
/// let props: CommentedProperties = "name=borrowed".parse().unwrap();
/// let named: Named<'_> = from_properties(&props).unwrap();
/// assert_eq!(named.name, "borrowed");
/// ```
///
/// # Errors
///
/// Returns [`Error::InvalidValue`] if a stored string cannot be converted to
/// the field's type, or an error from `T`'s `Deserialize` impl (for example
/// a missing required field).
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_properties<'de, T>(properties: &'de CommentedProperties) -> Result<T>
where
    T: Deserialize<'de>,
{
    T::deserialize(&mut Deserializer::new(properties))
}

/// Deserialize an instance of type `T` from `.properties` text.
///
/// # Examples
///
/// ```rust
/// use commented_properties::from_str;
/// use serde::Deserialize;
///
/// #[derive(Deserialize, PartialEq, Debug)]
/// struct Point { x: i32, y: i32 }
///
/// let point: Point = from_str("# origin\nx=1\ny : 2").unwrap();
/// assert_eq!(point, Point { x: 1, y: 2 });
/// ```
///
/// # Errors
///
/// Returns [`Error::MalformedEscape`] if the text contains a bad `\u`
/// escape, or any error [`from_properties`] can return.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str<T>(s: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    let properties: CommentedProperties = s.parse()?;
    from_properties(&properties)
}

/// Deserialize an instance of type `T` from bytes of `.properties` text.
///
/// # Errors
///
/// Returns [`Error::Io`] if the bytes are not valid UTF-8, or any error
/// [`from_str`] can return.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice<T>(v: &[u8]) -> Result<T>
where
    T: DeserializeOwned,
{
    from_reader(v)
}

/// Deserialize an instance of type `T` from an I/O stream of `.properties`
/// text.
///
/// # Examples
///
/// ```rust
/// use commented_properties::from_reader;
/// use serde::Deserialize;
/// use std::io::Cursor;
///
/// #[derive(Deserialize, PartialEq, Debug)]
/// struct Point { x: i32, y: i32 }
///
/// let point: Point = from_reader(Cursor::new(b"x=1\ny=2")).unwrap();
/// assert_eq!(point, Point { x: 1, y: 2 });
/// ```
///
/// # Errors
///
/// Returns an error if reading from the reader fails, the input cannot be
/// parsed, or the data cannot be deserialized to type `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R, T>(reader: R) -> Result<T>
where
    R: io::Read,
    T: DeserializeOwned,
{
    let mut properties = CommentedProperties::new();
    properties.load(reader)?;
    from_properties(&properties)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Point {
        x: i32,
        y: i32,
    }

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct User {
        id: u32,
        name: String,
        active: bool,
        email: Option<String>,
    }

    fn lf() -> PropertiesOptions {
        PropertiesOptions::new().with_line_ending(LineEnding::Lf)
    }

    #[test]
    fn test_serialize_deserialize_point() {
        let point = Point { x: 1, y: 2 };
        let text = to_string(&point).unwrap();
        let point_back: Point = from_str(&text).unwrap();
        assert_eq!(point, point_back);
    }

    #[test]
    fn test_serialize_deserialize_user() {
        let user = User {
            id: 123,
            name: "Alice Smith: admin".to_string(),
            active: true,
            email: Some("alice@example.com".to_string()),
        };

        let text = to_string_with_options(&user, lf()).unwrap();
        assert_eq!(
            text,
            "id=123\nname=Alice Smith\\: admin\nactive=true\nemail=alice@example.com\n"
        );
        let user_back: User = from_str(&text).unwrap();
        assert_eq!(user, user_back);
    }

    #[test]
    fn test_none_is_omitted_and_read_back_as_none() {
        let user = User {
            id: 1,
            name: String::new(),
            active: false,
            email: None,
        };
        let props = to_properties(&user).unwrap();
        assert!(!props.contains_key("email"));
        let user_back: User = from_properties(&props).unwrap();
        assert_eq!(user, user_back);
    }

    #[test]
    fn test_lenient_output() {
        let point = Point { x: -1, y: 0 };
        let options = lf().with_strict(false);
        assert_eq!(to_string_with_options(&point, options).unwrap(), "x=-1\ny=0\n");
    }

    #[test]
    fn test_from_slice_rejects_invalid_utf8() {
        let result: Result<Point> = from_slice(b"x=\xff\ny=2");
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_from_str_reports_malformed_escape() {
        let result: Result<Point> = from_str("x=\\u12G4\ny=2");
        assert!(matches!(result, Err(Error::MalformedEscape { line: 1, .. })));
    }

    #[test]
    fn test_missing_field() {
        let result: Result<Point> = from_str("x=1");
        assert!(result.unwrap_err().to_string().contains("y"));
    }

    #[test]
    fn test_to_writer() {
        let mut buffer = Vec::new();
        to_writer(&mut buffer, &Point { x: 3, y: 4 }).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let point: Point = from_str(&text).unwrap();
        assert_eq!(point, Point { x: 3, y: 4 });
    }
}
