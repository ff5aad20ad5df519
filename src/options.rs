//! Configuration options for the `.properties` codec.
//!
//! - [`PropertiesOptions`]: escaping policy and line terminator
//! - [`LineEnding`]: terminator written after every output line
//!
//! ## Examples
//!
//! ```rust
//! use commented_properties::{CommentedProperties, LineEnding, PropertiesOptions};
//!
//! let options = PropertiesOptions::lenient().with_line_ending(LineEnding::Lf);
//! let mut props = CommentedProperties::with_options(options);
//! props.set("url", "http://localhost:8080", &[]);
//!
//! assert_eq!(props.to_string(), "url=http://localhost:8080\n");
//! ```

/// Line terminator emitted by the serializer.
///
/// Both `\n` and `\r\n` are always accepted when reading.
///
/// # Examples
///
/// ```rust
/// use commented_properties::LineEnding;
///
/// assert_eq!(LineEnding::Lf.as_str(), "\n");
/// assert_eq!(LineEnding::CrLf.as_str(), "\r\n");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineEnding {
    Lf,
    CrLf,
}

impl LineEnding {
    /// The platform's natural terminator: `\r\n` on Windows, `\n` elsewhere.
    #[must_use]
    pub const fn native() -> Self {
        if cfg!(windows) {
            LineEnding::CrLf
        } else {
            LineEnding::Lf
        }
    }

    /// Returns the string representation of this terminator.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }
}

impl Default for LineEnding {
    fn default() -> Self {
        LineEnding::native()
    }
}

/// Options fixed for the lifetime of a document.
///
/// In strict mode (the default) `=` and `:` are escaped everywhere in values,
/// producing output identical to the legacy writer. Lenient mode leaves them
/// readable unless they start the value.
///
/// # Examples
///
/// ```rust
/// use commented_properties::{LineEnding, PropertiesOptions};
///
/// let options = PropertiesOptions::new();
/// assert!(options.strict);
///
/// let options = PropertiesOptions::new()
///     .with_strict(false)
///     .with_line_ending(LineEnding::CrLf);
/// assert!(!options.strict);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PropertiesOptions {
    pub strict: bool,
    pub line_ending: LineEnding,
}

impl Default for PropertiesOptions {
    fn default() -> Self {
        PropertiesOptions {
            strict: true,
            line_ending: LineEnding::default(),
        }
    }
}

impl PropertiesOptions {
    /// Creates default options (strict escaping, native line endings).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates lenient options: `=` and `:` stay unescaped inside values.
    #[must_use]
    pub fn lenient() -> Self {
        PropertiesOptions {
            strict: false,
            ..Self::default()
        }
    }

    /// Sets the escaping mode.
    #[must_use]
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Sets the terminator written after every output line.
    #[must_use]
    pub fn with_line_ending(mut self, line_ending: LineEnding) -> Self {
        self.line_ending = line_ending;
        self
    }
}
