//! Typed config entries and the builder that registers them.
//!
//! A [`ConfigEntry`] is a typed view of one key in a [`PropertyConfig`]. It
//! holds the current value, a default and the entry's comments, and writes
//! every change straight through to the shared document.
//!
//! [`ConfigBuilder`] opens the config, lets a closure register entries, and
//! then tidies the document: unknown keys can be removed, entries can be
//! sorted into registration order, and the result can be saved.
//!
//! ## Examples
//!
//! ```rust
//! use commented_properties::{ConfigBuilder, ConfigEntry};
//!
//! struct ServerConfig {
//!     port: ConfigEntry<i32>,
//!     motd: ConfigEntry<String>,
//! }
//!
//! let server = ConfigBuilder::new()
//!     .save_after_build(false)
//!     .build(|b| {
//!         b.header(&["Server settings"]);
//!         ServerConfig {
//!             port: b.ranged_entry("port", 25565, 1, 65535, &["Port to bind"]),
//!             motd: b.entry("motd", "Hello".to_string(), &[]),
//!         }
//!     })
//!     .unwrap();
//!
//! let mut port = server.port;
//! port.set(70000);
//! assert_eq!(*port.get(), 65535);
//! assert_eq!(port.config().get("port").as_deref(), Some("65535"));
//! assert_eq!(server.motd.get(), "Hello");
//! ```

use std::collections::HashMap;
use std::path::PathBuf;

use crate::config::PropertyConfig;
use crate::error::Result;
use crate::options::PropertiesOptions;
use crate::properties::Property;
use crate::value::ValueCodec;

/// A typed value bound to one key of a [`PropertyConfig`].
#[derive(Debug, Clone)]
pub struct ConfigEntry<T: ValueCodec> {
    config: PropertyConfig,
    key: String,
    default: T,
    bounds: Option<Bounds<T>>,
    comments: Vec<String>,
    value: T,
}

#[derive(Debug, Clone)]
struct Bounds<T> {
    min: T,
    max: T,
    clamp: fn(T, T, T) -> T,
}

fn clamp_between<T: PartialOrd>(value: T, min: T, max: T) -> T {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

impl<T: ValueCodec> ConfigEntry<T> {
    /// Creates an entry and immediately reads its stored value.
    pub fn new(config: PropertyConfig, key: &str, default: T, comments: &[&str]) -> Self {
        Self::with_bounds(config, key, default, None, comments)
    }

    fn with_bounds(
        config: PropertyConfig,
        key: &str,
        default: T,
        bounds: Option<Bounds<T>>,
        comments: &[&str],
    ) -> Self {
        let mut entry = ConfigEntry {
            config,
            key: key.to_string(),
            value: default.clone(),
            default,
            bounds,
            comments: comments.iter().map(|c| c.to_string()).collect(),
        };
        entry.reload();
        entry
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub fn get(&self) -> &T {
        &self.value
    }

    #[must_use]
    pub fn default_value(&self) -> &T {
        &self.default
    }

    #[must_use]
    pub fn min(&self) -> Option<&T> {
        self.bounds.as_ref().map(|b| &b.min)
    }

    #[must_use]
    pub fn max(&self) -> Option<&T> {
        self.bounds.as_ref().map(|b| &b.max)
    }

    #[must_use]
    pub fn comments(&self) -> &[String] {
        &self.comments
    }

    #[must_use]
    pub fn config(&self) -> &PropertyConfig {
        &self.config
    }

    /// Reads the stored string again. A missing or undecodable value resets
    /// the entry to its default.
    pub fn reload(&mut self) -> &mut Self {
        match self.config.get(&self.key) {
            Some(text) => match T::decode(&text) {
                Some(value) => {
                    self.value = self.fix(value);
                    self.sync();
                }
                None => {
                    log::warn!("invalid value {:?} for {}, using the default", text, self.key);
                    self.reset();
                }
            },
            None => {
                self.reset();
            }
        }
        self
    }

    /// Sets the value, clamping ranged entries, and writes it to the document.
    pub fn set(&mut self, value: T) -> &mut Self {
        if self.value != value {
            self.value = self.fix(value);
            self.sync();
        }
        self
    }

    pub fn reset(&mut self) -> &mut Self {
        self.value = self.default.clone();
        self.sync();
        self
    }

    /// Replaces the comments written above this entry.
    pub fn comment(&mut self, comments: &[&str]) -> &mut Self {
        self.comments = comments.iter().map(|c| c.to_string()).collect();
        self.sync();
        self
    }

    /// Queues a background save of the whole config.
    pub fn save(&self) -> &Self {
        self.config.save();
        self
    }

    /// Saves the whole config on the calling thread.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Io`] if the file cannot be written.
    pub fn save_sync(&self) -> Result<&Self> {
        self.config.save_sync()?;
        Ok(self)
    }

    fn fix(&self, value: T) -> T {
        match &self.bounds {
            Some(b) => (b.clamp)(value, b.min.clone(), b.max.clone()),
            None => value,
        }
    }

    fn sync(&self) {
        let property = Property::new(self.value.encode()).with_comments(&self.comments);
        self.config
            .with_properties_mut(|props| props.set_property(self.key.as_str(), property));
    }
}

impl<T: ValueCodec + PartialOrd> ConfigEntry<T> {
    /// Creates an entry whose value is clamped to `min..=max`.
    ///
    /// The default is used as given, even outside the range.
    pub fn ranged(
        config: PropertyConfig,
        key: &str,
        default: T,
        min: T,
        max: T,
        comments: &[&str],
    ) -> Self {
        let bounds = Bounds {
            min,
            max,
            clamp: clamp_between::<T>,
        };
        Self::with_bounds(config, key, default, Some(bounds), comments)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SaveAfterBuild {
    No,
    Background,
    Sync,
}

/// Opens a config, registers typed entries and tidies the document.
///
/// Defaults: strict escaping, no backing file, unknown keys kept, entries
/// sorted into registration order, background save after building.
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    path: Option<PathBuf>,
    options: PropertiesOptions,
    remove_unused: bool,
    keep_order: bool,
    save: SaveAfterBuild,
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        ConfigBuilder {
            path: None,
            options: PropertiesOptions::default(),
            remove_unused: false,
            keep_order: true,
            save: SaveAfterBuild::Background,
        }
    }
}

impl ConfigBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Backs the config with the file at `path`.
    #[must_use]
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    #[must_use]
    pub fn options(mut self, options: PropertiesOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn strict(mut self, strict: bool) -> Self {
        self.options.strict = strict;
        self
    }

    /// Drops keys from the document that no entry was registered for.
    #[must_use]
    pub fn remove_unused(mut self, remove_unused: bool) -> Self {
        self.remove_unused = remove_unused;
        self
    }

    /// Sorts the document into registration order. Unknown keys move to the
    /// end, keeping their relative order.
    #[must_use]
    pub fn keep_order(mut self, keep_order: bool) -> Self {
        self.keep_order = keep_order;
        self
    }

    /// Queues a background save once building is done.
    #[must_use]
    pub fn save_after_build(mut self, save: bool) -> Self {
        self.save = if save {
            SaveAfterBuild::Background
        } else if self.save == SaveAfterBuild::Background {
            SaveAfterBuild::No
        } else {
            self.save
        };
        self
    }

    /// Saves on the calling thread once building is done.
    #[must_use]
    pub fn save_sync_after_build(mut self, save: bool) -> Self {
        self.save = if save {
            SaveAfterBuild::Sync
        } else if self.save == SaveAfterBuild::Sync {
            SaveAfterBuild::No
        } else {
            self.save
        };
        self
    }

    /// Loads the config, runs `define` to register entries, then applies the
    /// tidy-up and save settings.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Io`] if a synchronous save after building
    /// fails. Load failures are logged and leave every entry at its default.
    pub fn build<C>(self, define: impl FnOnce(&mut EntryRegistry) -> C) -> Result<C> {
        let config = match &self.path {
            Some(path) => PropertyConfig::open_with_options(path, self.options),
            None => PropertyConfig::in_memory(self.options),
        };
        let mut registry = EntryRegistry {
            config: config.clone(),
            keys: Vec::new(),
        };
        let built = define(&mut registry);

        if self.remove_unused {
            registry.remove_unused();
        }
        if self.keep_order {
            registry.sort_entries();
        }
        match self.save {
            SaveAfterBuild::No => {}
            SaveAfterBuild::Background => config.save(),
            SaveAfterBuild::Sync => config.save_sync()?,
        }
        Ok(built)
    }
}

/// Handed to the [`ConfigBuilder::build`] closure to register entries.
#[derive(Debug)]
pub struct EntryRegistry {
    config: PropertyConfig,
    keys: Vec<String>,
}

impl EntryRegistry {
    #[must_use]
    pub fn config(&self) -> &PropertyConfig {
        &self.config
    }

    /// Replaces the header comments of the document.
    pub fn header(&mut self, header: &[&str]) -> &mut Self {
        self.config
            .with_properties_mut(|props| props.set_header_comments(header));
        self
    }

    pub fn entry<T: ValueCodec>(&mut self, key: &str, default: T, comments: &[&str]) -> ConfigEntry<T> {
        self.keys.push(key.to_string());
        ConfigEntry::new(self.config.clone(), key, default, comments)
    }

    pub fn ranged_entry<T: ValueCodec + PartialOrd>(
        &mut self,
        key: &str,
        default: T,
        min: T,
        max: T,
        comments: &[&str],
    ) -> ConfigEntry<T> {
        self.keys.push(key.to_string());
        ConfigEntry::ranged(self.config.clone(), key, default, min, max, comments)
    }

    fn remove_unused(&self) {
        self.config.with_properties_mut(|props| {
            props.retain(|key, _| {
                let keep = self.keys.iter().any(|k| k == key);
                if !keep {
                    log::debug!("removing unused key {}", key);
                }
                keep
            });
        });
    }

    fn sort_entries(&self) {
        let mut order: HashMap<&str, usize> = HashMap::new();
        for (index, key) in self.keys.iter().enumerate() {
            order.entry(key.as_str()).or_insert(index);
        }
        let rank = |key: &str| order.get(key).copied().unwrap_or(usize::MAX);
        self.config
            .with_properties_mut(|props| props.sort_by(|a, b| rank(a).cmp(&rank(b))));
    }
}
