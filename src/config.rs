//! File-backed, thread-safe config.
//!
//! [`PropertyConfig`] owns one [`CommentedProperties`] behind a mutex and
//! knows where it lives on disk. Loading and saving go through the codec;
//! background saves are queued to a single writer thread so they hit the
//! disk in the order they were requested.
//!
//! ## Examples
//!
//! ```rust
//! use commented_properties::PropertyConfig;
//!
//! let dir = std::env::temp_dir().join("commented_properties_doc_config");
//! let path = dir.join("server.properties");
//!
//! let config = PropertyConfig::open(&path);
//! config.set("port", "8080", &["Port to bind"]);
//! config.save_sync().unwrap();
//!
//! let reopened = PropertyConfig::open(&path);
//! assert_eq!(reopened.get("port").as_deref(), Some("8080"));
//! # std::fs::remove_dir_all(&dir).unwrap();
//! ```

use indexmap::IndexMap;
use std::fs::{self, File};
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::JoinHandle;

use crate::error::Result;
use crate::options::PropertiesOptions;
use crate::properties::CommentedProperties;

/// A `.properties` file plus its in-memory document.
///
/// Cloning is cheap and every clone shares the same document and save queue.
/// The queue is drained and its thread joined when the last clone is dropped.
#[derive(Clone)]
pub struct PropertyConfig {
    shared: Arc<Shared>,
}

struct Shared {
    path: Option<PathBuf>,
    properties: Mutex<CommentedProperties>,
    writer: Mutex<Option<SaveWriter>>,
}

enum SaveJob {
    Write { path: PathBuf, contents: Vec<u8> },
    Flush(Sender<()>),
}

struct SaveWriter {
    jobs: Option<Sender<SaveJob>>,
    handle: Option<JoinHandle<()>>,
}

impl PropertyConfig {
    /// Opens the config at `path` with strict escaping and loads it.
    ///
    /// A missing file yields an empty config. Read errors are logged and
    /// also leave the config empty.
    pub fn open(path: impl AsRef<Path>) -> Self {
        Self::open_with_options(path, PropertiesOptions::default())
    }

    pub fn open_with_options(path: impl AsRef<Path>, options: PropertiesOptions) -> Self {
        let config = Self::build(Some(path.as_ref().to_path_buf()), options);
        config.reload();
        config
    }

    /// Creates a config without a backing file. Saves do nothing.
    #[must_use]
    pub fn in_memory(options: PropertiesOptions) -> Self {
        Self::build(None, options)
    }

    fn build(path: Option<PathBuf>, options: PropertiesOptions) -> Self {
        PropertyConfig {
            shared: Arc::new(Shared {
                path,
                properties: Mutex::new(CommentedProperties::with_options(options)),
                writer: Mutex::new(None),
            }),
        }
    }

    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.shared.path.as_deref()
    }

    fn lock(&self) -> MutexGuard<'_, CommentedProperties> {
        self.shared
            .properties
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        self.lock().get(key).map(str::to_string)
    }

    pub fn set(&self, key: &str, value: &str, comments: &[&str]) {
        self.lock().set(key, value, comments);
    }

    pub fn remove(&self, key: &str) -> Option<String> {
        self.lock().remove(key)
    }

    /// Snapshot of all key/value pairs, in document order.
    #[must_use]
    pub fn entries(&self) -> IndexMap<String, String> {
        self.lock()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    /// Runs `f` with shared access to the document.
    pub fn with_properties<R>(&self, f: impl FnOnce(&CommentedProperties) -> R) -> R {
        f(&self.lock())
    }

    /// Runs `f` with exclusive access to the document. Batch edits made here
    /// are atomic with respect to other threads and to saves.
    pub fn with_properties_mut<R>(&self, f: impl FnOnce(&mut CommentedProperties) -> R) -> R {
        f(&mut self.lock())
    }

    /// Loads the file into the document, replacing its contents.
    ///
    /// A missing file, or a config without a path, leaves the document as is.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Io`] if the file cannot be read and
    /// [`crate::Error::MalformedEscape`] if it cannot be parsed; the document
    /// is unchanged in both cases.
    pub fn load(&self) -> Result<()> {
        self.load_into(&mut self.lock())
    }

    /// Clears the document and loads it again, logging any failure.
    ///
    /// Both steps run under one lock, so other threads never see the
    /// cleared document.
    pub fn reload(&self) {
        let mut properties = self.lock();
        properties.clear();
        if let Err(e) = self.load_into(&mut properties) {
            log::error!("failed to reload config {:?}: {}", self.path(), e);
        }
    }

    fn load_into(&self, properties: &mut CommentedProperties) -> Result<()> {
        let Some(path) = self.path() else {
            return Ok(());
        };
        if !path.exists() {
            log::debug!("{} does not exist yet", path.display());
            return Ok(());
        }
        let file = File::open(path)?;
        properties.load(BufReader::new(file))
    }

    /// Writes the document to disk on the calling thread.
    ///
    /// Waits for queued background saves first so an older snapshot cannot
    /// overwrite this one. Parent directories are created as needed.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Io`] if the file cannot be written.
    pub fn save_sync(&self) -> Result<()> {
        let Some(path) = self.path() else {
            return Ok(());
        };
        self.flush();
        let contents = self.lock().to_bytes();
        write_file(path, &contents)
    }

    /// Queues a snapshot of the document to be written by the background
    /// writer. Failures are logged.
    pub fn save(&self) {
        let Some(path) = self.path() else {
            return;
        };
        // snapshot under the writer lock so queue order matches snapshot order
        let mut writer = self
            .shared
            .writer
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let job = SaveJob::Write {
            path: path.to_path_buf(),
            contents: self.lock().to_bytes(),
        };
        if writer.is_none() {
            match SaveWriter::spawn() {
                Ok(spawned) => *writer = Some(spawned),
                Err(e) => log::error!("failed to start save thread: {}", e),
            }
        }
        let queued = match writer.as_ref() {
            Some(writer) => writer.submit(job),
            None => Err(job),
        };
        if let Err(SaveJob::Write { path, contents }) = queued {
            if let Err(e) = write_file(&path, &contents) {
                log::error!("failed to save config {}: {}", path.display(), e);
            }
        }
    }

    /// Blocks until every save queued so far has been written.
    pub fn flush(&self) {
        let writer = self
            .shared
            .writer
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(writer) = writer.as_ref() {
            writer.flush();
        }
    }
}

impl std::fmt::Debug for PropertyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PropertyConfig")
            .field("path", &self.shared.path)
            .field("properties", &*self.lock())
            .finish()
    }
}

impl SaveWriter {
    fn spawn() -> std::io::Result<Self> {
        let (tx, rx) = mpsc::channel::<SaveJob>();
        let handle = std::thread::Builder::new()
            .name("properties-save".into())
            .spawn(move || {
                for job in rx {
                    match job {
                        SaveJob::Write { path, contents } => {
                            if let Err(e) = write_file(&path, &contents) {
                                log::error!("failed to save config {}: {}", path.display(), e);
                            }
                        }
                        SaveJob::Flush(done) => drop(done.send(())),
                    }
                }
            })?;
        Ok(SaveWriter {
            jobs: Some(tx),
            handle: Some(handle),
        })
    }

    /// Hands the job back if the writer thread is gone.
    fn submit(&self, job: SaveJob) -> std::result::Result<(), SaveJob> {
        match &self.jobs {
            Some(jobs) => jobs.send(job).map_err(|e| e.0),
            None => Err(job),
        }
    }

    fn flush(&self) {
        let (tx, rx) = mpsc::channel();
        if self.submit(SaveJob::Flush(tx)).is_ok() {
            drop(rx.recv());
        }
    }
}

impl Drop for SaveWriter {
    fn drop(&mut self) {
        // closing the channel ends the writer loop once the queue is empty
        self.jobs.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("save thread panicked");
            }
        }
    }
}

fn write_file(path: &Path, contents: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(contents)?;
    file.sync_all()?;
    log::debug!("wrote {} bytes to {}", contents.len(), path.display());
    Ok(())
}
