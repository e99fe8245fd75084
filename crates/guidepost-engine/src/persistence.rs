#![forbid(unsafe_code)]

//! Durable "tour completed" marker.
//!
//! The controller talks to storage only through [`TourPersistence`], a tiny
//! key-value port holding boolean markers.
//!
//! # Backends
//!
//! - [`MemoryPersistence`]: in-memory, for tests and ephemeral sessions
//! - [`DisabledPersistence`]: always unavailable, forces non-persistent mode
//! - `FilePersistence`: JSON document on disk (requires `file-persistence`)
//!
//! # Failure Modes
//!
//! | Failure | Backend result | Controller behavior |
//! |---------|----------------|---------------------|
//! | Missing file / key | `Ok(false)` | Tour auto-shows |
//! | I/O error | `Err(Io)` | Non-persistent mode |
//! | Unparseable document | `Err(Serialization)` on read | Non-persistent mode |
//! | Backend disabled | `Err(Unavailable)` | Non-persistent mode |

use std::collections::HashMap;

use crate::error::{PersistenceError, PersistenceResult};

/// Boolean key-value storage for tour markers.
pub trait TourPersistence {
    /// Human-readable name for logging.
    fn name(&self) -> &str;

    /// Read a marker. An absent marker reads as `false`.
    fn read(&self, key: &str) -> PersistenceResult<bool>;

    /// Write a marker. Writing `false` may remove the key entirely.
    fn write(&mut self, key: &str, value: bool) -> PersistenceResult<()>;
}

impl<P: TourPersistence + ?Sized> TourPersistence for Box<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn read(&self, key: &str) -> PersistenceResult<bool> {
        (**self).read(key)
    }

    fn write(&mut self, key: &str, value: bool) -> PersistenceResult<()> {
        (**self).write(key, value)
    }
}

/// In-memory storage. State is lost when the value is dropped.
#[derive(Debug, Clone, Default)]
pub struct MemoryPersistence {
    markers: HashMap<String, bool>,
    writes: usize,
}

impl MemoryPersistence {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage with one marker already set, as if a previous session wrote it.
    #[must_use]
    pub fn with_marker(key: impl Into<String>, value: bool) -> Self {
        let mut markers = HashMap::new();
        markers.insert(key.into(), value);
        Self { markers, writes: 0 }
    }

    /// Number of successful writes, for asserting write discipline in tests.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes
    }

    /// Peek at a marker without going through the port.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<bool> {
        self.markers.get(key).copied()
    }
}

impl TourPersistence for MemoryPersistence {
    fn name(&self) -> &str {
        "MemoryPersistence"
    }

    fn read(&self, key: &str) -> PersistenceResult<bool> {
        Ok(self.markers.get(key).copied().unwrap_or(false))
    }

    fn write(&mut self, key: &str, value: bool) -> PersistenceResult<()> {
        if value {
            self.markers.insert(key.to_string(), true);
        } else {
            self.markers.remove(key);
        }
        self.writes += 1;
        Ok(())
    }
}

/// Storage that is never available.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledPersistence;

impl TourPersistence for DisabledPersistence {
    fn name(&self) -> &str {
        "DisabledPersistence"
    }

    fn read(&self, _key: &str) -> PersistenceResult<bool> {
        Err(PersistenceError::Unavailable("persistence disabled".into()))
    }

    fn write(&mut self, _key: &str, _value: bool) -> PersistenceResult<()> {
        Err(PersistenceError::Unavailable("persistence disabled".into()))
    }
}

#[cfg(feature = "file-persistence")]
mod file_persistence {
    use super::*;
    use guidepost_core::debug;
    use serde::{Deserialize, Serialize};
    use std::collections::BTreeMap;
    use std::fs::{self, File};
    use std::io::{BufReader, BufWriter, Write};
    use std::path::{Path, PathBuf};

    /// On-disk document.
    #[derive(Serialize, Deserialize)]
    struct MarkerFile {
        /// Format version for future migrations.
        format_version: u32,
        markers: BTreeMap<String, bool>,
    }

    impl MarkerFile {
        const FORMAT_VERSION: u32 = 1;

        fn new() -> Self {
            Self {
                format_version: Self::FORMAT_VERSION,
                markers: BTreeMap::new(),
            }
        }
    }

    /// JSON file storage.
    ///
    /// # File Format
    ///
    /// ```json
    /// {
    ///   "format_version": 1,
    ///   "markers": { "onboarding_done": true }
    /// }
    /// ```
    ///
    /// Writes go to `{path}.tmp`, are flushed and synced, then renamed over
    /// `{path}`, so a crash mid-write leaves the previous document intact.
    pub struct FilePersistence {
        path: PathBuf,
    }

    impl FilePersistence {
        /// Storage at `path`. The file is created on first write.
        #[must_use]
        pub fn new(path: impl AsRef<Path>) -> Self {
            Self {
                path: path.as_ref().to_path_buf(),
            }
        }

        /// `$XDG_STATE_HOME/guidepost/{app_name}/tour.json`, falling back to
        /// `~/.local/state` and then the current directory.
        #[must_use]
        pub fn default_for_app(app_name: &str) -> Self {
            let base = state_dir_or_fallback();
            Self::new(base.join("guidepost").join(app_name).join("tour.json"))
        }

        #[must_use]
        pub fn path(&self) -> &Path {
            &self.path
        }

        fn temp_path(&self) -> PathBuf {
            let mut tmp = self.path.clone();
            tmp.set_extension("json.tmp");
            tmp
        }

        fn load(&self) -> PersistenceResult<MarkerFile> {
            if !self.path.exists() {
                return Ok(MarkerFile::new());
            }
            let reader = BufReader::new(File::open(&self.path)?);
            let file: MarkerFile = serde_json::from_reader(reader).map_err(|e| {
                PersistenceError::Serialization(format!("failed to parse marker file: {e}"))
            })?;
            if file.format_version != MarkerFile::FORMAT_VERSION {
                return Err(PersistenceError::Corruption(format!(
                    "unsupported marker file version {}",
                    file.format_version
                )));
            }
            Ok(file)
        }

        fn save(&self, file: &MarkerFile) -> PersistenceResult<()> {
            if let Some(parent) = self.path.parent() {
                fs::create_dir_all(parent)?;
            }
            let tmp_path = self.temp_path();
            {
                let mut writer = BufWriter::new(File::create(&tmp_path)?);
                serde_json::to_writer_pretty(&mut writer, file).map_err(|e| {
                    PersistenceError::Serialization(format!("failed to serialize markers: {e}"))
                })?;
                writer.flush()?;
                writer.get_ref().sync_all()?;
            }
            fs::rename(&tmp_path, &self.path)?;
            Ok(())
        }
    }

    fn state_dir_or_fallback() -> PathBuf {
        if let Ok(state_home) = std::env::var("XDG_STATE_HOME") {
            return PathBuf::from(state_home);
        }
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home).join(".local").join("state");
        }
        PathBuf::from(".")
    }

    impl TourPersistence for FilePersistence {
        fn name(&self) -> &str {
            "FilePersistence"
        }

        fn read(&self, key: &str) -> PersistenceResult<bool> {
            let file = self.load()?;
            Ok(file.markers.get(key).copied().unwrap_or(false))
        }

        fn write(&mut self, key: &str, value: bool) -> PersistenceResult<()> {
            // A broken document is replaced rather than blocking the write.
            let mut file = self.load().unwrap_or_else(|err| {
                debug!(path = %self.path.display(), error = %err, "replacing unreadable marker file");
                MarkerFile::new()
            });
            if value {
                file.markers.insert(key.to_string(), true);
            } else {
                file.markers.remove(key);
            }
            self.save(&file)?;
            debug!(path = %self.path.display(), key, value, "saved tour marker");
            Ok(())
        }
    }

    impl std::fmt::Debug for FilePersistence {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("FilePersistence")
                .field("path", &self.path)
                .finish()
        }
    }
}

#[cfg(feature = "file-persistence")]
pub use file_persistence::FilePersistence;
