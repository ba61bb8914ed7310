//! Settings persistence.
//!
//! The engine reads its settings once at construction and hands every change
//! to a `SettingsStore`. Files live in the data directory:
//! - Settings: `<data-dir>/settings.json`
//! - Tasks: `<data-dir>/tasks.json` (see `crate::tasks`)
//! - Notifications: `<data-dir>/notifications.json` (see `crate::notification`)

mod error;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::types::Settings;

pub use error::StoreError;

/// Directory name under the platform data directory.
pub const APP_DIR_NAME: &str = "pomodoro-engine";

/// Settings file name inside the data directory.
pub const SETTINGS_FILE: &str = "settings.json";

/// Tasks file name inside the data directory.
pub const TASKS_FILE: &str = "tasks.json";

/// Notification preference file name inside the data directory.
pub const NOTIFICATIONS_FILE: &str = "notifications.json";

/// Returns the platform data directory for this application.
///
/// # Errors
///
/// Returns `StoreError::NoDataDir` if the platform has no data directory.
pub fn default_data_dir() -> Result<PathBuf, StoreError> {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .ok_or(StoreError::NoDataDir)
}

// ============================================================================
// SettingsStore
// ============================================================================

/// Persistence collaborator for timer settings.
///
/// Implementations report their own failures; the engine only ever sees a
/// usable `Settings` value.
pub trait SettingsStore: Send {
    /// Returns the persisted settings, or the defaults if there are none.
    fn load(&self) -> Settings;

    /// Persists `settings` for the next launch.
    fn save(&self, settings: &Settings);
}

// ============================================================================
// JsonSettingsStore
// ============================================================================

/// Stores settings as a JSON file.
#[derive(Debug, Clone)]
pub struct JsonSettingsStore {
    path: PathBuf,
}

impl JsonSettingsStore {
    /// Creates a store backed by the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates a store for `settings.json` inside `data_dir`.
    pub fn in_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join(SETTINGS_FILE))
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the settings file.
    ///
    /// Returns `Ok(None)` if the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn try_load(&self) -> Result<Option<Settings>, StoreError> {
        read_json(&self.path)
    }

    /// Writes the settings file, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn try_save(&self, settings: &Settings) -> Result<(), StoreError> {
        write_json(&self.path, settings)
    }
}

impl SettingsStore for JsonSettingsStore {
    fn load(&self) -> Settings {
        match self.try_load() {
            Ok(Some(settings)) => {
                debug!(path = %self.path.display(), "settings loaded");
                settings
            }
            Ok(None) => Settings::default(),
            Err(e) if e.is_corrupt() => {
                warn!(error = %e, "settings file is corrupt, using defaults");
                Settings::default()
            }
            Err(e) => {
                warn!(error = %e, "could not load settings, using defaults");
                Settings::default()
            }
        }
    }

    fn save(&self, settings: &Settings) {
        match self.try_save(settings) {
            Ok(()) => debug!(path = %self.path.display(), "settings saved"),
            Err(e) => warn!(error = %e, "could not save settings"),
        }
    }
}

// ============================================================================
// MemorySettingsStore
// ============================================================================

/// In-memory store for testing. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct MemorySettingsStore {
    current: Arc<Mutex<Option<Settings>>>,
    saved: Arc<Mutex<Vec<Settings>>>,
}

impl MemorySettingsStore {
    /// Creates an empty store; `load` returns the defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `settings`.
    #[must_use]
    pub fn with_settings(settings: Settings) -> Self {
        let store = Self::default();
        *store.current.lock().unwrap() = Some(settings);
        store
    }

    /// Returns every value passed to `save`, oldest first.
    #[must_use]
    pub fn saved(&self) -> Vec<Settings> {
        self.saved.lock().unwrap().clone()
    }
}

impl SettingsStore for MemorySettingsStore {
    fn load(&self) -> Settings {
        self.current.lock().unwrap().unwrap_or_default()
    }

    fn save(&self, settings: &Settings) {
        *self.current.lock().unwrap() = Some(*settings);
        self.saved.lock().unwrap().push(*settings);
    }
}

// ============================================================================
// JSON helpers
// ============================================================================

/// Reads and parses a JSON file. A missing file yields `Ok(None)`.
pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StoreError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    if content.trim().is_empty() {
        return Ok(None);
    }

    serde_json::from_str(&content)
        .map(Some)
        .map_err(|source| StoreError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

/// Serializes `value` as pretty JSON, creating parent directories.
pub(crate) fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    let io_err = |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }

    let content = serde_json::to_string_pretty(value).map_err(|source| StoreError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    fs::write(path, content).map_err(io_err)
}

// ============================================================================
// Tests
// ============================================================================
