//! Persisted language preference: one key in a client-local key-value store.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

/// Key under which the last loaded language code is stored.
pub const PREFERENCE_KEY: &str = "landing.lang";

#[derive(Debug, Error)]
pub enum PreferenceError {
    #[error("Failed to access preference store at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode preference store: {0}")]
    Encode(#[from] serde_json::Error),
}

/// A store that remembers the last successfully loaded language.
///
/// Values are plain strings: anything may have been written by an older
/// page version, so readers validate before trusting them.
pub trait PreferenceStore {
    fn load(&self) -> Option<String>;

    fn save(&mut self, code: &str) -> Result<(), PreferenceError>;
}

/// Preference kept only for the lifetime of the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferenceStore {
    value: Option<String>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(code: &str) -> Self {
        Self {
            value: Some(code.to_string()),
        }
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn load(&self) -> Option<String> {
        self.value.clone()
    }

    fn save(&mut self, code: &str) -> Result<(), PreferenceError> {
        self.value = Some(code.to_string());
        Ok(())
    }
}

/// Preference persisted as a JSON object in a file, so it survives across
/// sessions. Other keys already in the file are preserved on save.
#[derive(Debug, Clone)]
pub struct FilePreferenceStore {
    path: PathBuf,
}

impl FilePreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole store. A missing file is an empty store; an unreadable
    /// or corrupt one is logged and treated as empty.
    fn read_entries(&self) -> BTreeMap<String, String> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return BTreeMap::new(),
            Err(e) => {
                warn!("Failed to read preference store {:?}: {}", self.path, e);
                return BTreeMap::new();
            }
        };

        serde_json::from_str(&contents).unwrap_or_else(|e| {
            warn!("Ignoring corrupt preference store {:?}: {}", self.path, e);
            BTreeMap::new()
        })
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn load(&self) -> Option<String> {
        self.read_entries().remove(PREFERENCE_KEY)
    }

    fn save(&mut self, code: &str) -> Result<(), PreferenceError> {
        let mut entries = self.read_entries();
        entries.insert(PREFERENCE_KEY.to_string(), code.to_string());

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| PreferenceError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let json = serde_json::to_string_pretty(&entries)?;
        fs::write(&self.path, json).map_err(|source| PreferenceError::Io {
            path: self.path.clone(),
            source,
        })
    }
}
