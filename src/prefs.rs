// Preference storage - one boolean per key, persisted across sessions
//
// The controller does not talk to the filesystem; it is handed a PrefStore
// capability and calls read exactly once at construction and write once per
// preference toggle. FilePrefs keeps a flat TOML table of booleans in the
// user config directory; MemoryPrefs backs tests and the no-home fallback.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

/// Boolean preference storage
pub trait PrefStore: Send + Sync {
    /// Read a preference. None means absent or unreadable; the caller
    /// applies its documented default.
    fn read(&self, key: &str) -> Option<bool>;

    /// Persist a preference
    fn write(&self, key: &str, value: bool) -> Result<()>;
}

/// TOML-file-backed store at ~/.config/evlog/prefs.toml
pub struct FilePrefs {
    path: PathBuf,
}

impl FilePrefs {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Store at the default location, or None when no config dir exists
    pub fn open_default() -> Option<Self> {
        let path = dirs::config_dir()?.join("evlog").join("prefs.toml");
        Some(Self::new(path))
    }

    fn load(&self) -> Result<HashMap<String, bool>> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }
        let raw = std::fs::read_to_string(&self.path)
            .with_context(|| format!("reading {}", self.path.display()))?;
        toml::from_str(&raw).with_context(|| format!("parsing {}", self.path.display()))
    }
}

impl PrefStore for FilePrefs {
    fn read(&self, key: &str) -> Option<bool> {
        match self.load() {
            Ok(map) => map.get(key).copied(),
            Err(e) => {
                // Unreadable storage must not break the caller; it falls
                // back to its default.
                tracing::warn!("preference read failed: {e:#}");
                None
            }
        }
    }

    fn write(&self, key: &str, value: bool) -> Result<()> {
        let mut map = self.load().unwrap_or_default();
        map.insert(key.to_string(), value);

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let raw = toml::to_string(&map).context("serializing preferences")?;
        std::fs::write(&self.path, raw)
            .with_context(|| format!("writing {}", self.path.display()))
    }
}

/// In-memory store for tests and environments without a config directory
#[derive(Default)]
pub struct MemoryPrefs {
    values: Mutex<HashMap<String, bool>>,
    writes: Mutex<usize>,
}

impl MemoryPrefs {
    pub fn new() -> Self {
        Self::default()
    }

    /// How many writes have been issued (test instrumentation)
    #[allow(dead_code)]
    pub fn write_count(&self) -> usize {
        *self.writes.lock().unwrap()
    }
}

impl PrefStore for MemoryPrefs {
    fn read(&self, key: &str) -> Option<bool> {
        self.values.lock().unwrap().get(key).copied()
    }

    fn write(&self, key: &str, value: bool) -> Result<()> {
        self.values.lock().unwrap().insert(key.to_string(), value);
        *self.writes.lock().unwrap() += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_prefs_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.toml");

        let prefs = FilePrefs::new(path.clone());
        assert_eq!(prefs.read("auto_expand"), None);

        prefs.write("auto_expand", false).unwrap();
        assert_eq!(prefs.read("auto_expand"), Some(false));

        // A fresh instance over the same file sees the persisted value.
        let reopened = FilePrefs::new(path);
        assert_eq!(reopened.read("auto_expand"), Some(false));
    }

    #[test]
    fn file_prefs_keeps_unrelated_keys_on_write() {
        let dir = tempfile::tempdir().unwrap();
        let prefs = FilePrefs::new(dir.path().join("prefs.toml"));

        prefs.write("auto_expand", true).unwrap();
        prefs.write("other_flag", false).unwrap();

        assert_eq!(prefs.read("auto_expand"), Some(true));
        assert_eq!(prefs.read("other_flag"), Some(false));
    }

    #[test]
    fn corrupt_file_reads_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.toml");
        std::fs::write(&path, "not = [valid").unwrap();

        let prefs = FilePrefs::new(path);
        assert_eq!(prefs.read("auto_expand"), None);
    }

    #[test]
    fn memory_prefs_counts_writes() {
        let prefs = MemoryPrefs::new();
        assert_eq!(prefs.read("k"), None);
        prefs.write("k", true).unwrap();
        prefs.write("k", false).unwrap();
        assert_eq!(prefs.read("k"), Some(false));
        assert_eq!(prefs.write_count(), 2);
    }
}
