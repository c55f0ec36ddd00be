use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Backing storage for the best score across sessions
pub trait HighScoreStore {
    /// Read the stored high score; 0 when nothing has been saved yet
    fn load(&self) -> Result<u32>;

    /// Overwrite the stored high score
    fn save(&mut self, high_score: u32) -> Result<()>;
}

/// On-disk representation of the high score
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HighScoreRecord {
    pub high_score: u32,

    /// Version that wrote the file
    pub version: String,
}

impl HighScoreRecord {
    pub fn new(high_score: u32) -> Self {
        Self {
            high_score,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Stores the high score as a small JSON document
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl HighScoreStore for JsonFileStore {
    fn load(&self) -> Result<u32> {
        if !self.path.exists() {
            return Ok(0);
        }

        let json = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read high score from {:?}", self.path))?;
        let record: HighScoreRecord =
            serde_json::from_str(&json).context("Failed to deserialize high score")?;

        Ok(record.high_score)
    }

    fn save(&mut self, high_score: u32) -> Result<()> {
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {:?}", parent))?;

        let json = serde_json::to_string_pretty(&HighScoreRecord::new(high_score))
            .context("Failed to serialize high score")?;

        // Write beside the target and rename over it, so the old record
        // survives an interrupted write
        let mut staged = NamedTempFile::new_in(parent)
            .with_context(|| format!("Failed to create temp file in {:?}", parent))?;
        staged
            .write_all(json.as_bytes())
            .context("Failed to write high score")?;
        staged.as_file().sync_all().context("Failed to sync high score")?;
        staged
            .persist(&self.path)
            .with_context(|| format!("Failed to write high score to {:?}", self.path))?;

        Ok(())
    }
}

/// Keeps the high score in memory only
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    high_score: u32,
}

impl MemoryStore {
    pub fn new(high_score: u32) -> Self {
        Self { high_score }
    }
}

impl HighScoreStore for MemoryStore {
    fn load(&self) -> Result<u32> {
        Ok(self.high_score)
    }

    fn save(&mut self, high_score: u32) -> Result<()> {
        self.high_score = high_score;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_loads_zero() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path().join("absent.json"));

        assert_eq!(store.load().unwrap(), 0);
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("high_score.json");
        let mut store = JsonFileStore::new(&path);

        store.save(120).unwrap();
        assert!(path.exists());

        let reopened = JsonFileStore::new(&path);
        assert_eq!(reopened.load().unwrap(), 120);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("high_score.json");
        std::fs::write(&path, "not json").unwrap();

        let store = JsonFileStore::new(&path);
        assert!(store.load().is_err());
    }

    #[test]
    fn test_memory_store_keeps_last_save() {
        let mut store = MemoryStore::new(30);
        assert_eq!(store.load().unwrap(), 30);

        store.save(50).unwrap();
        assert_eq!(store.load().unwrap(), 50);
    }

    #[test]
    fn test_save_replaces_record_without_leftovers() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("high_score.json");
        let mut store = JsonFileStore::new(&path);

        store.save(40).unwrap();
        store.save(90).unwrap();

        assert_eq!(JsonFileStore::new(&path).load().unwrap(), 90);
        let files: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(files.len(), 1, "staging file must be renamed into place");
    }

    #[test]
    fn test_failed_save_keeps_previous_record() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("high_score.json");
        let mut store = JsonFileStore::new(&path);
        store.save(70).unwrap();

        // The target is now a directory, so the rename must fail
        let blocked = dir.path().join("blocked");
        std::fs::create_dir_all(blocked.join("inner")).unwrap();
        let mut broken = JsonFileStore::new(&blocked);
        assert!(broken.save(10).is_err());

        assert_eq!(store.load().unwrap(), 70);
        let entries = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(entries, 2, "failed write must not leave a staging file");
    }
}
