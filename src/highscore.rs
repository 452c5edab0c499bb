//! JSON file high score store.
//!
//! The file holds a single object: `{"highscore": N}`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::HighScoreStore;

/// File name used when no path is given on the command line.
pub const DEFAULT_HIGHSCORE_FILE: &str = "block_puzzle_highscore.json";

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct HighScoreFile {
    highscore: u32,
}

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> anyhow::Result<u32> {
        let text = fs::read_to_string(&self.path)?;
        let file: HighScoreFile = serde_json::from_str(&text)?;
        Ok(file.highscore)
    }

    fn write(&self, score: u32) -> anyhow::Result<()> {
        let text = serde_json::to_string(&HighScoreFile { highscore: score })?;
        fs::write(&self.path, text)?;
        Ok(())
    }
}

impl Default for JsonFileStore {
    fn default() -> Self {
        Self::new(DEFAULT_HIGHSCORE_FILE)
    }
}

impl HighScoreStore for JsonFileStore {
    /// Missing or unreadable files count as no record.
    fn load(&self) -> u32 {
        match self.read() {
            Ok(score) => score,
            Err(e) => {
                debug!(path = %self.path.display(), error = %e, "no stored high score");
                0
            }
        }
    }

    fn save(&self, score: u32) {
        if let Err(e) = self.write(score) {
            warn!(path = %self.path.display(), error = %e, "failed to save high score");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("block_puzzle_{}_{}.json", name, std::process::id()))
    }

    #[test]
    fn test_missing_file_loads_zero() {
        let store = JsonFileStore::new(temp_path("missing"));
        assert_eq!(store.load(), 0);
    }

    #[test]
    fn test_save_then_load() {
        let path = temp_path("roundtrip");
        let store = JsonFileStore::new(&path);
        store.save(1230);
        assert_eq!(store.load(), 1230);
        assert_eq!(fs::read_to_string(&path).unwrap(), r#"{"highscore":1230}"#);
        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_corrupt_file_loads_zero() {
        let path = temp_path("corrupt");
        fs::write(&path, "not json").unwrap();
        assert_eq!(JsonFileStore::new(&path).load(), 0);
        let _ = fs::remove_file(path);
    }
}
