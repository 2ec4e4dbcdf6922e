//! Output artifacts on disk.
//!
//! A run writes, into one output directory:
//! - `index.html`, the dashboard
//! - `stats.json`, the dashboard data
//! - `games.jsonl`, one normalized game per line

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::models::Game;

/// Errors that can occur while writing artifacts.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> StorageError + '_ {
    move |source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Output locations.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub output_dir: PathBuf,
}

impl StorageConfig {
    pub fn new(output_dir: PathBuf) -> Self {
        Self { output_dir }
    }

    pub fn dashboard_path(&self) -> PathBuf {
        self.output_dir.join("index.html")
    }

    pub fn stats_path(&self) -> PathBuf {
        self.output_dir.join("stats.json")
    }

    pub fn games_path(&self) -> PathBuf {
        self.output_dir.join("games.jsonl")
    }

    fn ensure_dir(&self) -> Result<(), StorageError> {
        fs::create_dir_all(&self.output_dir).map_err(io_error(&self.output_dir))
    }

    /// Replace the dashboard page.
    pub fn write_dashboard(&self, html: &str) -> Result<PathBuf, StorageError> {
        self.ensure_dir()?;
        let path = self.dashboard_path();
        fs::write(&path, html).map_err(io_error(&path))?;
        info!("Wrote dashboard ({} bytes) to {:?}", html.len(), path);
        Ok(path)
    }

    /// Replace `stats.json` with a pretty-printed value.
    pub fn write_stats<T: Serialize>(&self, stats: &T) -> Result<PathBuf, StorageError> {
        self.ensure_dir()?;
        let path = self.stats_path();
        let json = serde_json::to_string_pretty(stats)?;
        fs::write(&path, json).map_err(io_error(&path))?;
        info!("Wrote stats to {:?}", path);
        Ok(path)
    }

    /// Replace `games.jsonl`, one game per line in log order.
    pub fn write_games(&self, games: &[Game]) -> Result<usize, StorageError> {
        self.ensure_dir()?;
        let path = self.games_path();
        let file = File::create(&path).map_err(io_error(&path))?;
        let mut writer = BufWriter::new(file);

        for game in games {
            let json = serde_json::to_string(game)?;
            writeln!(writer, "{}", json).map_err(io_error(&path))?;
        }
        writer.flush().map_err(io_error(&path))?;

        info!("Wrote {} games to {:?}", games.len(), path);
        Ok(games.len())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("./site"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Score;
    use chrono::NaiveDate;

    #[test]
    fn test_storage_config_paths() {
        let config = StorageConfig::new(PathBuf::from("/out"));

        assert_eq!(config.dashboard_path(), PathBuf::from("/out/index.html"));
        assert_eq!(config.stats_path(), PathBuf::from("/out/stats.json"));
        assert_eq!(config.games_path(), PathBuf::from("/out/games.jsonl"));
    }

    #[test]
    fn test_storage_config_default() {
        assert_eq!(StorageConfig::default().output_dir, PathBuf::from("./site"));
    }

    #[test]
    fn test_write_artifacts_creates_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let config = StorageConfig::new(tmp.path().join("nested").join("site"));

        let page = config.write_dashboard("<html></html>").unwrap();
        assert_eq!(fs::read_to_string(page).unwrap(), "<html></html>");

        let stats = config.write_stats(&serde_json::json!({ "games": 3 })).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&fs::read_to_string(stats).unwrap()).unwrap();
        assert_eq!(parsed["games"], 3);
    }

    #[test]
    fn test_write_games_jsonl() {
        let tmp = tempfile::tempdir().unwrap();
        let config = StorageConfig::new(tmp.path().to_path_buf());
        let d = NaiveDate::from_ymd_opt(2024, 8, 20).unwrap();
        let games = vec![
            Game::singles(1, "A".into(), "B".into(), Score::new(21, 3), d),
            Game::singles(2, "B".into(), "A".into(), Score::new(21, 3), d),
        ];

        assert_eq!(config.write_games(&games).unwrap(), 2);
        // Rewriting replaces rather than appends.
        assert_eq!(config.write_games(&games[..1]).unwrap(), 1);

        let contents = fs::read_to_string(config.games_path()).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 1);
        let game: Game = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(game, games[0]);
    }
}
