//! CSV ingestion of game records.
//!
//! Expected header: `player1,player2,player3,player4,score1,score2,date`.
//! Rows with empty `player3`/`player4` are singles (player1 vs player2); other
//! rows are doubles, player1 & player2 against player3 & player4. Any malformed
//! row fails the whole load.

use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::models::{DatasetFingerprint, Game, GameError, GameLog, Player, Score, Team};

/// Column names, in file order.
pub const CSV_HEADER: [&str; 7] = [
    "player1", "player2", "player3", "player4", "score1", "score2", "date",
];

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Errors that can occur while loading games.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV header is missing column '{0}'")]
    MissingColumn(&'static str),

    #[error("line {line}: missing {field}")]
    MissingField { line: u64, field: &'static str },

    #[error("line {line}: invalid {field} '{value}', expected a non-negative integer")]
    InvalidScore {
        line: u64,
        field: &'static str,
        value: String,
    },

    #[error("line {line}: invalid date '{value}', expected YYYY-MM-DD")]
    InvalidDate { line: u64, value: String },

    #[error("line {line}: doubles rows need both player3 and player4")]
    IncompleteDoubles { line: u64 },

    #[error("line {line}: {source}")]
    InvalidGame {
        line: u64,
        #[source]
        source: GameError,
    },
}

/// One CSV row, as written on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRow {
    pub player1: Option<String>,
    pub player2: Option<String>,
    pub player3: Option<String>,
    pub player4: Option<String>,
    pub score1: Option<String>,
    pub score2: Option<String>,
    pub date: Option<String>,
}

fn required(value: &Option<String>, line: u64, field: &'static str) -> Result<String, IngestError> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(IngestError::MissingField { line, field }),
    }
}

fn optional(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn parse_score(value: &Option<String>, line: u64, field: &'static str) -> Result<u32, IngestError> {
    let raw = required(value, line, field)?;
    raw.parse()
        .map_err(|_| IngestError::InvalidScore { line, field, value: raw })
}

impl GameRow {
    pub fn singles(player1: &str, player2: &str, score: Score, date: NaiveDate) -> Self {
        Self {
            player1: Some(player1.to_string()),
            player2: Some(player2.to_string()),
            player3: None,
            player4: None,
            score1: Some(score.first.to_string()),
            score2: Some(score.second.to_string()),
            date: Some(date.format(DATE_FORMAT).to_string()),
        }
    }

    pub fn doubles(players: [&str; 4], score: Score, date: NaiveDate) -> Self {
        Self {
            player3: Some(players[2].to_string()),
            player4: Some(players[3].to_string()),
            ..Self::singles(players[0], players[1], score, date)
        }
    }

    /// Convert to a validated game. `line` is the 1-based CSV line number.
    pub fn into_game(self, line: u64) -> Result<Game, IngestError> {
        let player1 = required(&self.player1, line, "player1")?;
        let player2 = required(&self.player2, line, "player2")?;
        let score = Score::new(
            parse_score(&self.score1, line, "score1")?,
            parse_score(&self.score2, line, "score2")?,
        );

        let raw_date = required(&self.date, line, "date")?;
        let date = NaiveDate::parse_from_str(&raw_date, DATE_FORMAT)
            .map_err(|_| IngestError::InvalidDate { line, value: raw_date })?;

        let seq = line as usize;
        let game = match (optional(&self.player3), optional(&self.player4)) {
            (None, None) => Game::singles(seq, Player::new(player1), Player::new(player2), score, date),
            (Some(player3), Some(player4)) => Game::doubles(
                seq,
                Team::new(Player::new(player1), Player::new(player2)),
                Team::new(Player::new(player3), Player::new(player4)),
                score,
                date,
            ),
            _ => return Err(IngestError::IncompleteDoubles { line }),
        };

        game.validate()
            .map_err(|source| IngestError::InvalidGame { line, source })?;

        Ok(game)
    }
}

/// Parse every row of a CSV stream into a game log, in file order.
pub fn parse_games<R: Read>(reader: R) -> Result<GameLog, IngestError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    for column in CSV_HEADER {
        if !headers.iter().any(|h| h == column) {
            return Err(IngestError::MissingColumn(column));
        }
    }

    let mut games = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let row: GameRow = record.deserialize(Some(&headers))?;
        let game = row.into_game(line)?;
        debug!("line {}: {}", line, game);
        games.push(game);
    }

    Ok(GameLog::new(games))
}

/// Load games from a CSV file. Also returns a fingerprint of the file contents.
pub fn load_games(path: &Path) -> Result<(GameLog, DatasetFingerprint), IngestError> {
    let bytes = std::fs::read(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let log = parse_games(bytes.as_slice())?;
    info!(
        "Loaded {} games ({} singles, {} doubles) from {:?}",
        log.len(),
        log.singles().count(),
        log.doubles().count(),
        path
    );

    Ok((log, DatasetFingerprint::of_bytes(&bytes)))
}
