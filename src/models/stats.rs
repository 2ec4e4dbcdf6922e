//! Derived statistics models.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Player;

/// Metric a leaderboard is sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RankingMetric {
    TotalGames,
    WinPercentage,
    AvgPointDiff,
    AvgGamesPerDay,
}

impl RankingMetric {
    pub const ALL: [RankingMetric; 4] = [
        RankingMetric::TotalGames,
        RankingMetric::WinPercentage,
        RankingMetric::AvgPointDiff,
        RankingMetric::AvgGamesPerDay,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RankingMetric::TotalGames => "total-games",
            RankingMetric::WinPercentage => "win-percentage",
            RankingMetric::AvgPointDiff => "avg-point-diff",
            RankingMetric::AvgGamesPerDay => "avg-games-per-day",
        }
    }
}

impl fmt::Display for RankingMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RankingMetric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "total-games" | "games" => Ok(RankingMetric::TotalGames),
            "win-percentage" | "win-pct" | "wins" => Ok(RankingMetric::WinPercentage),
            "avg-point-diff" | "point-diff" => Ok(RankingMetric::AvgPointDiff),
            "avg-games-per-day" | "games-per-day" => Ok(RankingMetric::AvgGamesPerDay),
            other => Err(format!(
                "unknown metric '{}', expected one of: total-games, win-percentage, avg-point-diff, avg-games-per-day",
                other
            )),
        }
    }
}

/// Head-to-head tally of `player` against `opponent` (one directed row).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadToHead {
    pub player: Player,
    pub opponent: Player,
    pub wins: u32,
    pub losses: u32,
    pub points_for: u64,
    pub points_against: u64,
    /// Raw signed sum; use [`HeadToHead::point_diff`] for the reported value.
    pub raw_point_diff: i64,
}

impl HeadToHead {
    pub fn new(player: Player, opponent: Player) -> Self {
        Self {
            player,
            opponent,
            wins: 0,
            losses: 0,
            points_for: 0,
            points_against: 0,
            raw_point_diff: 0,
        }
    }

    pub fn total_games(&self) -> u32 {
        self.wins + self.losses
    }

    /// Signed point differential, undefined when the two never played.
    pub fn point_diff(&self) -> Option<i64> {
        (self.total_games() > 0).then_some(self.raw_point_diff)
    }

    /// Wins minus losses, undefined when the two never played.
    pub fn win_differential(&self) -> Option<i64> {
        (self.total_games() > 0).then_some(self.wins as i64 - self.losses as i64)
    }

    /// "wins-losses"
    pub fn record(&self) -> String {
        format!("{}-{}", self.wins, self.losses)
    }
}

/// Serialized view of one pairwise-table cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixCell {
    pub player1: Player,
    pub player2: Player,
    pub wins: u32,
    pub losses: u32,
    pub points_for: u64,
    pub points_against: u64,
    pub total_games: u32,
    pub point_diff: Option<i64>,
    pub win_differential: Option<i64>,
    pub record: String,
}

impl From<&HeadToHead> for MatrixCell {
    fn from(row: &HeadToHead) -> Self {
        Self {
            player1: row.player.clone(),
            player2: row.opponent.clone(),
            wins: row.wins,
            losses: row.losses,
            points_for: row.points_for,
            points_against: row.points_against,
            total_games: row.total_games(),
            point_diff: row.point_diff(),
            win_differential: row.win_differential(),
            record: row.record(),
        }
    }
}

/// One player's line on a solo leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoloStanding {
    pub rank: u32,
    pub player: Player,
    pub wins: u32,
    pub losses: u32,
    pub total_games: u32,
    pub points_for: u64,
    pub points_against: u64,
    pub point_diff: i64,
    pub days_played: u32,
    pub win_percentage: Option<f64>,
    pub avg_point_diff: Option<f64>,
    pub avg_games_per_day: Option<f64>,
}

/// One pair's line on a pair leaderboard.
///
/// `player1` is the player who is level or ahead on points in the pairing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairStanding {
    pub rank: u32,
    pub player1: Player,
    pub player2: Player,
    pub wins: u32,
    pub losses: u32,
    pub total_games: u32,
    pub point_diff: i64,
    pub days_played: u32,
    pub record: String,
    pub win_percentage: Option<f64>,
    pub avg_point_diff: Option<f64>,
    pub avg_games_per_day: Option<f64>,
}

/// A ranked list under one metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leaderboard<T> {
    pub metric: RankingMetric,
    pub entries: Vec<T>,
}

impl<T> Leaderboard<T> {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A player's statistics on one calendar day, including running totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub games: u32,
    pub wins: u32,
    pub point_diff: i64,
    pub cumulative_games: u32,
    pub cumulative_wins: u32,
    pub cumulative_point_diff: i64,
    /// 0 until the first game, so the chart line starts at the axis.
    pub win_percentage: f64,
    pub rolling_avg_games: Option<f64>,
    pub avg_point_diff: Option<f64>,
}

/// Full daily series for one player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerTimeline {
    pub player: Player,
    pub total_games: u32,
    pub days_played: u32,
    pub avg_games_per_day: Option<f64>,
    pub points: Vec<DailyPoint>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_parse_and_display() {
        for metric in RankingMetric::ALL {
            assert_eq!(metric.to_string().parse::<RankingMetric>(), Ok(metric));
        }
        assert_eq!("win_pct".parse::<RankingMetric>(), Ok(RankingMetric::WinPercentage));
        assert!("elo".parse::<RankingMetric>().is_err());
    }

    #[test]
    fn test_unplayed_row_is_undefined() {
        let row = HeadToHead::new("A".into(), "B".into());

        assert_eq!(row.total_games(), 0);
        assert_eq!(row.point_diff(), None);
        assert_eq!(row.win_differential(), None);
        assert_eq!(row.record(), "0-0");
    }

    #[test]
    fn test_matrix_cell_from_row() {
        let mut row = HeadToHead::new("A".into(), "B".into());
        row.wins = 2;
        row.losses = 1;
        row.points_for = 52;
        row.points_against = 55;
        row.raw_point_diff = -3;

        let cell = MatrixCell::from(&row);
        assert_eq!(cell.total_games, 3);
        assert_eq!(cell.point_diff, Some(-3));
        assert_eq!(cell.win_differential, Some(1));
        assert_eq!(cell.record, "2-1");

        let json = serde_json::to_value(&cell).unwrap();
        assert_eq!(json["player1"], "A");
    }

    #[test]
    fn test_undefined_serializes_as_null() {
        let cell = MatrixCell::from(&HeadToHead::new("A".into(), "A".into()));
        let json = serde_json::to_value(&cell).unwrap();
        assert!(json["point_diff"].is_null());
        assert!(json["win_differential"].is_null());
    }
}
