//! Statistics calculation engine.
//!
//! Computes derived metrics from the game log:
//! - Dense head-to-head table (`pairwise`)
//! - Solo and pair leaderboards (`leaderboard`)
//! - Daily cumulative and rolling series per player (`timeline`)

pub mod leaderboard;
pub mod pairwise;
pub mod timeline;

pub use leaderboard::*;
pub use pairwise::*;
pub use timeline::*;

use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::models::{
    DateRange, Game, GameError, GameId, GameLog, Leaderboard, MatrixCell, PairStanding, Player,
    PlayerTimeline, RankingMetric, Roster, Score, Side, SoloStanding,
};

/// Errors raised while aggregating games.
#[derive(Debug, Error)]
pub enum StatsError {
    #[error("game {game} references unknown player '{player}'")]
    UnknownPlayer { game: GameId, player: Player },

    #[error("game {game} has tied score {score}, no winner can be determined")]
    TiedScore { game: GameId, score: Score },

    #[error("game {game} lists player '{player}' more than once")]
    RepeatedPlayer { game: GameId, player: Player },
}

/// Check a game is well-formed and every participant is on the roster.
/// Returns the winning side.
pub(crate) fn check_game(game: &Game, roster: &Roster) -> Result<Side, StatsError> {
    for player in game.players() {
        if !roster.contains(player) {
            return Err(StatsError::UnknownPlayer {
                game: game.id.clone(),
                player: player.clone(),
            });
        }
    }

    match game.validate() {
        Ok(()) => {}
        Err(GameError::TiedScore(score)) => {
            return Err(StatsError::TiedScore {
                game: game.id.clone(),
                score,
            })
        }
        Err(GameError::RepeatedPlayer(player)) => {
            return Err(StatsError::RepeatedPlayer {
                game: game.id.clone(),
                player,
            })
        }
    }

    game.winning_side().ok_or_else(|| StatsError::TiedScore {
        game: game.id.clone(),
        score: game.score,
    })
}

pub(crate) fn roster_position(
    roster: &Roster,
    game: &Game,
    player: &Player,
) -> Result<usize, StatsError> {
    roster
        .position(player)
        .ok_or_else(|| StatsError::UnknownPlayer {
            game: game.id.clone(),
            player: player.clone(),
        })
}

/// Win percentage (0-100), undefined when no games were played.
pub fn calculate_win_percentage(wins: u32, losses: u32) -> Option<f64> {
    let total = wins + losses;
    if total == 0 {
        None
    } else {
        Some(100.0 * wins as f64 / total as f64)
    }
}

/// Mean of `total` over `count`, undefined for a zero count.
pub fn calculate_average(total: f64, count: u32) -> Option<f64> {
    if count == 0 {
        None
    } else {
        Some(total / count as f64)
    }
}

/// The roster to aggregate over: the configured names in their given order, or
/// every name in the log sorted alphabetically when none are configured.
pub fn resolve_roster(log: &GameLog, configured: &[String]) -> Roster {
    if configured.is_empty() {
        Roster::sorted(log.players())
    } else {
        Roster::new(configured.iter().map(|name| Player::new(name.trim())))
    }
}

/// Everything the dashboard shows, computed in one pass.
#[derive(Debug, Clone, Serialize)]
pub struct StatsReport {
    pub players: Vec<Player>,
    pub date_range: Option<DateRange>,
    pub singles_games: u32,
    pub doubles_games: u32,
    pub matrix: Vec<MatrixCell>,
    pub solo_leaderboards: Vec<Leaderboard<SoloStanding>>,
    pub pair_leaderboards: Vec<Leaderboard<PairStanding>>,
    pub timelines: Vec<PlayerTimeline>,
}

impl StatsReport {
    /// Aggregate `log` over `roster`, building every leaderboard metric and the
    /// daily series with a `window_days` rolling window.
    pub fn compute(log: &GameLog, roster: &Roster, window_days: usize) -> Result<Self, StatsError> {
        let table = aggregate_pairwise(log, roster)?;
        info!(
            "Aggregated {} singles games across {} players",
            table.games_counted(),
            roster.len()
        );

        let solo_leaderboards = RankingMetric::ALL
            .iter()
            .map(|metric| solo_leaderboard(&table, log, *metric))
            .collect();
        let pair_leaderboards = RankingMetric::ALL
            .iter()
            .map(|metric| pair_leaderboard(&table, log, *metric))
            .collect();

        let timelines = build_timelines(log, roster, window_days)?;
        info!(
            "Built daily series for {} players over {} days",
            timelines.players.len(),
            timelines.calendar.map(|c| c.days().len()).unwrap_or(0)
        );

        Ok(Self {
            players: roster.players().to_vec(),
            date_range: timelines.calendar,
            singles_games: table.games_counted(),
            doubles_games: log.doubles().count() as u32,
            matrix: table.cells(),
            solo_leaderboards,
            pair_leaderboards,
            timelines: timelines.players,
        })
    }

    pub fn solo(&self, metric: RankingMetric) -> Option<&Leaderboard<SoloStanding>> {
        self.solo_leaderboards.iter().find(|l| l.metric == metric)
    }

    pub fn pairs(&self, metric: RankingMetric) -> Option<&Leaderboard<PairStanding>> {
        self.pair_leaderboards.iter().find(|l| l.metric == metric)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Team;
    use chrono::NaiveDate;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 8, day).unwrap()
    }

    #[test]
    fn test_calculate_win_percentage() {
        assert_eq!(calculate_win_percentage(3, 1), Some(75.0));
        assert_eq!(calculate_win_percentage(0, 4), Some(0.0));
        assert_eq!(calculate_win_percentage(0, 0), None);
    }

    #[test]
    fn test_calculate_average() {
        assert_eq!(calculate_average(-9.0, 3), Some(-3.0));
        assert_eq!(calculate_average(5.0, 0), None);
    }

    #[test]
    fn test_resolve_roster() {
        let log = GameLog::new(vec![Game::singles(
            1,
            "Zed".into(),
            "Amy".into(),
            Score::new(21, 4),
            date(1),
        )]);

        let derived = resolve_roster(&log, &[]);
        assert_eq!(derived.players()[0], Player::from("Amy"));

        let configured = resolve_roster(&log, &["Zed".to_string(), " Amy ".to_string(), "Bo".to_string()]);
        assert_eq!(configured.len(), 3);
        assert_eq!(configured.position(&"Amy".into()), Some(1));
    }

    #[test]
    fn test_report_compute() {
        let log = GameLog::new(vec![
            Game::singles(1, "A".into(), "B".into(), Score::new(21, 15), date(1)),
            Game::singles(2, "B".into(), "A".into(), Score::new(21, 10), date(2)),
            Game::doubles(
                3,
                Team::new("A".into(), "B".into()),
                Team::new("C".into(), "D".into()),
                Score::new(21, 18),
                date(2),
            ),
            Game::singles(4, "A".into(), "B".into(), Score::new(21, 19), date(3)),
        ]);
        let roster = resolve_roster(&log, &[]);
        let report = StatsReport::compute(&log, &roster, 7).unwrap();

        assert_eq!(report.players.len(), 4);
        assert_eq!(report.singles_games, 3);
        assert_eq!(report.doubles_games, 1);
        assert_eq!(report.matrix.len(), 16);
        assert_eq!(report.solo_leaderboards.len(), 4);
        assert_eq!(report.pair_leaderboards.len(), 4);
        assert_eq!(report.timelines.len(), 4);
        assert_eq!(report.date_range.unwrap().days().len(), 3);

        let by_games = report.solo(RankingMetric::TotalGames).unwrap();
        assert_eq!(by_games.len(), 2); // C and D only played doubles
        assert_eq!(report.pairs(RankingMetric::TotalGames).unwrap().len(), 1);
    }

    #[test]
    fn test_report_rejects_doubles_outside_roster() {
        let log = GameLog::new(vec![
            Game::singles(1, "A".into(), "B".into(), Score::new(21, 15), date(1)),
            Game::doubles(
                2,
                Team::new("A".into(), "B".into()),
                Team::new("Zed".into(), "Ghost".into()),
                Score::new(21, 5),
                date(2),
            ),
        ]);
        let roster = resolve_roster(&log, &["A".to_string(), "B".to_string()]);

        assert!(matches!(
            StatsReport::compute(&log, &roster, 7),
            Err(StatsError::UnknownPlayer { ref player, .. }) if player.name() == "Zed"
        ));
    }

    #[test]
    fn test_report_with_large_scores() {
        let log = GameLog::new(vec![
            Game::singles(1, "A".into(), "B".into(), Score::new(3_000_000_000, 1), date(1)),
            Game::singles(2, "A".into(), "B".into(), Score::new(3_000_000_000, 1), date(2)),
        ]);
        let roster = resolve_roster(&log, &[]);
        let report = StatsReport::compute(&log, &roster, 7).unwrap();

        let leader = &report.solo(RankingMetric::TotalGames).unwrap().entries[0];
        assert_eq!(leader.points_for, 6_000_000_000);
    }

    #[test]
    fn test_report_rejects_unknown_player() {
        let log = GameLog::new(vec![Game::singles(
            1,
            "A".into(),
            "B".into(),
            Score::new(21, 15),
            date(1),
        )]);
        let roster = Roster::new(vec![Player::from("A")]);

        assert!(matches!(
            StatsReport::compute(&log, &roster, 7),
            Err(StatsError::UnknownPlayer { .. })
        ));
    }
}
