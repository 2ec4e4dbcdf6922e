//! Ranked solo and pair views over the head-to-head table.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

use chrono::NaiveDate;

use crate::models::{
    GameLog, HeadToHead, Leaderboard, PairKey, PairStanding, Player, RankingMetric, SoloStanding,
};

use super::{calculate_average, calculate_win_percentage, PairwiseTable};

/// Something that can be placed on a leaderboard.
pub trait Ranked {
    /// Primary and secondary sort keys for `metric`, both compared descending.
    fn sort_keys(&self, metric: RankingMetric) -> (Option<f64>, Option<f64>);

    fn set_rank(&mut self, rank: u32);
}

impl Ranked for SoloStanding {
    fn sort_keys(&self, metric: RankingMetric) -> (Option<f64>, Option<f64>) {
        let wins = Some(self.wins as f64);
        let games = Some(self.total_games as f64);
        match metric {
            RankingMetric::TotalGames => (games, wins),
            RankingMetric::WinPercentage => (self.win_percentage, wins),
            RankingMetric::AvgPointDiff => (self.avg_point_diff, games),
            RankingMetric::AvgGamesPerDay => (self.avg_games_per_day, games),
        }
    }

    fn set_rank(&mut self, rank: u32) {
        self.rank = rank;
    }
}

impl Ranked for PairStanding {
    fn sort_keys(&self, metric: RankingMetric) -> (Option<f64>, Option<f64>) {
        let wins = Some(self.wins as f64);
        let games = Some(self.total_games as f64);
        match metric {
            RankingMetric::TotalGames => (games, wins),
            RankingMetric::WinPercentage => (self.win_percentage, wins),
            RankingMetric::AvgPointDiff => (self.avg_point_diff, games),
            RankingMetric::AvgGamesPerDay => (self.avg_games_per_day, games),
        }
    }

    fn set_rank(&mut self, rank: u32) {
        self.rank = rank;
    }
}

/// Descending order with undefined values last.
fn compare_desc(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Sort by the metric's keys and number the entries 1..=N.
///
/// The sort is stable, so entries tied on both keys keep their input order and
/// still get distinct consecutive ranks.
pub fn rank_by<T: Ranked>(mut entries: Vec<T>, metric: RankingMetric) -> Leaderboard<T> {
    entries.sort_by(|a, b| {
        let (a1, a2) = a.sort_keys(metric);
        let (b1, b2) = b.sort_keys(metric);
        compare_desc(a1, b1).then_with(|| compare_desc(a2, b2))
    });

    for (i, entry) in entries.iter_mut().enumerate() {
        entry.set_rank(i as u32 + 1);
    }

    Leaderboard { metric, entries }
}

/// Distinct singles dates per player and per pair.
struct ActivityDays {
    players: HashMap<Player, BTreeSet<NaiveDate>>,
    pairs: HashMap<PairKey, BTreeSet<NaiveDate>>,
}

impl ActivityDays {
    fn from_log(log: &GameLog) -> Self {
        let mut players: HashMap<Player, BTreeSet<NaiveDate>> = HashMap::new();
        let mut pairs: HashMap<PairKey, BTreeSet<NaiveDate>> = HashMap::new();

        for game in log.singles() {
            if let Some((first, second)) = game.singles_players() {
                players.entry(first.clone()).or_default().insert(game.date);
                players.entry(second.clone()).or_default().insert(game.date);
                pairs
                    .entry(PairKey::new(first, second))
                    .or_default()
                    .insert(game.date);
            }
        }

        Self { players, pairs }
    }

    fn for_player(&self, player: &Player) -> u32 {
        self.players.get(player).map(|d| d.len() as u32).unwrap_or(0)
    }

    fn for_pair(&self, key: &PairKey) -> u32 {
        self.pairs.get(key).map(|d| d.len() as u32).unwrap_or(0)
    }
}

/// Unranked per-player totals in roster order, skipping players with no games.
pub fn solo_standings(table: &PairwiseTable, log: &GameLog) -> Vec<SoloStanding> {
    let days = ActivityDays::from_log(log);

    table
        .players()
        .iter()
        .filter_map(|player| {
            let rows = table.rows_for(player);
            let wins: u32 = rows.iter().map(|r| r.wins).sum();
            let losses: u32 = rows.iter().map(|r| r.losses).sum();
            let total_games = wins + losses;
            if total_games == 0 {
                return None;
            }

            let point_diff: i64 = rows.iter().map(|r| r.raw_point_diff).sum();
            let days_played = days.for_player(player);

            Some(SoloStanding {
                rank: 0,
                player: player.clone(),
                wins,
                losses,
                total_games,
                points_for: rows.iter().map(|r| r.points_for).sum(),
                points_against: rows.iter().map(|r| r.points_against).sum(),
                point_diff,
                days_played,
                win_percentage: calculate_win_percentage(wins, losses),
                avg_point_diff: calculate_average(point_diff as f64, total_games),
                avg_games_per_day: calculate_average(total_games as f64, days_played),
            })
        })
        .collect()
}

/// Pick the direction of a pairing to report.
///
/// Win-percentage boards lead with the player with more wins; every other metric
/// leads with the player level or ahead on points. Remaining ties go to the
/// alphabetically first player.
fn leading_row<'a>(
    row: &'a HeadToHead,
    mirror: &'a HeadToHead,
    metric: RankingMetric,
) -> &'a HeadToHead {
    let by_points = row.raw_point_diff.cmp(&mirror.raw_point_diff);
    let ordering = match metric {
        RankingMetric::WinPercentage => row.wins.cmp(&mirror.wins).then(by_points),
        _ => by_points,
    };

    match ordering {
        Ordering::Greater => row,
        Ordering::Less => mirror,
        Ordering::Equal => {
            if row.player <= mirror.player {
                row
            } else {
                mirror
            }
        }
    }
}

/// Unranked standings for every pair that has played, each pair exactly once,
/// oriented for `metric`.
pub fn pair_standings(
    table: &PairwiseTable,
    log: &GameLog,
    metric: RankingMetric,
) -> Vec<PairStanding> {
    let days = ActivityDays::from_log(log);
    let players = table.players();
    let mut standings = Vec::new();

    for (i, a) in players.iter().enumerate() {
        for b in &players[i + 1..] {
            let (Some(ab), Some(ba)) = (table.get(a, b), table.get(b, a)) else {
                continue;
            };
            if ab.total_games() == 0 {
                continue;
            }

            let lead = leading_row(ab, ba, metric);
            let total_games = lead.total_games();
            let days_played = days.for_pair(&PairKey::new(a, b));

            standings.push(PairStanding {
                rank: 0,
                player1: lead.player.clone(),
                player2: lead.opponent.clone(),
                wins: lead.wins,
                losses: lead.losses,
                total_games,
                point_diff: lead.raw_point_diff,
                days_played,
                record: lead.record(),
                win_percentage: calculate_win_percentage(lead.wins, lead.losses),
                avg_point_diff: calculate_average(lead.raw_point_diff as f64, total_games),
                avg_games_per_day: calculate_average(total_games as f64, days_played),
            });
        }
    }

    standings
}

pub fn solo_leaderboard(
    table: &PairwiseTable,
    log: &GameLog,
    metric: RankingMetric,
) -> Leaderboard<SoloStanding> {
    rank_by(solo_standings(table, log), metric)
}

pub fn pair_leaderboard(
    table: &PairwiseTable,
    log: &GameLog,
    metric: RankingMetric,
) -> Leaderboard<PairStanding> {
    rank_by(pair_standings(table, log, metric), metric)
}
