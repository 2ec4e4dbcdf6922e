//! Daily cumulative and rolling series per player.

use std::collections::{BTreeSet, HashMap};

use chrono::NaiveDate;
use tracing::debug;

use crate::models::{DailyPoint, DateRange, GameLog, Player, PlayerTimeline, Roster};

use super::{calculate_average, check_game, StatsError};

/// Trailing window, in days, for the rolling games-per-day average.
pub const DEFAULT_ROLLING_WINDOW_DAYS: usize = 7;

/// Series for every roster player over a shared calendar.
#[derive(Debug, Clone)]
pub struct Timelines {
    /// `None` when there are no singles games.
    pub calendar: Option<DateRange>,
    pub players: Vec<PlayerTimeline>,
}

/// Per-day raw tallies for one player.
#[derive(Debug, Default, Clone, Copy)]
struct DayTally {
    games: u32,
    wins: u32,
    point_diff: i64,
}

/// Trailing mean over `window` entries, skipping missing values.
///
/// A position gets a value when at least one entry in its window is present;
/// positions whose window is entirely missing carry the last computed value
/// forward (and stay `None` before the first one).
pub fn rolling_mean(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    let window = window.max(1);
    let mut out = Vec::with_capacity(values.len());
    let mut last = None;

    for i in 0..values.len() {
        let start = (i + 1).saturating_sub(window);
        let present: Vec<f64> = values[start..=i].iter().flatten().copied().collect();

        if !present.is_empty() {
            last = Some(present.iter().sum::<f64>() / present.len() as f64);
        }
        out.push(last);
    }

    out
}

/// Build one player's series across `calendar`.
///
/// Only singles games count, matching the head-to-head table.
pub fn player_timeline(
    log: &GameLog,
    player: &Player,
    calendar: &[NaiveDate],
    window_days: usize,
) -> PlayerTimeline {
    let mut tallies: HashMap<NaiveDate, DayTally> = HashMap::new();
    let mut active_days: BTreeSet<NaiveDate> = BTreeSet::new();

    for game in log.singles() {
        let Some(side) = game.side_of(player) else {
            continue;
        };
        let tally = tallies.entry(game.date).or_default();
        tally.games += 1;
        if game.winning_side() == Some(side) {
            tally.wins += 1;
        }
        tally.point_diff += game.score.signed_margin(side);
        active_days.insert(game.date);
    }

    let daily: Vec<DayTally> = calendar
        .iter()
        .map(|day| tallies.get(day).copied().unwrap_or_default())
        .collect();
    let counts: Vec<Option<f64>> = daily.iter().map(|t| Some(t.games as f64)).collect();
    let rolling = rolling_mean(&counts, window_days);

    let mut cumulative_games = 0u32;
    let mut cumulative_wins = 0u32;
    let mut cumulative_point_diff = 0i64;
    let mut points = Vec::with_capacity(calendar.len());

    for ((date, tally), rolling_avg_games) in calendar.iter().zip(&daily).zip(rolling) {
        cumulative_games += tally.games;
        cumulative_wins += tally.wins;
        cumulative_point_diff += tally.point_diff;

        let win_percentage = if cumulative_games == 0 {
            0.0
        } else {
            100.0 * cumulative_wins as f64 / cumulative_games as f64
        };

        points.push(DailyPoint {
            date: *date,
            games: tally.games,
            wins: tally.wins,
            point_diff: tally.point_diff,
            cumulative_games,
            cumulative_wins,
            cumulative_point_diff,
            win_percentage,
            rolling_avg_games,
            avg_point_diff: calculate_average(cumulative_point_diff as f64, cumulative_games),
        });
    }

    let total_games: u32 = tallies.values().map(|t| t.games).sum();
    let days_played = active_days.len() as u32;

    PlayerTimeline {
        player: player.clone(),
        total_games,
        days_played,
        avg_games_per_day: calculate_average(total_games as f64, days_played),
        points,
    }
}

/// Series for every roster player over the full span of singles games.
pub fn build_timelines(
    log: &GameLog,
    roster: &Roster,
    window_days: usize,
) -> Result<Timelines, StatsError> {
    for game in log.games() {
        check_game(game, roster)?;
    }

    let calendar = log.singles_date_range();
    let days = calendar.map(|c| c.days()).unwrap_or_default();
    debug!("Timeline calendar spans {} days", days.len());

    let players = roster
        .players()
        .iter()
        .map(|player| player_timeline(log, player, &days, window_days))
        .collect();

    Ok(Timelines { calendar, players })
}
