//! Dense player×player head-to-head table built from singles games.

use tracing::debug;

use crate::models::{GameLog, HeadToHead, MatrixCell, Participants, Player, Roster, Side};

use super::{check_game, roster_position, StatsError};

/// Every ordered (player, opponent) combination of a roster, zero-filled.
///
/// Rows are stored row-major in roster order, so `rows_for(p)` is a contiguous
/// slice and cell `(p, q)` sits at `pos(p) * n + pos(q)`.
#[derive(Debug, Clone)]
pub struct PairwiseTable {
    roster: Roster,
    rows: Vec<HeadToHead>,
}

impl PairwiseTable {
    /// A table with every cell at zero.
    pub fn empty(roster: &Roster) -> Self {
        let mut rows = Vec::with_capacity(roster.len() * roster.len());
        for player in roster.players() {
            for opponent in roster.players() {
                rows.push(HeadToHead::new(player.clone(), opponent.clone()));
            }
        }

        Self {
            roster: roster.clone(),
            rows,
        }
    }

    pub fn players(&self) -> &[Player] {
        self.roster.players()
    }

    pub fn rows(&self) -> &[HeadToHead] {
        &self.rows
    }

    /// The row of `player` against `opponent`.
    pub fn get(&self, player: &Player, opponent: &Player) -> Option<&HeadToHead> {
        let i = self.roster.position(player)?;
        let j = self.roster.position(opponent)?;
        self.rows.get(i * self.roster.len() + j)
    }

    /// All rows where `player` is the acting player, in roster order.
    pub fn rows_for(&self, player: &Player) -> &[HeadToHead] {
        let n = self.roster.len();
        match self.roster.position(player) {
            Some(i) => &self.rows[i * n..(i + 1) * n],
            None => &[],
        }
    }

    /// Serializable cells, row-major.
    pub fn cells(&self) -> Vec<MatrixCell> {
        self.rows.iter().map(MatrixCell::from).collect()
    }

    /// Number of games folded into the table.
    pub fn games_counted(&self) -> u32 {
        self.rows.iter().map(|r| r.wins).sum()
    }

    fn cell_mut(&mut self, player: usize, opponent: usize) -> &mut HeadToHead {
        let n = self.roster.len();
        &mut self.rows[player * n + opponent]
    }
}

/// Fold every singles game of `log` into a fresh table over `roster`.
///
/// Doubles games are checked but not folded. Fails on any game with a player
/// outside the roster or without a winner.
pub fn aggregate_pairwise(log: &GameLog, roster: &Roster) -> Result<PairwiseTable, StatsError> {
    let mut table = PairwiseTable::empty(roster);

    for game in log.games() {
        let winning_side = check_game(game, roster)?;
        let (first, second) = match &game.participants {
            Participants::Singles { first, second } => (first, second),
            Participants::Doubles { .. } => continue,
        };

        let p1 = roster_position(roster, game, first)?;
        let p2 = roster_position(roster, game, second)?;
        let (winner, loser) = match winning_side {
            Side::First => (p1, p2),
            Side::Second => (p2, p1),
        };

        table.cell_mut(winner, loser).wins += 1;
        table.cell_mut(loser, winner).losses += 1;

        let row = table.cell_mut(p1, p2);
        row.points_for += u64::from(game.score.first);
        row.points_against += u64::from(game.score.second);

        let row = table.cell_mut(p2, p1);
        row.points_for += u64::from(game.score.second);
        row.points_against += u64::from(game.score.first);

        let margin = game.score.point_differential() as i64;
        table.cell_mut(winner, loser).raw_point_diff += margin;
        table.cell_mut(loser, winner).raw_point_diff -= margin;

        debug!("Counted {}", game);
    }

    Ok(table)
}
