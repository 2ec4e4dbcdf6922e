//! Game records: scores, participants and the ordered game log.

use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{GameId, Player};

/// Problems that make a single game unusable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("score {0} is tied, a finished game must have a winner")]
    TiedScore(Score),

    #[error("player {0} appears more than once in the same game")]
    RepeatedPlayer(Player),
}

/// Which side of a game a participant played on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    First,
    Second,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Side::First => Side::Second,
            Side::Second => Side::First,
        }
    }
}

/// Final score. `first` belongs to the first player or team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub first: u32,
    pub second: u32,
}

impl Score {
    pub fn new(first: u32, second: u32) -> Self {
        Self { first, second }
    }

    /// The side with the strictly greater score, `None` on a tie.
    pub fn winning_side(&self) -> Option<Side> {
        match self.first.cmp(&self.second) {
            std::cmp::Ordering::Greater => Some(Side::First),
            std::cmp::Ordering::Less => Some(Side::Second),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn point_differential(&self) -> u32 {
        self.first.abs_diff(self.second)
    }

    pub fn for_side(&self, side: Side) -> u32 {
        match side {
            Side::First => self.first,
            Side::Second => self.second,
        }
    }

    /// Points scored minus points conceded, seen from `side`.
    pub fn signed_margin(&self, side: Side) -> i64 {
        self.for_side(side) as i64 - self.for_side(side.opposite()) as i64
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.first, self.second)
    }
}

/// A doubles team. Member order carries no meaning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team(pub [Player; 2]);

impl Team {
    pub fn new(a: Player, b: Player) -> Self {
        Self([a, b])
    }

    pub fn contains(&self, player: &Player) -> bool {
        self.0.contains(player)
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} & {}", self.0[0], self.0[1])
    }
}

/// Who played, tagged by match kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Participants {
    Singles { first: Player, second: Player },
    Doubles { first: Team, second: Team },
}

/// A single completed game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub id: GameId,
    pub date: NaiveDate,
    pub score: Score,
    #[serde(flatten)]
    pub participants: Participants,
}

impl Game {
    /// Create a game. `seq` is the game's position in its source (e.g. CSV line)
    /// and keeps ids unique for otherwise identical rows.
    pub fn new(seq: usize, participants: Participants, score: Score, date: NaiveDate) -> Self {
        let names: Vec<&str> = match &participants {
            Participants::Singles { first, second } => vec!["singles", first.name(), second.name()],
            Participants::Doubles { first, second } => vec![
                "doubles",
                first.0[0].name(),
                first.0[1].name(),
                second.0[0].name(),
                second.0[1].name(),
            ],
        };
        let seq = seq.to_string();
        let score_str = score.to_string();
        let date_str = date.to_string();

        let mut fields = vec![seq.as_str()];
        fields.extend(names);
        fields.push(&score_str);
        fields.push(&date_str);
        let id = GameId::generate(&fields);

        Self {
            id,
            date,
            score,
            participants,
        }
    }

    pub fn singles(seq: usize, first: Player, second: Player, score: Score, date: NaiveDate) -> Self {
        Self::new(seq, Participants::Singles { first, second }, score, date)
    }

    pub fn doubles(seq: usize, first: Team, second: Team, score: Score, date: NaiveDate) -> Self {
        Self::new(seq, Participants::Doubles { first, second }, score, date)
    }

    pub fn is_singles(&self) -> bool {
        matches!(self.participants, Participants::Singles { .. })
    }

    /// Both players of a singles game, first side first.
    pub fn singles_players(&self) -> Option<(&Player, &Player)> {
        match &self.participants {
            Participants::Singles { first, second } => Some((first, second)),
            Participants::Doubles { .. } => None,
        }
    }

    /// Every participant, first side first.
    pub fn players(&self) -> Vec<&Player> {
        match &self.participants {
            Participants::Singles { first, second } => vec![first, second],
            Participants::Doubles { first, second } => first.0.iter().chain(second.0.iter()).collect(),
        }
    }

    /// The side `player` played on, if they played.
    pub fn side_of(&self, player: &Player) -> Option<Side> {
        match &self.participants {
            Participants::Singles { first, second } => {
                if first == player {
                    Some(Side::First)
                } else if second == player {
                    Some(Side::Second)
                } else {
                    None
                }
            }
            Participants::Doubles { first, second } => {
                if first.contains(player) {
                    Some(Side::First)
                } else if second.contains(player) {
                    Some(Side::Second)
                } else {
                    None
                }
            }
        }
    }

    pub fn winning_side(&self) -> Option<Side> {
        self.score.winning_side()
    }

    /// Check the game has a winner and no player appears twice.
    pub fn validate(&self) -> Result<(), GameError> {
        let players = self.players();
        for (i, player) in players.iter().enumerate() {
            if players[..i].contains(player) {
                return Err(GameError::RepeatedPlayer((*player).clone()));
            }
        }

        if self.winning_side().is_none() {
            return Err(GameError::TiedScore(self.score));
        }

        Ok(())
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.participants {
            Participants::Singles { first, second } => {
                write!(f, "{} vs {} ({}) on {}", first, second, self.score, self.date)
            }
            Participants::Doubles { first, second } => {
                write!(f, "{} vs {} ({}) on {}", first, second, self.score, self.date)
            }
        }
    }
}

/// Inclusive calendar range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    /// Every day from `from` to `to`, inclusive.
    pub fn days(&self) -> Vec<NaiveDate> {
        self.from.iter_days().take_while(|d| *d <= self.to).collect()
    }
}

/// Games in source order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameLog {
    games: Vec<Game>,
}

impl GameLog {
    pub fn new(games: Vec<Game>) -> Self {
        Self { games }
    }

    pub fn games(&self) -> &[Game] {
        &self.games
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    pub fn singles(&self) -> impl Iterator<Item = &Game> {
        self.games.iter().filter(|g| g.is_singles())
    }

    pub fn doubles(&self) -> impl Iterator<Item = &Game> {
        self.games.iter().filter(|g| !g.is_singles())
    }

    /// Date span of the singles games, which are the ones the statistics cover.
    pub fn singles_date_range(&self) -> Option<DateRange> {
        let from = self.singles().map(|g| g.date).min()?;
        let to = self.singles().map(|g| g.date).max()?;
        Some(DateRange { from, to })
    }

    /// Every name appearing in any game.
    pub fn players(&self) -> BTreeSet<Player> {
        self.games
            .iter()
            .flat_map(|g| g.players().into_iter().cloned())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_score_winner_and_differential() {
        let score = Score::new(15, 21);
        assert_eq!(score.winning_side(), Some(Side::Second));
        assert_eq!(score.point_differential(), 6);
        assert_eq!(score.signed_margin(Side::First), -6);
        assert_eq!(score.signed_margin(Side::Second), 6);
        assert_eq!(Score::new(21, 21).winning_side(), None);
    }

    #[test]
    fn test_side_of() {
        let game = Game::doubles(
            1,
            Team::new("A".into(), "B".into()),
            Team::new("C".into(), "D".into()),
            Score::new(21, 18),
            date("2024-08-19"),
        );

        assert_eq!(game.side_of(&"B".into()), Some(Side::First));
        assert_eq!(game.side_of(&"C".into()), Some(Side::Second));
        assert_eq!(game.side_of(&"E".into()), None);
        assert!(game.singles_players().is_none());
        assert_eq!(game.to_string(), "A & B vs C & D (21-18) on 2024-08-19");
    }

    #[test]
    fn test_validate_rejects_tie_and_repeats() {
        let tied = Game::singles(1, "A".into(), "B".into(), Score::new(20, 20), date("2024-08-20"));
        assert_eq!(tied.validate(), Err(GameError::TiedScore(Score::new(20, 20))));

        let repeated = Game::doubles(
            2,
            Team::new("A".into(), "B".into()),
            Team::new("A".into(), "D".into()),
            Score::new(21, 3),
            date("2024-08-20"),
        );
        assert_eq!(
            repeated.validate(),
            Err(GameError::RepeatedPlayer(Player::from("A")))
        );
    }

    #[test]
    fn test_ids_differ_by_sequence() {
        let d = date("2024-08-20");
        let a = Game::singles(1, "A".into(), "B".into(), Score::new(21, 3), d);
        let b = Game::singles(2, "A".into(), "B".into(), Score::new(21, 3), d);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_game_log_date_range_uses_singles() {
        let log = GameLog::new(vec![
            Game::doubles(
                1,
                Team::new("A".into(), "B".into()),
                Team::new("C".into(), "D".into()),
                Score::new(21, 2),
                date("2024-07-01"),
            ),
            Game::singles(2, "A".into(), "B".into(), Score::new(21, 3), date("2024-08-22")),
            Game::singles(3, "C".into(), "B".into(), Score::new(5, 21), date("2024-08-20")),
        ]);

        let range = log.singles_date_range().unwrap();
        assert_eq!(range.from, date("2024-08-20"));
        assert_eq!(range.to, date("2024-08-22"));
        assert_eq!(range.days().len(), 3);
        assert_eq!(log.players().len(), 4);
        assert_eq!(log.singles().count(), 2);
        assert_eq!(log.doubles().count(), 1);
    }

    #[test]
    fn test_game_serializes_with_kind_tag() {
        let game = Game::singles(1, "A".into(), "B".into(), Score::new(21, 3), date("2024-08-20"));
        let json = serde_json::to_value(&game).unwrap();

        assert_eq!(json["kind"], "singles");
        assert_eq!(json["first"], "A");
        assert_eq!(json["score"]["first"], 21);

        let back: Game = serde_json::from_value(json).unwrap();
        assert_eq!(back, game);
    }
}
