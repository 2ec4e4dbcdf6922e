//! Players, canonical pairs and the roster of known players.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

/// A player, identified only by display name.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Player(String);

impl Player {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Player({})", self.0)
    }
}

impl From<&str> for Player {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// An unordered pair of players, stored with the names sorted.
///
/// `PairKey::new(a, b) == PairKey::new(b, a)` always holds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PairKey {
    first: Player,
    second: Player,
}

impl PairKey {
    pub fn new(a: &Player, b: &Player) -> Self {
        if a <= b {
            Self {
                first: a.clone(),
                second: b.clone(),
            }
        } else {
            Self {
                first: b.clone(),
                second: a.clone(),
            }
        }
    }

    pub fn first(&self) -> &Player {
        &self.first
    }

    pub fn second(&self) -> &Player {
        &self.second
    }
}

/// The ordered set of known players.
///
/// Order is significant: it is the row/column order of the pairwise table and
/// the tie-break order of leaderboards.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    players: Vec<Player>,
    index: HashMap<Player, usize>,
}

impl Roster {
    /// Build a roster preserving the given order. Repeated names are kept once.
    pub fn new<I>(players: I) -> Self
    where
        I: IntoIterator<Item = Player>,
    {
        let mut roster = Self::default();
        for player in players {
            if !roster.index.contains_key(&player) {
                roster.index.insert(player.clone(), roster.players.len());
                roster.players.push(player);
            }
        }
        roster
    }

    /// Build a roster from arbitrary names, sorted alphabetically.
    pub fn sorted<I>(players: I) -> Self
    where
        I: IntoIterator<Item = Player>,
    {
        let unique: BTreeSet<Player> = players.into_iter().collect();
        Self::new(unique)
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn contains(&self, player: &Player) -> bool {
        self.index.contains_key(player)
    }

    /// Position of a player in roster order.
    pub fn position(&self, player: &Player) -> Option<usize> {
        self.index.get(player).copied()
    }

    pub fn get(&self, name: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.name() == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_key_is_order_independent() {
        let a = Player::from("Alice");
        let b = Player::from("Bob");

        assert_eq!(PairKey::new(&a, &b), PairKey::new(&b, &a));
        assert_eq!(PairKey::new(&b, &a).first(), &a);
        assert_eq!(PairKey::new(&b, &a).second(), &b);
    }

    #[test]
    fn test_roster_preserves_order_and_dedups() {
        let roster = Roster::new(vec![
            Player::from("Zed"),
            Player::from("Amy"),
            Player::from("Zed"),
        ]);

        assert_eq!(roster.len(), 2);
        assert_eq!(roster.position(&Player::from("Zed")), Some(0));
        assert_eq!(roster.position(&Player::from("Amy")), Some(1));
        assert!(!roster.contains(&Player::from("Bob")));
    }

    #[test]
    fn test_roster_sorted() {
        let roster = Roster::sorted(vec![
            Player::from("Sean Grate"),
            Player::from("Emma Snyder"),
            Player::from("John Cobb"),
        ]);

        let names: Vec<&str> = roster.players().iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["Emma Snyder", "John Cobb", "Sean Grate"]);
        assert_eq!(roster.get("John Cobb"), Some(&Player::from("John Cobb")));
    }

    #[test]
    fn test_player_serializes_as_plain_string() {
        let json = serde_json::to_string(&Player::from("Tim Eller")).unwrap();
        assert_eq!(json, "\"Tim Eller\"");
    }
}
