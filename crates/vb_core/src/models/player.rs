use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::team::TeamSide;

/// Player identifier as given by the feed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub String);

impl PlayerId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(s: &str) -> Self {
        PlayerId(s.to_string())
    }
}

/// Index of a player in the match roster arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerKey(pub u16);

impl PlayerKey {
    #[inline]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }
}

/// On-court rotation slot, 1..=6. Slot 1 is the serving position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Slot(u8);

impl Slot {
    pub const SERVER: Slot = Slot(1);

    pub const ALL: [Slot; 6] = [Slot(1), Slot(2), Slot(3), Slot(4), Slot(5), Slot(6)];

    /// Court display order as seen from behind the team: front row 4-3-2,
    /// back row 5-6-1.
    pub const DISPLAY_ROWS: [[Slot; 3]; 2] = [[Slot(4), Slot(3), Slot(2)], [Slot(5), Slot(6), Slot(1)]];

    pub const fn new(n: u8) -> Option<Slot> {
        if n >= 1 && n <= 6 {
            Some(Slot(n))
        } else {
            None
        }
    }

    #[inline]
    pub const fn get(&self) -> u8 {
        self.0
    }

    /// Zero-based array index.
    #[inline]
    pub const fn index(&self) -> usize {
        (self.0 - 1) as usize
    }

    pub fn is_front_row(&self) -> bool {
        matches!(self.0, 2..=4)
    }
}

impl TryFrom<u8> for Slot {
    type Error = String;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        Slot::new(n).ok_or_else(|| format!("slot must be 1-6, got {}", n))
    }
}

impl From<Slot> for u8 {
    fn from(slot: Slot) -> u8 {
        slot.0
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Roster entry. Immutable once the match is loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub key: PlayerKey,
    pub id: PlayerId,
    pub side: TeamSide,
    pub name: String,
    /// Shirt number as printed; may be non-numeric.
    pub shirt: String,
    pub captain: bool,
    /// Period → designated starting slot.
    pub designated: BTreeMap<u8, Slot>,
}

impl Player {
    /// Starting slot of the match (period 1), `None` for bench players.
    pub fn starting_slot(&self) -> Option<Slot> {
        self.designated.get(&1).copied()
    }
}
