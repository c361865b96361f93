use serde::{Deserialize, Serialize};
use std::fmt;

use super::player::PlayerKey;
use super::team::TeamSide;
use super::time::WallTime;

/// Points within the current period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Score {
    pub a: u16,
    pub b: u16,
}

impl Score {
    pub const fn new(a: u16, b: u16) -> Self {
        Self { a, b }
    }

    /// Extract the first `<digits>-<digits>` pair of a description such as
    /// `"12-10"` or `"Erä 1: 12-10"`.
    pub fn parse(description: &str) -> Option<Score> {
        let bytes = description.as_bytes();
        for (i, &c) in bytes.iter().enumerate() {
            if c != b'-' {
                continue;
            }
            let left_start = bytes[..i]
                .iter()
                .rposition(|b| !b.is_ascii_digit())
                .map_or(0, |p| p + 1);
            let right_end = bytes[i + 1..]
                .iter()
                .position(|b| !b.is_ascii_digit())
                .map_or(bytes.len(), |p| i + 1 + p);
            if left_start == i || right_end == i + 1 {
                continue;
            }
            let a = description[left_start..i].parse().ok()?;
            let b = description[i + 1..right_end].parse().ok()?;
            return Some(Score { a, b });
        }
        None
    }

    pub fn points(&self, side: TeamSide) -> u16 {
        match side {
            TeamSide::A => self.a,
            TeamSide::B => self.b,
        }
    }

    pub fn with_point(&self, side: TeamSide) -> Score {
        match side {
            TeamSide::A => Score { a: self.a.saturating_add(1), b: self.b },
            TeamSide::B => Score { a: self.a, b: self.b.saturating_add(1) },
        }
    }

    /// Which side gained exactly one point going from `previous` to `self`.
    pub fn advanced_from(&self, previous: Score) -> Option<TeamSide> {
        if *self == previous.with_point(TeamSide::A) {
            Some(TeamSide::A)
        } else if *self == previous.with_point(TeamSide::B) {
            Some(TeamSide::B)
        } else {
            None
        }
    }

    /// Points of `side` minus points of its opponent.
    pub fn differential(&self, side: TeamSide) -> i32 {
        self.points(side) as i32 - self.points(side.opponent()) as i32
    }

    pub fn leader(&self) -> Option<TeamSide> {
        match self.a.cmp(&self.b) {
            std::cmp::Ordering::Greater => Some(TeamSide::A),
            std::cmp::Ordering::Less => Some(TeamSide::B),
            std::cmp::Ordering::Equal => None,
        }
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.a, self.b)
    }
}

/// Typed feed event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchEvent {
    pub id: String,
    pub period: u8,
    pub at: WallTime,
    /// Position in the feed as received.
    pub seq: usize,
    pub kind: EventKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    PeriodStart,
    ServingTeamDeclared {
        team: TeamSide,
    },
    Point {
        scorer: TeamSide,
        /// Score after the point.
        score: Score,
        /// Credited player; `None` when the point came from an opponent error.
        #[serde(skip_serializing_if = "Option::is_none")]
        scorer_player: Option<PlayerKey>,
    },
    Substitution {
        team: TeamSide,
        player_out: PlayerKey,
        player_in: PlayerKey,
    },
    Timeout {
        team: TeamSide,
    },
    PeriodEnd,
    MatchEnd,
}

impl EventKind {
    /// Ordering of events sharing the same instant.
    pub(crate) fn same_instant_rank(&self) -> u8 {
        match self {
            EventKind::PeriodStart => 0,
            EventKind::ServingTeamDeclared { .. } => 1,
            EventKind::Substitution { .. } => 2,
            _ => 3,
        }
    }
}
