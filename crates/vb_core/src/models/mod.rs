//! Typed match model: teams, players, formations and the ordered event log.

pub mod events;
pub mod lineup;
pub mod match_data;
pub mod player;
pub mod team;
pub mod time;

#[cfg(test)]
pub(crate) mod test_fixtures;

pub use events::{EventKind, MatchEvent, Score};
pub use lineup::Formation;
pub use match_data::Match;
pub use player::{Player, PlayerId, PlayerKey, Slot};
pub use team::{Team, TeamSide};
pub use time::{format_mmss, WallTime};
