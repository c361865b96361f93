//! Analytics derived from a replay. Every component reads checkpoints and
//! never touches rotation state itself.

pub mod game_stats;
pub mod rotational;
pub mod streaks;


pub use game_stats::{GameStats, PeriodScore, PlayerGameStats, TeamStats};
pub use rotational::{PlayerRotationStat, RotationRow, RotationalPerformance};
pub use streaks::{ServingStreak, ServingStreaks};
