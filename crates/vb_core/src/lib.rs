//! # vb_core - Deterministic Volleyball Match Replay Engine
//!
//! Replays the event log of a volleyball match through a rotation state
//! machine and derives analytics from the resulting checkpoints.
//!
//! ## Features
//! - Typed, validated match model built once from the raw feed
//! - Checkpointed rotation replay (same feed = same checkpoints)
//! - Court snapshots at any time or event after the first serve
//! - Rotational performance, serving streaks and box-score statistics
//! - JSON API for the rendering layer

// Doc formatting lints - purely cosmetic, fix incrementally
#![allow(clippy::doc_lazy_continuation)]
// Struct initialization pattern used intentionally
#![allow(clippy::field_reassign_with_default)]
#![allow(clippy::should_implement_trait)]

pub mod analysis;
pub mod api;
pub mod config;
pub mod error;
pub mod feed;
pub mod models;
pub mod rotation;
pub mod snapshot;

// Re-export main API functions
pub use analysis::{GameStats, RotationalPerformance, ServingStreak, ServingStreaks};
pub use api::{analyze_match_json, analyze_match_json_with_config, snapshot_json, MatchReport};
pub use config::{AnalyticsConfig, PeriodCarryOver, SlotAttribution, StreakConfig};
pub use error::{EngineError, Result};
pub use models::{Match, TeamSide, WallTime};
pub use rotation::{replay, Checkpoint, Replay, Transition};
pub use snapshot::{snapshot, CourtSnapshot, SnapshotQuery, Timeline};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const SCHEMA_VERSION: u8 = 1;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::test_fixtures::rally_feed;
    use sha2::{Digest, Sha256};
    use TeamSide::{A, B};

    fn feed_json() -> String {
        let feed = rally_feed(&[
            (A, vec![A, A, B, B, A, B, A, A]),
            (B, vec![B, A, B, B, A, A, A]),
            (A, vec![B, B, A, A, B]),
        ]);
        serde_json::to_string(&feed).unwrap()
    }

    #[test]
    fn test_basic_analysis() {
        let m = Match::from_json(&feed_json()).unwrap();
        let report = MatchReport::build(&m, &AnalyticsConfig::default()).unwrap();

        assert_eq!(report.schema_version, SCHEMA_VERSION);
        assert_eq!(report.game_stats.period_scores.len(), 3);
        assert_eq!(report.game_stats.team(A).points + report.game_stats.team(B).points, 20);
        assert!(!report.serving_streaks.is_empty());
    }

    #[test]
    fn test_report_json_determinism_sha256() {
        fn sha256_hex(bytes: &[u8]) -> String {
            let mut hasher = Sha256::new();
            hasher.update(bytes);
            format!("{:x}", hasher.finalize())
        }

        let json = feed_json();
        let config = AnalyticsConfig::default();
        let r1 = analyze_match_json_with_config(&json, &config).unwrap();
        let r2 = analyze_match_json_with_config(&json, &config).unwrap();

        let h1 = sha256_hex(r1.as_bytes());
        let h2 = sha256_hex(r2.as_bytes());
        assert_eq!(h1, h2, "Same feed should produce identical report JSON sha256");
    }

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
