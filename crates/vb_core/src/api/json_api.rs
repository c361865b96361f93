//! JSON entry points for the rendering layer.

use serde::Serialize;

use crate::analysis::{GameStats, RotationalPerformance, ServingStreaks};
use crate::config::AnalyticsConfig;
use crate::error::Result;
use crate::models::{Match, Team};
use crate::rotation;
use crate::snapshot::{SnapshotQuery, Timeline};
use crate::SCHEMA_VERSION;

/// Everything the match page renders, computed from one replay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchReport {
    pub schema_version: u8,
    pub match_id: Option<String>,
    pub date: Option<String>,
    pub teams: [Team; 2],
    pub config: AnalyticsConfig,
    pub rotational: RotationalPerformance,
    pub serving_streaks: ServingStreaks,
    pub game_stats: GameStats,
    /// SHA-256 (hex) of the serialized checkpoint sequence.
    pub replay_fingerprint: String,
}

impl MatchReport {
    pub fn build(m: &Match, config: &AnalyticsConfig) -> Result<Self> {
        config.validate()?;
        let replay = rotation::replay(m, config.carry_over)?;

        Ok(Self {
            schema_version: SCHEMA_VERSION,
            match_id: m.match_id().map(str::to_string),
            date: m.date().map(str::to_string),
            teams: m.teams().clone(),
            config: *config,
            rotational: RotationalPerformance::compute(m, &replay, config.attribution),
            serving_streaks: ServingStreaks::compute(m, &replay, &config.streaks),
            game_stats: GameStats::compute(m, &replay),
            replay_fingerprint: replay.fingerprint()?,
        })
    }
}

/// Analyze a feed document with the configuration from
/// `VB_ANALYTICS_CONFIG_PATH` (defaults when unset).
pub fn analyze_match_json(feed_json: &str) -> Result<String> {
    let config = AnalyticsConfig::from_env()?;
    analyze_match_json_with_config(feed_json, &config)
}

pub fn analyze_match_json_with_config(feed_json: &str, config: &AnalyticsConfig) -> Result<String> {
    let m = Match::from_json(feed_json)?;
    let report = MatchReport::build(&m, config)?;
    log::info!(
        "Analyzed match {}: {} streaks, fingerprint {}",
        report.match_id.as_deref().unwrap_or("-"),
        report.serving_streaks.len(),
        report.replay_fingerprint
    );
    Ok(serde_json::to_string(&report)?)
}

/// Court snapshot for one query, as JSON.
pub fn snapshot_json(feed_json: &str, query: &SnapshotQuery) -> Result<String> {
    let config = AnalyticsConfig::from_env()?;
    let m = Match::from_json(feed_json)?;
    let snapshot = Timeline::new(&m, config.carry_over)?.snapshot(query)?;
    Ok(serde_json::to_string(&snapshot)?)
}
