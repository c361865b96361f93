pub mod json_api;

pub use json_api::{analyze_match_json, analyze_match_json_with_config, snapshot_json, MatchReport};
