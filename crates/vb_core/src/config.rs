//! Analytics configuration: policies left open by the feed format.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::{env, fs};

use crate::error::{EngineError, Result};

/// Environment variable naming a JSON file with an [`AnalyticsConfig`].
pub const CONFIG_PATH_ENV: &str = "VB_ANALYTICS_CONFIG_PATH";

/// How formations are set up when a new period starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodCarryOver {
    /// Use the period's designated lineup when the feed has one, otherwise
    /// keep the last formation of the previous period.
    #[default]
    ResetToDesignated,
    /// Always keep the last formation of the previous period.
    CarryForward,
}

/// Which on-court players a point is credited to in the rotational table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotAttribution {
    /// Slot-1 player of both teams: the server and the receiving team's
    /// rotation leader.
    #[default]
    RotationLeaders,
    /// Only the serving team's slot-1 player.
    ServerOnly,
    /// All twelve on-court players, each at their current slot.
    AllSlots,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StreakConfig {
    /// Shortest streak that is reported (default: 1)
    #[serde(default = "default_min_length")]
    pub min_length: u16,

    /// Count the side-out point as the first point of the new server's
    /// streak (default: false)
    #[serde(default)]
    pub count_side_out_point: bool,
}

fn default_min_length() -> u16 {
    1
}

impl Default for StreakConfig {
    fn default() -> Self {
        Self {
            min_length: default_min_length(),
            count_side_out_point: false,
        }
    }
}

impl StreakConfig {
    /// Streak rules of the legacy scoresheet: the side-out point opens the
    /// streak and single points are not listed.
    pub fn legacy() -> Self {
        Self {
            min_length: 2,
            count_side_out_point: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    #[serde(default)]
    pub carry_over: PeriodCarryOver,
    #[serde(default)]
    pub attribution: SlotAttribution,
    #[serde(default)]
    pub streaks: StreakConfig,
}

impl AnalyticsConfig {
    /// Matches the legacy scoresheet output.
    pub fn legacy() -> Self {
        Self {
            streaks: StreakConfig::legacy(),
            ..Self::default()
        }
    }

    /// Credits only the designated server and never resets formations
    /// between periods.
    pub fn strict() -> Self {
        Self {
            carry_over: PeriodCarryOver::CarryForward,
            attribution: SlotAttribution::ServerOnly,
            streaks: StreakConfig::default(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: AnalyticsConfig =
            serde_json::from_str(json).map_err(|e| EngineError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            EngineError::InvalidConfig(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json(&content)
    }

    pub fn validate(&self) -> Result<()> {
        if self.streaks.min_length == 0 {
            return Err(EngineError::InvalidConfig(
                "streaks.min_length must be at least 1, got 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Configuration from the file named by `VB_ANALYTICS_CONFIG_PATH`, or the
    /// default when the variable is unset or blank.
    pub fn from_env() -> Result<Self> {
        Self::from_path_setting(env::var(CONFIG_PATH_ENV).ok().as_deref())
    }

    fn from_path_setting(setting: Option<&str>) -> Result<Self> {
        let Some(path) = setting.map(str::trim).filter(|p| !p.is_empty()) else {
            return Ok(Self::default());
        };
        let config = Self::load(path).map_err(|e| {
            EngineError::InvalidConfig(format!("{CONFIG_PATH_ENV}='{path}': {e}"))
        })?;
        log::info!("Loaded analytics config from {}={}", CONFIG_PATH_ENV, path);
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AnalyticsConfig::default();
        assert_eq!(config.carry_over, PeriodCarryOver::ResetToDesignated);
        assert_eq!(config.attribution, SlotAttribution::RotationLeaders);
        assert_eq!(config.streaks.min_length, 1);
        assert!(!config.streaks.count_side_out_point);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_presets_validate() {
        let legacy = AnalyticsConfig::legacy();
        assert_eq!(legacy.streaks.min_length, 2);
        assert!(legacy.streaks.count_side_out_point);
        assert!(legacy.validate().is_ok());

        let strict = AnalyticsConfig::strict();
        assert_eq!(strict.attribution, SlotAttribution::ServerOnly);
        assert!(strict.validate().is_ok());
    }

    #[test]
    fn test_json_parsing_fills_defaults() {
        let config = AnalyticsConfig::from_json(
            r#"{ "carry_over": "carry_forward", "streaks": { "min_length": 3 } }"#,
        )
        .unwrap();
        assert_eq!(config.carry_over, PeriodCarryOver::CarryForward);
        assert_eq!(config.attribution, SlotAttribution::RotationLeaders);
        assert_eq!(config.streaks.min_length, 3);
        assert!(!config.streaks.count_side_out_point);

        assert_eq!(AnalyticsConfig::from_json("{}").unwrap(), AnalyticsConfig::default());
    }

    #[test]
    fn test_validation_bounds() {
        let err = AnalyticsConfig::from_json(r#"{ "streaks": { "min_length": 0 } }"#).unwrap_err();
        assert!(matches!(err, EngineError::InvalidConfig(_)));

        let err = AnalyticsConfig::from_json(r#"{ "attribution": "everyone" }"#).unwrap_err();
        assert!(matches!(err, EngineError::InvalidConfig(_)));
    }

    #[test]
    fn test_path_setting() {
        assert_eq!(AnalyticsConfig::from_path_setting(None).unwrap(), AnalyticsConfig::default());
        assert_eq!(AnalyticsConfig::from_path_setting(Some("  ")).unwrap(), AnalyticsConfig::default());

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "attribution": "all_slots" }}"#).unwrap();
        let path = file.path().to_str().unwrap().to_string();
        let config = AnalyticsConfig::from_path_setting(Some(&path)).unwrap();
        assert_eq!(config.attribution, SlotAttribution::AllSlots);

        let err = AnalyticsConfig::from_path_setting(Some("/nonexistent/vb.json")).unwrap_err();
        assert!(err.to_string().contains(CONFIG_PATH_ENV));
    }
}
