use std::collections::BTreeMap;
use std::fmt;

use schemars::JsonSchema;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::Result;

/// Identifier or number that the feed sends either as a JSON string or as a
/// JSON number. Always kept as its string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, JsonSchema)]
#[serde(transparent)]
pub struct FlexString(pub String);

impl FlexString {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Trimmed value, `None` when blank.
    pub fn non_empty(&self) -> Option<&str> {
        let trimmed = self.0.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed)
        }
    }
}

impl fmt::Display for FlexString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FlexString {
    fn from(s: &str) -> Self {
        FlexString(s.to_string())
    }
}

struct FlexStringVisitor;

impl<'de> Visitor<'de> for FlexStringVisitor {
    type Value = FlexString;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string or a number")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<FlexString, E> {
        Ok(FlexString(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> std::result::Result<FlexString, E> {
        Ok(FlexString(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<FlexString, E> {
        Ok(FlexString(v.to_string()))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<FlexString, E> {
        Ok(FlexString(v.to_string()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<FlexString, E> {
        if v.fract() == 0.0 && v.is_finite() {
            Ok(FlexString(format!("{}", v as i64)))
        } else {
            Ok(FlexString(v.to_string()))
        }
    }
}

impl<'de> Deserialize<'de> for FlexString {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(FlexStringVisitor)
    }
}

/// Top-level match object (`match` field of the getMatch response).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RawMatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_id: Option<FlexString>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(rename = "team_A_id", default)]
    pub team_a_id: Option<FlexString>,
    #[serde(rename = "team_A_name", default)]
    pub team_a_name: Option<String>,
    #[serde(rename = "team_B_id", default)]
    pub team_b_id: Option<FlexString>,
    #[serde(rename = "team_B_name", default)]
    pub team_b_name: Option<String>,
    #[serde(default)]
    pub lineups: Vec<RawLineupEntry>,
    #[serde(default)]
    pub events: Vec<RawEvent>,
    /// Dedicated substitution log. When empty, `vaihto` entries of `events`
    /// are used instead.
    #[serde(default)]
    pub substitution_events: Vec<RawEvent>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RawLineupEntry {
    #[serde(default)]
    pub player_id: Option<FlexString>,
    #[serde(default)]
    pub team_id: Option<FlexString>,
    #[serde(default)]
    pub player_name: Option<String>,
    #[serde(default)]
    pub shirt_number: Option<FlexString>,
    /// Period number → starting slot. Key "1" is the match-start lineup.
    #[serde(default)]
    pub playing_position: BTreeMap<String, Option<FlexString>>,
    /// "C" marks the captain.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub captain: Option<FlexString>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RawEvent {
    #[serde(default)]
    pub event_id: Option<FlexString>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub period: Option<FlexString>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_id: Option<FlexString>,
    /// "A-B" score for points.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Scorer on points, incoming player on substitutions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_id: Option<FlexString>,
    /// Outgoing player on substitutions.
    #[serde(default, alias = "player_out_id", skip_serializing_if = "Option::is_none")]
    pub player_2_id: Option<FlexString>,
    #[serde(default)]
    pub wall_time: Option<String>,
}

impl RawMatch {
    /// Parse a feed document. Accepts either the bare match object or the
    /// `{"match": {...}}` envelope returned by the upstream service.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let inner = match value {
            serde_json::Value::Object(mut map) => match map.remove("match") {
                Some(inner @ serde_json::Value::Object(_)) => inner,
                Some(other) => {
                    map.insert("match".to_string(), other);
                    serde_json::Value::Object(map)
                }
                None => serde_json::Value::Object(map),
            },
            other => other,
        };
        Ok(serde_json::from_value(inner)?)
    }
}

/// Event codes of the feed vocabulary that the engine interprets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(test, derive(strum_macros::EnumIter))]
#[serde(rename_all = "snake_case")]
pub enum EventCode {
    PeriodStart,
    ServingTeam,
    Point,
    Substitution,
    Timeout,
    PeriodEnd,
    MatchEnd,
}

impl EventCode {
    pub fn from_feed(code: &str) -> Option<Self> {
        match code.trim() {
            "aloitajakso" => Some(EventCode::PeriodStart),
            "aloittavajoukkue" => Some(EventCode::ServingTeam),
            "piste" => Some(EventCode::Point),
            "vaihto" => Some(EventCode::Substitution),
            "aikalisa" => Some(EventCode::Timeout),
            "maali" => Some(EventCode::PeriodEnd),
            "lopetaottelu" => Some(EventCode::MatchEnd),
            _ => None,
        }
    }

    pub fn feed_code(&self) -> &'static str {
        match self {
            EventCode::PeriodStart => "aloitajakso",
            EventCode::ServingTeam => "aloittavajoukkue",
            EventCode::Point => "piste",
            EventCode::Substitution => "vaihto",
            EventCode::Timeout => "aikalisa",
            EventCode::PeriodEnd => "maali",
            EventCode::MatchEnd => "lopetaottelu",
        }
    }
}

/// JSON schema of the accepted feed document.
pub fn feed_json_schema() -> schemars::schema::RootSchema {
    schemars::schema_for!(RawMatch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use strum::IntoEnumIterator;

    #[test]
    fn test_flex_string_accepts_numbers_and_strings() {
        let entry: RawLineupEntry = serde_json::from_value(json!({
            "player_id": 12345,
            "team_id": "T1",
            "player_name": "Alice",
            "shirt_number": 7,
            "playing_position": { "1": 3, "2": "4", "3": null }
        }))
        .unwrap();

        assert_eq!(entry.player_id, Some(FlexString::from("12345")));
        assert_eq!(entry.shirt_number, Some(FlexString::from("7")));
        assert_eq!(entry.playing_position["1"], Some(FlexString::from("3")));
        assert_eq!(entry.playing_position["2"], Some(FlexString::from("4")));
        assert_eq!(entry.playing_position["3"], None);
    }

    #[test]
    fn test_whole_float_is_stringified_as_integer() {
        let v: FlexString = serde_json::from_value(json!(3.0)).unwrap();
        assert_eq!(v.as_str(), "3");
    }

    #[test]
    fn test_envelope_and_bare_documents_parse_the_same() {
        let bare = json!({
            "team_A_id": "A", "team_A_name": "Alpha",
            "team_B_id": "B", "team_B_name": "Bravo",
            "lineups": [], "events": []
        });
        let wrapped = json!({ "match": bare.clone() });

        let a = RawMatch::from_json(&bare.to_string()).unwrap();
        let b = RawMatch::from_json(&wrapped.to_string()).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.team_a_id, Some(FlexString::from("A")));
        assert!(a.substitution_events.is_empty());
    }

    #[test]
    fn test_player_out_alias() {
        let ev: RawEvent = serde_json::from_value(json!({
            "event_id": "s1", "code": "vaihto", "period": "1",
            "player_id": "A7", "player_out_id": "A2", "wall_time": "10:00:00"
        }))
        .unwrap();
        assert_eq!(ev.player_2_id, Some(FlexString::from("A2")));
    }

    #[test]
    fn test_event_code_vocabulary_round_trips() {
        for code in EventCode::iter() {
            assert_eq!(EventCode::from_feed(code.feed_code()), Some(code));
        }
        assert_eq!(EventCode::from_feed("hyokkays"), None);
    }

    #[test]
    fn test_blank_flex_string_is_empty() {
        assert_eq!(FlexString::from("  ").non_empty(), None);
        assert_eq!(FlexString::from(" A1 ").non_empty(), Some("A1"));
    }

    #[test]
    fn test_schema_names_feed_fields() {
        let schema = serde_json::to_value(feed_json_schema()).unwrap();
        let props = &schema["properties"];
        assert!(props.get("team_A_id").is_some());
        assert!(props.get("substitution_events").is_some());
    }
}
