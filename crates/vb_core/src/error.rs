use thiserror::Error;

use crate::models::WallTime;

/// Errors raised while loading a feed or replaying it.
///
/// Every variant is terminal for the operation that raised it. Nothing in the
/// engine returns partial statistics alongside an error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Structural violation of the match invariants (missing team, wrong
    /// lineup size, duplicate slots, non-chronological log).
    #[error("malformed feed: {reason}")]
    MalformedFeed { reason: String },

    /// A single event cannot be interpreted.
    #[error("malformed event {event_id} ({field}): {reason}")]
    MalformedEvent {
        event_id: String,
        field: &'static str,
        reason: String,
    },

    /// Snapshot requested before the match's first serve declaration.
    #[error("timestamp {requested} precedes the first serve ({})", first_serve_label(.first_serve))]
    OutOfRangeTimestamp {
        requested: WallTime,
        first_serve: Option<WallTime>,
    },

    #[error("unknown event id: {event_id}")]
    UnknownEvent { event_id: String },

    #[error("invalid json: {0}")]
    InvalidJson(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

fn first_serve_label(first_serve: &Option<WallTime>) -> String {
    match first_serve {
        Some(t) => t.to_string(),
        None => "no serve declared".to_string(),
    }
}

impl EngineError {
    pub(crate) fn feed(reason: impl Into<String>) -> Self {
        EngineError::MalformedFeed { reason: reason.into() }
    }

    pub(crate) fn event(
        event_id: impl Into<String>,
        field: &'static str,
        reason: impl Into<String>,
    ) -> Self {
        EngineError::MalformedEvent {
            event_id: event_id.into(),
            field,
            reason: reason.into(),
        }
    }

    /// Event id the error points at, if any.
    pub fn event_id(&self) -> Option<&str> {
        match self {
            EngineError::MalformedEvent { event_id, .. } | EngineError::UnknownEvent { event_id } => {
                Some(event_id)
            }
            _ => None,
        }
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(e: serde_json::Error) -> Self {
        EngineError::InvalidJson(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_event_message_names_event_and_field() {
        let err = EngineError::event("p7", "description", "cannot parse score 'x-1'");
        assert_eq!(err.to_string(), "malformed event p7 (description): cannot parse score 'x-1'");
        assert_eq!(err.event_id(), Some("p7"));
    }

    #[test]
    fn test_out_of_range_message() {
        let err = EngineError::OutOfRangeTimestamp {
            requested: WallTime::from_seconds(36_000),
            first_serve: Some(WallTime::from_seconds(36_001)),
        };
        assert_eq!(err.to_string(), "timestamp 10:00:00 precedes the first serve (10:00:01)");

        let err = EngineError::OutOfRangeTimestamp {
            requested: WallTime::from_seconds(0),
            first_serve: None,
        };
        assert!(err.to_string().contains("no serve declared"));
    }

    #[test]
    fn test_from_serde_json() {
        let err: EngineError = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
        assert!(matches!(err, EngineError::InvalidJson(_)));
        assert_eq!(err.event_id(), None);
    }
}
