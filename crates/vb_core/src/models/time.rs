use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Wall-clock time of a feed event, in seconds since midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WallTime(u32);

impl WallTime {
    pub const fn from_seconds(seconds: u32) -> Self {
        Self(seconds)
    }

    pub const fn seconds(&self) -> u32 {
        self.0
    }

    /// Parse an `HH:MM:SS` string. Each part must be one or two digits and
    /// within clock range; anything else is rejected.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() != 3
            || parts
                .iter()
                .any(|p| p.is_empty() || p.len() > 2 || !p.bytes().all(|b| b.is_ascii_digit()))
        {
            return None;
        }
        let time = NaiveTime::parse_from_str(s, "%H:%M:%S").ok()?;
        // chrono represents a leap second as nanosecond >= 1e9
        if time.nanosecond() >= 1_000_000_000 {
            return None;
        }
        Some(Self(time.num_seconds_from_midnight()))
    }

    /// Seconds elapsed since `earlier` (zero if `earlier` is later).
    pub fn since(&self, earlier: WallTime) -> u32 {
        self.0.saturating_sub(earlier.0)
    }
}

impl fmt::Display for WallTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let h = self.0 / 3600;
        let m = (self.0 % 3600) / 60;
        let s = self.0 % 60;
        write!(f, "{:02}:{:02}:{:02}", h, m, s)
    }
}

/// Format a duration as `MM:SS` (minutes are not wrapped at 60).
/// Missing or negative durations render as `--:--`.
pub fn format_mmss(total_seconds: Option<i64>) -> String {
    match total_seconds {
        Some(total) if total >= 0 => format!("{:02}:{:02}", total / 60, total % 60),
        _ => "--:--".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_times() {
        let cases = [
            ("00:00:00", 0),
            ("00:00:30", 30),
            ("00:01:00", 60),
            ("01:00:00", 3600),
            ("01:10:30", 4230),
            ("23:59:59", 86399),
        ];
        for (input, expected) in cases {
            assert_eq!(WallTime::parse(input).map(|t| t.seconds()), Some(expected), "{input}");
        }
    }

    #[test]
    fn test_parse_rejects_malformed_times() {
        for input in [
            "10:30",
            "10:30:AA",
            "AA:30:00",
            "10:AA:00",
            "",
            "12:34:567",
            "12:345:67",
            "123:45:67",
            "24:00:00",
            "00:60:00",
            "00:00:60",
            "-1:00:00",
        ] {
            assert_eq!(WallTime::parse(input), None, "{input:?} should not parse");
        }
    }

    #[test]
    fn test_display_round_trips() {
        for input in ["00:00:00", "09:05:07", "23:59:59"] {
            assert_eq!(WallTime::parse(input).unwrap().to_string(), input);
        }
    }

    #[test]
    fn test_format_mmss() {
        assert_eq!(format_mmss(Some(0)), "00:00");
        assert_eq!(format_mmss(Some(30)), "00:30");
        assert_eq!(format_mmss(Some(59)), "00:59");
        assert_eq!(format_mmss(Some(60)), "01:00");
        assert_eq!(format_mmss(Some(125)), "02:05");
        assert_eq!(format_mmss(Some(3599)), "59:59");
        assert_eq!(format_mmss(Some(3600)), "60:00");
        assert_eq!(format_mmss(Some(3661)), "61:01");
        assert_eq!(format_mmss(Some(-10)), "--:--");
        assert_eq!(format_mmss(None), "--:--");
    }

    #[test]
    fn test_since_saturates() {
        let a = WallTime::from_seconds(100);
        let b = WallTime::from_seconds(160);
        assert_eq!(b.since(a), 60);
        assert_eq!(a.since(b), 0);
    }
}
