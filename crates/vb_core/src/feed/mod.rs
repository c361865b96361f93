//! # Raw Match Feed
//!
//! Serde mirror of the upstream match feed exactly as it arrives: ids that may
//! be strings or numbers, string-keyed position maps, "A-B" score
//! descriptions and "HH:MM:SS" wall times. Nothing here interprets the data;
//! [`crate::models::Match::load`] is the only consumer.

pub mod io;
pub mod raw;

pub use io::{load_feed_json, save_feed_json};
pub use raw::{feed_json_schema, EventCode, FlexString, RawEvent, RawLineupEntry, RawMatch};
