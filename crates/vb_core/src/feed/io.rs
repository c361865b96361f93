use super::raw::RawMatch;
use anyhow::Context;
use std::fs;
use std::path::Path;

/// Save a feed document as pretty JSON.
pub fn save_feed_json<P: AsRef<Path>>(feed: &RawMatch, path: P) -> anyhow::Result<()> {
    let path = path.as_ref();
    let data = serde_json::to_string_pretty(feed)?;
    fs::write(path, data).with_context(|| format!("writing feed to {}", path.display()))?;
    Ok(())
}

/// Load a feed document (bare or `{"match": ...}` envelope) from disk.
pub fn load_feed_json<P: AsRef<Path>>(path: P) -> anyhow::Result<RawMatch> {
    let path = path.as_ref();
    let data =
        fs::read_to_string(path).with_context(|| format!("reading feed from {}", path.display()))?;
    let feed = RawMatch::from_json(&data)
        .with_context(|| format!("parsing feed from {}", path.display()))?;
    log::debug!("Loaded feed with {} events from {:?}", feed.events.len(), path);
    Ok(feed)
}
