//! Output formatting for quotes and chart summaries.
//!
//! Supports compact and pretty-printed JSON.

use anyhow::Result;
use serde::Serialize;
use tracing::debug;

/// Serializes `value` as JSON, pretty-printed when `pretty` is set.
pub fn render_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    debug!(bytes = json.len(), "Rendered JSON output");
    Ok(json)
}
