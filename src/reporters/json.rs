//! JSON reporter
//!
//! Outputs the summary as pretty-printed JSON for piping to jq or further
//! processing.

use super::summary::Summary;
use anyhow::Result;

pub fn render(summary: &Summary) -> Result<String> {
    Ok(serde_json::to_string_pretty(summary)?)
}
