use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

/// `DateTime: [Date: 19900101, Time: 000000, UTC: false]` → bracket content
static DATETIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^DateTime:\s*\[(.*)\]\s*$").expect("valid regex"));

/// Parse the library's `Key: Value` detail text. Lines without `": "` are
/// ignored; later duplicates win.
pub fn parse_details(text: &str) -> HashMap<String, String> {
    text.lines()
        .filter_map(|line| line.split_once(": "))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .collect()
}

/// Display text for a date value from the detail map. `None`/`NULL`/empty
/// mean the card has no such date.
pub fn display_date(value: Option<&str>) -> Option<String> {
    let value = value?.trim();
    if value.is_empty() || value == "None" || value == "NULL" {
        return None;
    }
    match DATETIME_RE.captures(value) {
        Some(caps) => Some(caps[1].to_string()),
        None => Some(value.to_string()),
    }
}

/// Final path component of the `File` value the library reports.
pub fn file_label(value: Option<&str>) -> String {
    value
        .and_then(|v| std::path::Path::new(v).file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "Unknown".to_string())
}
