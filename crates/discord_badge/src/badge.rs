//! Fixed-format scan for the badge status value.
//!
//! The status file is treated as opaque text: no JSON parsing, just the
//! first occurrence of the `"badgeStatus":` marker followed by an integer.

/// Literal marker preceding the badge value in the status file.
const MARKER: &str = "\"badgeStatus\":";

/// Highest code representable by the overlay's icon set.
const MAX_CODE: i64 = 10;

/// Code for a non-mention message, mapped from the raw -1.
const NON_MENTION_CODE: i64 = 11;

/// Extracts the first badge status integer from `contents`.
///
/// Scans for the marker, skips whitespace after the colon and accepts an
/// optional sign followed by a digit run. Returns `None` when the marker is
/// absent or no integer follows it.
pub fn extract(contents: &str) -> Option<i64> {
    let after = &contents[contents.find(MARKER)? + MARKER.len()..];
    let value = after.trim_start();
    let digits_start = match value.as_bytes().first() {
        Some(b'-' | b'+') => 1,
        _ => 0,
    };
    let digits_end = value[digits_start..]
        .find(|c: char| !c.is_ascii_digit())
        .map_or(value.len(), |i| digits_start + i);
    if digits_end == digits_start {
        return None;
    }
    value[..digits_end].parse().ok()
}

/// Maps a raw badge value onto the icon naming convention:
/// 0 = no notification, 1-10 = 1-9+ mentions (capped), 11 = non-mention
/// message. Values below -1 pass through unchanged.
pub fn normalize(raw: i64) -> i64 {
    if raw == -1 {
        return NON_MENTION_CODE;
    }
    raw.min(MAX_CODE)
}
