//! Filename derivation and manipulation.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, Local, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Creation timestamp format used by the platform, e.g.
/// `Wed Oct 10 20:19:24 +0000 2018`.
const PLATFORM_TIMESTAMP_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

/// Rendering of the timestamp part of a filename.
const SUFFIX_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Time zone used when rendering timestamp suffixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimestampZone {
    Utc,
    /// Wall-clock time of the machine running the download.
    #[default]
    Local,
}

impl fmt::Display for TimestampZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimestampZone::Utc => write!(f, "utc"),
            TimestampZone::Local => write!(f, "local"),
        }
    }
}

impl FromStr for TimestampZone {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "utc" => Ok(TimestampZone::Utc),
            "local" => Ok(TimestampZone::Local),
            _ => Err(format!("Unknown timestamp zone: {}", s)),
        }
    }
}

fn parse_created_at(created_at: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_str(created_at, PLATFORM_TIMESTAMP_FORMAT)
        .or_else(|_| DateTime::parse_from_rfc3339(created_at))
        .ok()
}

/// Render a record's creation timestamp as `YYYYMMDD_HHMMSS`.
///
/// Absent or unparseable timestamps give an empty string.
pub fn timestamp_suffix(created_at: Option<&str>, zone: TimestampZone) -> String {
    let Some(parsed) = created_at.and_then(parse_created_at) else {
        return String::new();
    };

    match zone {
        TimestampZone::Utc => parsed.with_timezone(&Utc).format(SUFFIX_FORMAT).to_string(),
        TimestampZone::Local => parsed
            .with_timezone(&Local)
            .format(SUFFIX_FORMAT)
            .to_string(),
    }
}

/// Build the display stem for one media element of a record.
///
/// `index` is zero-based; the positional suffix is only added when the record
/// carries more than one media element.
pub fn derive_stem(
    handle: &str,
    record_id: &str,
    timestamp: &str,
    index: usize,
    total: usize,
) -> String {
    let mut stem = format!("{}-{}", handle, record_id);
    if !timestamp.is_empty() {
        stem.push('-');
        stem.push_str(timestamp);
    }
    if total > 1 {
        stem.push_str(&format!("-{}", index + 1));
    }
    stem
}

/// Recover the shared base name of a record by dropping a trailing `-<digits>`.
pub fn archive_base_name(stem: &str) -> &str {
    match stem.rsplit_once('-') {
        Some((base, position))
            if !position.is_empty() && position.chars().all(|c| c.is_ascii_digit()) =>
        {
            base
        }
        _ => stem,
    }
}

/// Validate and sanitize a filename by removing or replacing invalid characters.
///
/// Returns an error if the filename contains path traversal patterns.
pub fn sanitize_filename(name: &str) -> Result<String> {
    if name.contains("..") {
        return Err(Error::InvalidFilename(format!(
            "Path traversal detected: '{}'",
            name
        )));
    }

    if name.contains('/') || name.contains('\\') {
        return Err(Error::InvalidFilename(format!(
            "Path separators not allowed in filename: '{}'",
            name
        )));
    }

    if name.contains('\0') {
        return Err(Error::InvalidFilename(format!(
            "Null bytes not allowed in filename: '{}'",
            name
        )));
    }

    let sanitized: String = name
        .chars()
        .map(|c| match c {
            ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if sanitized.trim().is_empty() {
        return Err(Error::InvalidFilename(
            "Filename cannot be empty or whitespace-only".to_string(),
        ));
    }

    Ok(sanitized)
}

/// Most numbered variants tried before a download gives up on a name.
pub const MAX_UNIQUE_ATTEMPTS: u32 = 1000;

/// Candidate name number `attempt` for `path`: `0` is the path itself, then
/// `_1`, `_2`, ... are appended to the stem.
pub fn numbered_filename(path: &Path, attempt: u32) -> PathBuf {
    if attempt == 0 {
        return path.to_path_buf();
    }

    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("");
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let parent = path.parent().unwrap_or(Path::new("."));

    let new_name = if ext.is_empty() {
        format!("{}_{}", stem, attempt)
    } else {
        format!("{}_{}.{}", stem, attempt, ext)
    };
    parent.join(new_name)
}
