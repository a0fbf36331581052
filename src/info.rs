use chrono::{DateTime, NaiveDateTime};
use serde::Deserialize;
use std::path::Path;

/// The part of `info_*.json` the viewer cares about.
#[derive(Debug, Clone, Deserialize)]
pub struct InfoPayload {
    #[serde(default)]
    pub last_modified: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LastModified {
    At(NaiveDateTime),
    Unknown,
    Failed,
}

impl LastModified {
    pub fn label(&self) -> String {
        match self {
            LastModified::At(ts) => format!("最終更新: {}", ts.format("%Y/%-m/%-d %-H:%M:%S")),
            LastModified::Unknown => "最終更新: 不明".to_string(),
            LastModified::Failed => "最終更新: 取得失敗".to_string(),
        }
    }
}

/// Accepts the pipeline's `YYYY-MM-DD HH:MM:SS` plus ISO/RFC 3339 variants.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if let Ok(ts) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(ts);
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Some(ts);
    }
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.naive_local())
}

fn read_payload(path: &Path) -> anyhow::Result<InfoPayload> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Newest parseable timestamp across all payloads. Any payload that cannot
/// be read or decoded makes the whole result `Failed`.
pub fn load_last_modified(paths: &[&Path]) -> LastModified {
    let mut newest: Option<NaiveDateTime> = None;
    for path in paths {
        let payload = match read_payload(path) {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "info payload load failed");
                return LastModified::Failed;
            }
        };
        let parsed = payload.last_modified.as_deref().and_then(parse_timestamp);
        if parsed.is_none() {
            tracing::debug!(path = %path.display(), "info payload has no usable last_modified");
        }
        newest = newest.max(parsed);
    }
    match newest {
        Some(ts) => LastModified::At(ts),
        None => LastModified::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|d| d.and_hms_opt(h, mi, s))
            .expect("valid timestamp")
    }

    #[test]
    fn parses_pipeline_and_iso_formats() {
        assert_eq!(
            parse_timestamp("2025-04-01 09:05:03"),
            Some(at(2025, 4, 1, 9, 5, 3))
        );
        assert_eq!(
            parse_timestamp("2025-04-01T09:05:03"),
            Some(at(2025, 4, 1, 9, 5, 3))
        );
        assert_eq!(
            parse_timestamp("2025-04-01T09:05:03+09:00"),
            Some(at(2025, 4, 1, 9, 5, 3))
        );
        assert_eq!(parse_timestamp("yesterday"), None);
    }

    #[test]
    fn labels_match_display_strings() {
        assert_eq!(
            LastModified::At(at(2025, 4, 1, 9, 5, 3)).label(),
            "最終更新: 2025/4/1 9:05:03"
        );
        assert_eq!(LastModified::Unknown.label(), "最終更新: 不明");
        assert_eq!(LastModified::Failed.label(), "最終更新: 取得失敗");
    }
}
