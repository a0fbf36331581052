use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// One row of `schedule.json`. `date` is kept as the `YYYY-MM-DD` key the
/// data pipeline writes; lookups compare it verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub date: String,
    pub grade: String,
    pub period: i64,
    #[serde(default, deserialize_with = "lenient_text")]
    pub courses: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub room: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub comment: Option<String>,
}

impl ScheduleEntry {
    /// Course label, if present and non-empty. Anything else renders as an empty cell.
    pub fn course_label(&self) -> Option<&str> {
        self.courses.as_deref().filter(|s| !s.is_empty())
    }
}

// Spreadsheet exports put bare numbers in text columns (room "301").
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match v {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        Some(serde_json::Value::Bool(b)) => Some(b.to_string()),
        Some(other) => Some(other.to_string()),
    })
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadError {
    pub code: String,
    pub message: String,
}

impl LoadError {
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScheduleStore {
    entries: Vec<ScheduleEntry>,
}

impl ScheduleStore {
    pub fn new(entries: Vec<ScheduleEntry>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First entry in load order matching all three keys.
    pub fn find(&self, date: &str, grade: &str, period: u8) -> Option<&ScheduleEntry> {
        self.entries
            .iter()
            .find(|e| e.date == date && e.grade == grade && e.period == i64::from(period))
    }

    /// Number of entries shadowed by an earlier entry with the same (date, grade, period).
    pub fn duplicate_count(&self) -> usize {
        let mut seen = HashSet::new();
        self.entries
            .iter()
            .filter(|e| !seen.insert((e.date.as_str(), e.grade.as_str(), e.period)))
            .count()
    }

    /// Copies every `from` entry to `to` where `to` has nothing for that
    /// (date, period). Returns the number of entries added.
    pub fn inherit_missing(&mut self, from: &str, to: &str) -> usize {
        let taken: HashSet<(String, i64)> = self
            .entries
            .iter()
            .filter(|e| e.grade == to)
            .map(|e| (e.date.clone(), e.period))
            .collect();

        let mut added = Vec::new();
        let mut copied: HashSet<(String, i64)> = HashSet::new();
        for e in self.entries.iter().filter(|e| e.grade == from) {
            let key = (e.date.clone(), e.period);
            if taken.contains(&key) || !copied.insert(key) {
                continue;
            }
            let mut c = e.clone();
            c.grade = to.to_string();
            added.push(c);
        }
        let n = added.len();
        self.entries.extend(added);
        n
    }
}

/// Reads the entry array. I/O problems are `schedule_unavailable`,
/// anything the JSON decoder rejects is `schedule_malformed`.
pub fn load_schedule(path: &Path) -> Result<ScheduleStore, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        LoadError::new(
            "schedule_unavailable",
            format!("{}: {e}", path.to_string_lossy()),
        )
    })?;
    let entries: Vec<ScheduleEntry> = serde_json::from_str(&text).map_err(|e| {
        LoadError::new(
            "schedule_malformed",
            format!("{}: {e}", path.to_string_lossy()),
        )
    })?;
    Ok(ScheduleStore::new(entries))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(date: &str, grade: &str, period: i64, courses: &str) -> ScheduleEntry {
        ScheduleEntry {
            date: date.to_string(),
            grade: grade.to_string(),
            period,
            courses: Some(courses.to_string()),
            room: None,
            comment: None,
        }
    }

    #[test]
    fn find_returns_first_match_and_counts_duplicates() {
        let store = ScheduleStore::new(vec![
            entry("2024-06-10", "M1", 1, "Stats"),
            entry("2024-06-10", "M1", 1, "Shadowed"),
            entry("2024-06-10", "M1", 2, "Ethics"),
        ]);
        assert_eq!(
            store.find("2024-06-10", "M1", 1).and_then(|e| e.course_label()),
            Some("Stats")
        );
        assert!(store.find("2024-06-10", "M2", 1).is_none());
        assert!(store.find("2024-06-11", "M1", 1).is_none());
        assert_eq!(store.duplicate_count(), 1);
    }

    #[test]
    fn empty_course_label_is_not_a_label() {
        let e = entry("2024-06-10", "M1", 1, "");
        assert_eq!(e.course_label(), None);
    }

    #[test]
    fn inherit_missing_keeps_existing_target_rows() {
        let mut store = ScheduleStore::new(vec![
            entry("2024-06-10", "4年生", 1, "Nursing"),
            entry("2024-06-10", "4年生", 2, "Thesis"),
            entry("2024-06-10", "4年助産", 2, "Midwifery"),
        ]);
        assert_eq!(store.inherit_missing("4年生", "4年助産"), 1);
        assert_eq!(
            store
                .find("2024-06-10", "4年助産", 1)
                .and_then(|e| e.course_label()),
            Some("Nursing")
        );
        assert_eq!(
            store
                .find("2024-06-10", "4年助産", 2)
                .and_then(|e| e.course_label()),
            Some("Midwifery")
        );
        assert_eq!(store.inherit_missing("4年生", "4年助産"), 0);
    }

    #[test]
    fn entries_accept_numeric_rooms_and_missing_fields() {
        let raw = r#"[
            {"date":"2024-06-10","grade":"1年生","period":1,"courses":"Math","room":301},
            {"date":"2024-06-10","grade":"1年生","period":0,"comment":"Orientation"}
        ]"#;
        let entries: Vec<ScheduleEntry> = serde_json::from_str(raw).expect("parse entries");
        assert_eq!(entries[0].room.as_deref(), Some("301"));
        assert_eq!(entries[1].courses, None);
        assert_eq!(entries[1].comment.as_deref(), Some("Orientation"));
    }
}
