use crate::grades::canonical_grade;
use serde_json::{Map, Value as JsonValue};
use std::path::{Path, PathBuf};

pub const SETTINGS_FILE: &str = "timetable.json";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwipeThresholds {
    pub min_horizontal: f64,
    pub max_vertical: f64,
}

impl Default for SwipeThresholds {
    fn default() -> Self {
        Self {
            min_horizontal: 50.0,
            max_vertical: 100.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InheritRule {
    pub from: &'static str,
    pub to: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DataSettings {
    pub schedule_file: String,
    pub info_files: Vec<String>,
    pub inherit_grades: Vec<InheritRule>,
    pub swipe: SwipeThresholds,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            schedule_file: "schedule.json".to_string(),
            info_files: vec!["info_spring.json".to_string(), "info_fall.json".to_string()],
            inherit_grades: vec![InheritRule {
                from: "4年生",
                to: "4年助産",
            }],
            swipe: SwipeThresholds::default(),
        }
    }
}

impl DataSettings {
    pub fn schedule_path(&self, dir: &Path) -> PathBuf {
        dir.join(&self.schedule_file)
    }

    pub fn info_paths(&self, dir: &Path) -> Vec<PathBuf> {
        self.info_files.iter().map(|f| dir.join(f)).collect()
    }
}

fn file_name(v: Option<&JsonValue>) -> Option<String> {
    v.and_then(|v| v.as_str())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty() && !s.contains(['/', '\\']))
}

fn positive(v: Option<&JsonValue>) -> Option<f64> {
    v.and_then(|v| v.as_f64()).filter(|v| *v > 0.0)
}

/// Builds settings from a JSON object. Every key is optional and any
/// invalid value falls back to its default.
pub fn settings_from_json(obj: &Map<String, JsonValue>) -> DataSettings {
    let defaults = DataSettings::default();

    let schedule_file = file_name(obj.get("scheduleFile")).unwrap_or(defaults.schedule_file);

    let info_files = obj
        .get("infoFiles")
        .and_then(|v| v.as_array())
        .map(|arr| arr.iter().filter_map(|v| file_name(Some(v))).collect::<Vec<_>>())
        .filter(|files| !files.is_empty())
        .unwrap_or(defaults.info_files);

    let inherit_grades = match obj.get("inheritGrades").and_then(|v| v.as_array()) {
        Some(arr) => arr
            .iter()
            .filter_map(|rule| {
                let from = canonical_grade(rule.get("from")?.as_str()?)?;
                let to = canonical_grade(rule.get("to")?.as_str()?)?;
                (from != to).then_some(InheritRule { from, to })
            })
            .collect(),
        None => defaults.inherit_grades,
    };

    let swipe_obj = obj.get("swipe").and_then(|v| v.as_object());
    let swipe = SwipeThresholds {
        min_horizontal: positive(swipe_obj.and_then(|o| o.get("minHorizontal")))
            .unwrap_or(defaults.swipe.min_horizontal),
        max_vertical: positive(swipe_obj.and_then(|o| o.get("maxVertical")))
            .unwrap_or(defaults.swipe.max_vertical),
    };

    DataSettings {
        schedule_file,
        info_files,
        inherit_grades,
        swipe,
    }
}

/// Best-effort read of `timetable.json` in the data directory. A missing or
/// malformed file yields the defaults.
pub fn load_settings(dir: &Path) -> DataSettings {
    let path = dir.join(SETTINGS_FILE);
    if !path.is_file() {
        return DataSettings::default();
    }
    let parsed = std::fs::read_to_string(&path)
        .map_err(anyhow::Error::from)
        .and_then(|text| Ok(serde_json::from_str::<JsonValue>(&text)?));
    match parsed {
        Ok(JsonValue::Object(obj)) => settings_from_json(&obj),
        Ok(_) => {
            tracing::warn!(path = %path.display(), "settings file is not an object; using defaults");
            DataSettings::default()
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "settings file unreadable; using defaults");
            DataSettings::default()
        }
    }
}
