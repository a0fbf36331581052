use crate::info::{load_last_modified, LastModified};
use crate::schedule::{load_schedule, LoadError, ScheduleStore};
use crate::settings::DataSettings;
use std::path::{Path, PathBuf};

/// Everything read from the data directory for one session. Read-only after load.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub store: ScheduleStore,
    pub schedule_error: Option<LoadError>,
    pub last_modified: LastModified,
}

/// Loads the schedule, then the info payloads. Neither failure is fatal:
/// a failed schedule load leaves an empty store and records the error,
/// a failed info load only affects the "last updated" label.
pub fn load_dataset(dir: &Path, settings: &DataSettings) -> Dataset {
    let schedule_path = settings.schedule_path(dir);
    let (store, schedule_error) = match load_schedule(&schedule_path) {
        Ok(mut store) => {
            for rule in &settings.inherit_grades {
                let added = store.inherit_missing(rule.from, rule.to);
                if added > 0 {
                    tracing::debug!(from = rule.from, to = rule.to, added, "inherited grade rows");
                }
            }
            if store.is_empty() {
                tracing::warn!(path = %schedule_path.display(), "schedule file has no entries");
            }
            let dups = store.duplicate_count();
            if dups > 0 {
                tracing::warn!(duplicates = dups, "schedule has duplicate (date, grade, period) rows; first match wins");
            }
            tracing::info!(entries = store.len(), path = %schedule_path.display(), "schedule loaded");
            (store, None)
        }
        Err(e) => {
            tracing::warn!(error = %e, "schedule load failed; continuing with an empty dataset");
            (ScheduleStore::default(), Some(e))
        }
    };

    let info_paths: Vec<PathBuf> = settings.info_paths(dir);
    let refs: Vec<&Path> = info_paths.iter().map(PathBuf::as_path).collect();
    let last_modified = load_last_modified(&refs);

    Dataset {
        store,
        schedule_error,
        last_modified,
    }
}
