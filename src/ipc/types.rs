use std::path::PathBuf;

use serde::Deserialize;

use crate::data::Dataset;
use crate::settings::DataSettings;
use crate::state::TimetableState;

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

pub struct AppState {
    pub workspace: Option<PathBuf>,
    pub settings: DataSettings,
    pub data: Option<Dataset>,
    pub timetable: TimetableState,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            workspace: None,
            settings: DataSettings::default(),
            data: None,
            timetable: TimetableState::new(crate::state::today()),
        }
    }
}
