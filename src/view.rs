//! Pure projection of state + schedule data into a render model. Nothing in
//! here mutates; the shell turns the model into markup.

use crate::data::Dataset;
use crate::grades::{Mode, PERIODS};
use crate::schedule::{ScheduleEntry, ScheduleStore};
use crate::state::{date_key, day_search, monday_of, week_search, weekday_name, TimetableState};
use chrono::{Datelike, Duration as ChronoDuration, NaiveDate};
use serde::Serialize;

pub const PERIOD_HEADER: &str = "時限";
pub const SELECT_GRADE_PROMPT: &str = "学年を選択してください。";
pub const LOAD_FAILED_MESSAGE: &str = "時間割データの読み込みに失敗しました。";
pub const LOAD_FAILED_DATE_LABEL: &str = "エラー";
/// Period column plus five data columns.
pub const TABLE_SPAN: usize = 6;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Cell {
    Filled { course: String, room: String },
    Empty,
    Message { text: String, span: usize },
}

impl Cell {
    fn from_entry(entry: Option<&ScheduleEntry>) -> Self {
        match entry.and_then(|e| e.course_label().map(|c| (c, e))) {
            Some((course, e)) => Cell::Filled {
                course: course.to_string(),
                room: e.room.clone().unwrap_or_default(),
            },
            None => Cell::Empty,
        }
    }
}

/// Navigation attached to a column header. `date` is only set when the link
/// must carry a specific day (week view columns).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderLink {
    pub href: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderCell {
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sublabel: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<HeaderLink>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyRow {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub cells: Vec<Cell>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Controls {
    pub active_mode: Mode,
    pub day_dropdown_visible: bool,
    pub week_dropdown_visible: bool,
    pub target: &'static str,
    pub target_label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderModel {
    pub mode: Mode,
    pub date_label: String,
    pub controls: Controls,
    pub header: Vec<HeaderCell>,
    pub body: Vec<BodyRow>,
    pub last_modified: String,
}

fn controls(state: &TimetableState) -> Controls {
    Controls {
        active_mode: state.mode,
        day_dropdown_visible: state.mode == Mode::Day,
        week_dropdown_visible: state.mode == Mode::Week,
        target: state.target.as_str(),
        target_label: state.target.label(),
        grade: state.grade,
    }
}

fn period_label(period: u8) -> String {
    format!("{period}限")
}

fn period_column() -> HeaderCell {
    HeaderCell {
        label: PERIOD_HEADER.to_string(),
        sublabel: None,
        link: None,
    }
}

fn message_row(text: &str) -> BodyRow {
    BodyRow {
        label: None,
        cells: vec![Cell::Message {
            text: text.to_string(),
            span: TABLE_SPAN,
        }],
    }
}

/// Header and body for the day view: one column per active grade.
pub fn project_day(state: &TimetableState, store: &ScheduleStore) -> (Vec<HeaderCell>, Vec<BodyRow>) {
    let grades = state.active_grades();

    let mut header = vec![period_column()];
    header.extend(grades.iter().map(|grade| HeaderCell {
        label: grade.to_string(),
        sublabel: None,
        link: Some(HeaderLink {
            href: week_search(grade),
            date: None,
        }),
    }));

    let key = date_key(state.date);
    let body = PERIODS
        .map(|period| BodyRow {
            label: Some(period_label(period)),
            cells: grades
                .iter()
                .map(|grade| Cell::from_entry(store.find(&key, grade, period)))
                .collect(),
        })
        .collect();

    (header, body)
}

/// Monday..Friday of the week containing `date`.
pub fn week_days(date: NaiveDate) -> Vec<NaiveDate> {
    let monday = monday_of(date);
    (0..5).map(|i| monday + ChronoDuration::days(i)).collect()
}

/// Header and body for the week view of the selected grade, or a prompt
/// row when no grade is selected.
pub fn project_week(state: &TimetableState, store: &ScheduleStore) -> (Vec<HeaderCell>, Vec<BodyRow>) {
    let Some(grade) = state.grade else {
        return (Vec::new(), vec![message_row(SELECT_GRADE_PROMPT)]);
    };

    let days = week_days(state.date);
    let mut header = vec![period_column()];
    header.extend(days.iter().map(|day| HeaderCell {
        label: format!("{}月{}日", day.month(), day.day()),
        sublabel: Some(weekday_name(*day).to_string()),
        link: Some(HeaderLink {
            href: day_search(state.target),
            date: Some(date_key(*day)),
        }),
    }));

    let keys: Vec<String> = days.iter().map(|d| date_key(*d)).collect();
    let body = PERIODS
        .map(|period| BodyRow {
            label: Some(period_label(period)),
            cells: keys
                .iter()
                .map(|key| Cell::from_entry(store.find(key, grade, period)))
                .collect(),
        })
        .collect();

    (header, body)
}

pub fn project(state: &TimetableState, data: &Dataset) -> RenderModel {
    let last_modified = data.last_modified.label();

    if data.schedule_error.is_some() {
        return RenderModel {
            mode: state.mode,
            date_label: LOAD_FAILED_DATE_LABEL.to_string(),
            controls: controls(state),
            header: Vec::new(),
            body: vec![message_row(LOAD_FAILED_MESSAGE)],
            last_modified,
        };
    }

    let (header, body) = match state.mode {
        Mode::Day => project_day(state, &data.store),
        Mode::Week => project_week(state, &data.store),
    };
    RenderModel {
        mode: state.mode,
        date_label: state.date_label(),
        controls: controls(state),
        header,
        body,
        last_modified,
    }
}
