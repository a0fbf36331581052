use crate::grades::{canonical_grade, Mode, Target, WEEKDAY_NAMES};
use crate::query::QueryParams;
use chrono::{DateTime, Datelike, Duration as ChronoDuration, Local, NaiveDate};
use regex::Regex;
use std::sync::LazyLock;

static DAY_PARAM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})-?(\d{2})-?(\d{2})$").expect("day param pattern"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderPhase {
    Idle,
    Rendering,
}

/// The shell's current `location.search` and how many history entries we pushed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Location {
    pub search: String,
    pub pushes: usize,
}

impl Location {
    pub fn at(search: &str) -> Self {
        Self {
            search: search.to_string(),
            pushes: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TimetableState {
    pub mode: Mode,
    pub date: NaiveDate,
    pub grade: Option<&'static str>,
    pub target: Target,
    pub phase: RenderPhase,
    pub location: Location,
    /// Date handed from a header link to the next page load. Never put in the URL.
    pub pending_hint: Option<NaiveDate>,
}

impl TimetableState {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            mode: Mode::Day,
            date: today,
            grade: None,
            target: Target::Undergrad,
            phase: RenderPhase::Idle,
            location: Location::default(),
            pending_hint: None,
        }
    }

    /// A fresh page load: defaults again, except the handoff hint survives.
    pub fn restart(&mut self, today: NaiveDate, search: &str) {
        let pending_hint = self.pending_hint.take();
        *self = Self::new(today);
        self.pending_hint = pending_hint;
        self.location = Location::at(search);
    }

    /// Applies the session hint and URL parameters. Malformed values are
    /// ignored and leave the field as it was.
    ///
    /// `session_hint` is the raw value the shell read from session storage;
    /// when it is `None` or unparseable the pending in-process hint is used
    /// instead. Either way the hint is consumed.
    pub fn load_from_url(&mut self, search: &str, session_hint: Option<&str>) {
        let params = QueryParams::parse(search);

        let pending = self.pending_hint.take();
        let hinted = match session_hint {
            Some(raw) => match parse_session_hint(raw) {
                Some(date) => Some(date),
                None => {
                    tracing::debug!(hint = raw, "ignoring unparseable session hint");
                    pending
                }
            },
            None => pending,
        };
        if let Some(date) = hinted {
            self.date = date;
        }

        if hinted.is_none() {
            if let Some(raw) = params.get("day") {
                match parse_day_param(raw) {
                    Some(date) => self.date = date,
                    None => tracing::debug!(day = raw, "ignoring malformed day param"),
                }
            }
        }

        if let Some(raw) = params.get("type") {
            match Mode::parse(raw) {
                Some(mode) => self.mode = mode,
                None => tracing::debug!(mode = raw, "ignoring unknown type param"),
            }
        }

        if let Some(raw) = params.get("grade") {
            match canonical_grade(raw) {
                Some(grade) => self.grade = Some(grade),
                None => tracing::debug!(grade = raw, "ignoring unknown grade param"),
            }
        }

        if let Some(raw) = params.get("target") {
            match Target::parse(raw) {
                Some(target) => self.target = target,
                None => tracing::debug!(target = raw, "ignoring unknown target param"),
            }
        }
    }

    /// The query string this state maps to. The date is never part of it.
    pub fn url_search(&self) -> String {
        match (self.mode, self.grade) {
            (Mode::Week, Some(grade)) => week_search(grade),
            _ => day_search(self.target),
        }
    }

    /// Returns the search string to push onto history, if any. Does nothing
    /// while a render is in progress or when the URL already matches.
    pub fn serialize_to_url(&mut self) -> Option<String> {
        if self.phase == RenderPhase::Rendering {
            return None;
        }
        let next = self.url_search();
        if next == self.location.search {
            return None;
        }
        tracing::info!(search = %next, "history push");
        self.location.search = next.clone();
        self.location.pushes += 1;
        Some(next)
    }

    pub fn active_grades(&self) -> &'static [&'static str] {
        self.target.grades()
    }

    /// Moves the date by `days`; out-of-range results leave it unchanged.
    pub fn shift_date(&mut self, days: i64) {
        match self.date.checked_add_signed(ChronoDuration::days(days)) {
            Some(d) => self.date = d,
            None => tracing::warn!(date = %self.date, days, "date shift out of range"),
        }
    }

    pub fn date_label(&self) -> String {
        match self.mode {
            Mode::Day => format!(
                "{}年{}月{}日（{}）",
                self.date.year(),
                self.date.month(),
                self.date.day(),
                weekday_name(self.date)
            ),
            Mode::Week => {
                let start = monday_of(self.date);
                let end = start + ChronoDuration::days(4);
                format!(
                    "{}年{}月{}日～{}月{}日",
                    start.year(),
                    start.month(),
                    start.day(),
                    end.month(),
                    end.day()
                )
            }
        }
    }
}

/// `?type=week&grade=<grade>`
pub fn week_search(grade: &str) -> String {
    let mut params = QueryParams::default();
    params.set("type", Mode::Week.as_str());
    params.set("grade", grade);
    params.to_search()
}

/// `?type=day&target=<target>`
pub fn day_search(target: Target) -> String {
    let mut params = QueryParams::default();
    params.set("type", Mode::Day.as_str());
    params.set("target", target.as_str());
    params.to_search()
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Monday on or before `date`; a Sunday belongs to the week that started six days earlier.
pub fn monday_of(date: NaiveDate) -> NaiveDate {
    date - ChronoDuration::days(i64::from(date.weekday().num_days_from_monday()))
}

pub fn weekday_name(date: NaiveDate) -> &'static str {
    WEEKDAY_NAMES[date.weekday().num_days_from_sunday() as usize]
}

/// `YYYY-MM-DD` key used by schedule entries and session hints.
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// `YYYY[-]MM[-]DD`; the numbers must form a real calendar date.
pub fn parse_day_param(raw: &str) -> Option<NaiveDate> {
    let caps = DAY_PARAM.captures(raw.trim())?;
    let year: i32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let day: u32 = caps[3].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// A plain ISO date, or an RFC 3339 timestamp taken in local time.
pub fn parse_session_hint(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Local).date_naive())
}
