use crate::data::Dataset;
use crate::gesture::{classify_swipe, Point};
use crate::grades::{canonical_grade, first_grade, Mode, Target};
use crate::settings::SwipeThresholds;
use crate::state::{date_key, RenderPhase, TimetableState};
use crate::view::{project, RenderModel};
use chrono::NaiveDate;
use serde::Serialize;

/// What the shell has to apply after a trigger: the new table, and a
/// history entry to push if the settings part of the URL changed.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Update {
    pub render: RenderModel,
    pub history_push: Option<String>,
}

/// Session hint produced by a header link, for the page the link opens.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkHandoff {
    pub href: String,
    pub session_hint: String,
}

pub struct Controller<'a> {
    state: &'a mut TimetableState,
    data: &'a Dataset,
}

impl<'a> Controller<'a> {
    pub fn new(state: &'a mut TimetableState, data: &'a Dataset) -> Self {
        Self { state, data }
    }

    /// Compute the model in one step with the phase marked, then optionally
    /// sync the URL once the phase is back to idle.
    fn refresh(&mut self, sync_url: bool) -> Update {
        if self.state.mode == Mode::Week && self.state.grade.is_none() {
            self.state.grade = Some(first_grade());
        }
        let render = self.render_once();
        let history_push = if sync_url {
            self.state.serialize_to_url()
        } else {
            None
        };
        Update {
            render,
            history_push,
        }
    }

    fn render_once(&mut self) -> RenderModel {
        self.state.phase = RenderPhase::Rendering;
        let render = project(&*self.state, self.data);
        self.state.phase = RenderPhase::Idle;
        render
    }

    /// Full refresh with URL sync, as on initial page load.
    pub fn full_refresh(&mut self) -> Update {
        self.refresh(true)
    }

    /// Recompute the current model; no mutation, no URL sync.
    pub fn render(&mut self) -> RenderModel {
        self.render_once()
    }

    /// One day (day view) or one week (week view) per step. The URL does not
    /// carry the date, so it is left alone.
    pub fn navigate_date(&mut self, direction: i32) -> Update {
        let step = match self.state.mode {
            Mode::Day => 1,
            Mode::Week => 7,
        };
        self.state.shift_date(i64::from(direction.signum()) * step);
        Update {
            render: self.render_once(),
            history_push: None,
        }
    }

    /// `None` when the mode is already active.
    pub fn switch_mode(&mut self, mode: Mode) -> Option<Update> {
        if self.state.mode == mode {
            return None;
        }
        self.state.mode = mode;
        if mode == Mode::Week && self.state.grade.and_then(canonical_grade).is_none() {
            self.state.grade = Some(first_grade());
        }
        Some(self.refresh(true))
    }

    pub fn select_grade(&mut self, grade: &'static str) -> Update {
        self.state.grade = Some(grade);
        self.refresh(true)
    }

    pub fn select_target(&mut self, target: Target) -> Update {
        self.state.target = target;
        self.refresh(true)
    }

    /// Records the date the next page load should open on: the link's own
    /// date when it has one, otherwise the date currently shown.
    pub fn on_header_link_activated(&mut self, explicit_date: Option<NaiveDate>) -> NaiveDate {
        let date = explicit_date.unwrap_or(self.state.date);
        self.state.pending_hint = Some(date);
        tracing::debug!(hint = %date, "session hint stored");
        date
    }

    /// Resolves header column `column` (0 = first data column) of the current
    /// view and activates its link. `None` when that column has no link.
    pub fn activate_header_column(&mut self, column: usize) -> Option<LinkHandoff> {
        let model = self.render_once();
        let link = column
            .checked_add(1)
            .and_then(|i| model.header.get(i))?
            .link
            .clone()?;
        let explicit = link
            .date
            .as_deref()
            .and_then(|raw| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok());
        let date = self.on_header_link_activated(explicit);
        Some(LinkHandoff {
            href: link.href,
            session_hint: date_key(date),
        })
    }

    /// Completed touch gesture; `None` when it reads as a scroll.
    pub fn swipe(&mut self, start: Point, end: Point, limits: SwipeThresholds) -> Option<Update> {
        let direction = classify_swipe(start, end, limits)?;
        tracing::debug!(direction, "swipe");
        Some(self.navigate_date(direction))
    }
}
