use crate::controller::{Controller, Update};
use crate::gesture::{suppresses_scroll, Point};
use crate::grades::{canonical_grade, Mode, Target};
use crate::ipc::error::{bad_params, err, ok, ok_with};
use crate::ipc::types::{AppState, Request};
use crate::settings::DataSettings;
use crate::state::{date_key, today};
use chrono::NaiveDate;
use serde_json::{json, Value as JsonValue};

type HandlerResult = Result<serde_json::Value, serde_json::Value>;

/// Runs `f` against the controller once data has been loaded.
fn with_controller<F>(state: &mut AppState, req: &Request, f: F) -> serde_json::Value
where
    F: FnOnce(&mut Controller<'_>, &DataSettings) -> HandlerResult,
{
    let AppState {
        data,
        timetable,
        settings,
        ..
    } = state;
    let Some(data) = data.as_ref() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };
    let mut controller = Controller::new(timetable, data);
    match f(&mut controller, settings) {
        Ok(v) => v,
        Err(e) => e,
    }
}

fn required_str<'r>(req: &'r Request, key: &str) -> Result<&'r str, serde_json::Value> {
    req.params
        .get(key)
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| bad_params(&req.id, format!("missing {}", key)))
}

fn opt_str<'r>(req: &'r Request, key: &str) -> Result<Option<&'r str>, serde_json::Value> {
    match req.params.get(key) {
        None | Some(JsonValue::Null) => Ok(None),
        Some(JsonValue::String(s)) => Ok(Some(s.as_str())),
        Some(_) => Err(bad_params(
            &req.id,
            format!("{} must be string or null", key),
        )),
    }
}

fn parse_point(req: &Request, key: &str) -> Result<Point, serde_json::Value> {
    let raw = req
        .params
        .get(key)
        .ok_or_else(|| bad_params(&req.id, format!("missing {}", key)))?;
    serde_json::from_value(raw.clone())
        .map_err(|e| bad_params(&req.id, format!("{} must be {{x, y}}: {}", key, e)))
}

fn update_json(req: &Request, update: &Update) -> serde_json::Value {
    ok_with(&req.id, update)
}

fn handle_session_init(state: &mut AppState, req: &Request) -> serde_json::Value {
    let search = match opt_str(req, "search") {
        Ok(v) => v.unwrap_or("").to_string(),
        Err(e) => return e,
    };
    let hint = match opt_str(req, "sessionHint") {
        Ok(v) => v.map(str::to_string),
        Err(e) => return e,
    };
    let start_date = match opt_str(req, "today") {
        Ok(None) => today(),
        Ok(Some(raw)) => match NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d") {
            Ok(d) => d,
            Err(_) => return bad_params(&req.id, "today must be YYYY-MM-DD"),
        },
        Err(e) => return e,
    };

    if state.data.is_none() {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    }
    state.timetable.restart(start_date, &search);
    state.timetable.load_from_url(&search, hint.as_deref());
    tracing::info!(search = %search, mode = state.timetable.mode.as_str(), date = %state.timetable.date, "session started");

    with_controller(state, req, |c, _| Ok(update_json(req, &c.full_refresh())))
}

fn handle_render(state: &mut AppState, req: &Request) -> serde_json::Value {
    with_controller(state, req, |c, _| {
        Ok(ok(&req.id, json!({ "render": c.render(), "historyPush": null })))
    })
}

fn handle_navigate(state: &mut AppState, req: &Request) -> serde_json::Value {
    let direction = match req.params.get("direction").and_then(|v| v.as_i64()) {
        Some(d @ (-1 | 1)) => d as i32,
        _ => return bad_params(&req.id, "direction must be -1 or 1"),
    };
    with_controller(state, req, |c, _| {
        Ok(update_json(req, &c.navigate_date(direction)))
    })
}

fn handle_swipe(state: &mut AppState, req: &Request) -> serde_json::Value {
    let (start, end) = match (parse_point(req, "start"), parse_point(req, "end")) {
        (Ok(s), Ok(e)) => (s, e),
        (Err(e), _) | (_, Err(e)) => return e,
    };
    with_controller(state, req, |c, settings| {
        Ok(match c.swipe(start, end, settings.swipe) {
            Some(update) => {
                let mut v = serde_json::to_value(&update).map_err(|e| {
                    err(&req.id, "internal", format!("serialize result: {e}"), None)
                })?;
                v["navigated"] = json!(true);
                ok(&req.id, v)
            }
            None => ok(&req.id, json!({ "navigated": false })),
        })
    })
}

fn handle_touch_move(_state: &mut AppState, req: &Request) -> serde_json::Value {
    let (start, current) = match (parse_point(req, "start"), parse_point(req, "current")) {
        (Ok(s), Ok(c)) => (s, c),
        (Err(e), _) | (_, Err(e)) => return e,
    };
    ok(
        &req.id,
        json!({ "suppressScroll": suppresses_scroll(start, current) }),
    )
}

fn handle_switch_mode(state: &mut AppState, req: &Request) -> serde_json::Value {
    let mode = match required_str(req, "mode").map(Mode::parse) {
        Ok(Some(m)) => m,
        Ok(None) => return bad_params(&req.id, "mode must be day or week"),
        Err(e) => return e,
    };
    with_controller(state, req, |c, _| {
        Ok(match c.switch_mode(mode) {
            Some(update) => update_json(req, &update),
            None => ok(&req.id, json!({ "render": c.render(), "historyPush": null })),
        })
    })
}

fn handle_select_grade(state: &mut AppState, req: &Request) -> serde_json::Value {
    let grade = match required_str(req, "grade") {
        Ok(raw) => match canonical_grade(raw) {
            Some(g) => g,
            None => {
                return err(
                    &req.id,
                    "bad_params",
                    format!("unknown grade: {}", raw),
                    Some(json!({ "grades": crate::grades::all_grades().collect::<Vec<_>>() })),
                )
            }
        },
        Err(e) => return e,
    };
    with_controller(state, req, |c, _| Ok(update_json(req, &c.select_grade(grade))))
}

fn handle_select_target(state: &mut AppState, req: &Request) -> serde_json::Value {
    let target = match required_str(req, "target").map(Target::parse) {
        Ok(Some(t)) => t,
        Ok(None) => return bad_params(&req.id, "target must be undergrad or graduate"),
        Err(e) => return e,
    };
    with_controller(state, req, |c, _| Ok(update_json(req, &c.select_target(target))))
}

fn handle_header_link(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(column) = req
        .params
        .get("column")
        .and_then(|v| v.as_u64())
        .and_then(|c| usize::try_from(c).ok())
    else {
        return bad_params(&req.id, "column must be a non-negative integer");
    };
    with_controller(state, req, |c, _| {
        match c.activate_header_column(column) {
            Some(handoff) => Ok(ok_with(&req.id, &handoff)),
            None => Err(bad_params(
                &req.id,
                format!("no header link at column {}", column),
            )),
        }
    })
}

fn handle_state(state: &mut AppState, req: &Request) -> serde_json::Value {
    let t = &state.timetable;
    ok(
        &req.id,
        json!({
            "mode": t.mode,
            "date": date_key(t.date),
            "grade": t.grade,
            "target": t.target,
            "search": t.location.search,
            "historyPushes": t.location.pushes,
            "pendingHint": t.pending_hint.map(date_key),
        }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "session.init" => Some(handle_session_init(state, req)),
        "timetable.render" => Some(handle_render(state, req)),
        "timetable.navigate" => Some(handle_navigate(state, req)),
        "timetable.swipe" => Some(handle_swipe(state, req)),
        "timetable.touchMove" => Some(handle_touch_move(state, req)),
        "timetable.switchMode" => Some(handle_switch_mode(state, req)),
        "timetable.selectGrade" => Some(handle_select_grade(state, req)),
        "timetable.selectTarget" => Some(handle_select_target(state, req)),
        "timetable.headerLink" => Some(handle_header_link(state, req)),
        "timetable.state" => Some(handle_state(state, req)),
        _ => None,
    }
}
