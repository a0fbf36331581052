mod test_support;

use serde_json::json;
use test_support::{cell_text, data_dir, spawn_sidecar};

fn entries() -> serde_json::Value {
    json!([
        {"date": "2024-06-12", "grade": "3年生", "period": 2, "courses": "Pharmacology", "room": "C5"},
        {"date": "2024-06-13", "grade": "3年生", "period": 2, "courses": "Anatomy", "room": "C5"},
        {"date": "2024-06-20", "grade": "3年生", "period": 1, "courses": "Next week", "room": "C5"}
    ])
}

#[test]
fn week_to_day_link_hands_off_the_clicked_weekday() {
    let dir = data_dir("timetable-nav-week-link", entries());
    let mut sc = spawn_sidecar();
    sc.request_ok("workspace.select", json!({ "path": dir.to_string_lossy() }));
    sc.request_ok(
        "session.init",
        json!({ "search": "?type=week&grade=3年生", "today": "2024-06-13" }),
    );

    // Column 2 is Wednesday of the displayed week.
    let handoff = sc.request_ok("timetable.headerLink", json!({ "column": 2 }));
    assert_eq!(
        handoff.get("sessionHint").and_then(|v| v.as_str()),
        Some("2024-06-12")
    );
    let href = handoff
        .get("href")
        .and_then(|v| v.as_str())
        .expect("href")
        .to_string();
    assert_eq!(href, "?type=day&target=undergrad");

    // The shell follows the link: a fresh page load with the stored hint.
    let page = sc.request_ok(
        "session.init",
        json!({ "search": href, "sessionHint": "2024-06-12", "today": "2024-06-13" }),
    );
    let render = &page["render"];
    assert_eq!(
        render.get("dateLabel").and_then(|v| v.as_str()),
        Some("2024年6月12日（水）")
    );
    // Columns: 1年生 2年生 3年生 ...
    assert_eq!(cell_text(render, 1, 2), "Pharmacology");
}

#[test]
fn pending_hint_is_used_once_when_the_shell_does_not_pass_one() {
    let dir = data_dir("timetable-nav-pending", entries());
    let mut sc = spawn_sidecar();
    sc.request_ok("workspace.select", json!({ "path": dir.to_string_lossy() }));
    sc.request_ok("session.init", json!({ "search": "", "today": "2024-06-13" }));
    sc.request_ok("timetable.navigate", json!({ "direction": 1 }));

    // Day → week link keeps the date currently shown (the 14th).
    let handoff = sc.request_ok("timetable.headerLink", json!({ "column": 2 }));
    assert_eq!(
        handoff.get("sessionHint").and_then(|v| v.as_str()),
        Some("2024-06-14")
    );
    let href = handoff.get("href").and_then(|v| v.as_str()).expect("href");

    sc.request_ok("session.init", json!({ "search": href, "today": "2024-06-01" }));
    let state = sc.request_ok("timetable.state", json!({}));
    assert_eq!(state.get("date").and_then(|v| v.as_str()), Some("2024-06-14"));
    assert_eq!(state.get("mode").and_then(|v| v.as_str()), Some("week"));
    assert_eq!(state.get("grade").and_then(|v| v.as_str()), Some("3年生"));
    assert!(state.get("pendingHint").map(|v| v.is_null()).unwrap_or(false));

    // Reload without a hint: back to "today".
    sc.request_ok("session.init", json!({ "search": href, "today": "2024-06-01" }));
    let state = sc.request_ok("timetable.state", json!({}));
    assert_eq!(state.get("date").and_then(|v| v.as_str()), Some("2024-06-01"));
}

#[test]
fn week_navigation_moves_seven_days_and_leaves_the_url() {
    let dir = data_dir("timetable-nav-week-step", entries());
    let mut sc = spawn_sidecar();
    sc.request_ok("workspace.select", json!({ "path": dir.to_string_lossy() }));
    sc.request_ok(
        "session.init",
        json!({ "search": "?type=week&grade=3年生", "today": "2024-06-13" }),
    );
    let before = sc.request_ok("timetable.state", json!({}));

    let next = sc.request_ok("timetable.navigate", json!({ "direction": 1 }));
    assert!(next.get("historyPush").map(|v| v.is_null()).unwrap_or(false));
    assert_eq!(cell_text(&next["render"], 0, 3), "Next week");

    let after = sc.request_ok("timetable.state", json!({}));
    assert_eq!(after.get("date").and_then(|v| v.as_str()), Some("2024-06-20"));
    assert_eq!(after.get("search"), before.get("search"));
    assert_eq!(after.get("historyPushes"), before.get("historyPushes"));

    assert_eq!(
        sc.request_err("timetable.navigate", json!({ "direction": 2 })),
        "bad_params"
    );
}

#[test]
fn swipes_navigate_and_scrolls_are_ignored() {
    let dir = data_dir("timetable-nav-swipe", entries());
    let mut sc = spawn_sidecar();
    sc.request_ok("workspace.select", json!({ "path": dir.to_string_lossy() }));
    sc.request_ok("session.init", json!({ "search": "", "today": "2024-06-13" }));

    let left = sc.request_ok(
        "timetable.swipe",
        json!({ "start": {"x": 300, "y": 200}, "end": {"x": 220, "y": 240} }),
    );
    assert_eq!(left.get("navigated").and_then(|v| v.as_bool()), Some(true));
    assert_eq!(
        left.pointer("/render/dateLabel").and_then(|v| v.as_str()),
        Some("2024年6月14日（金）")
    );

    let scroll = sc.request_ok(
        "timetable.swipe",
        json!({ "start": {"x": 100, "y": 0}, "end": {"x": 300, "y": 250} }),
    );
    assert_eq!(scroll.get("navigated").and_then(|v| v.as_bool()), Some(false));

    let right = sc.request_ok(
        "timetable.swipe",
        json!({ "start": {"x": 100, "y": 0}, "end": {"x": 150, "y": 0} }),
    );
    assert_eq!(right.get("navigated").and_then(|v| v.as_bool()), Some(true));
    let state = sc.request_ok("timetable.state", json!({}));
    assert_eq!(state.get("date").and_then(|v| v.as_str()), Some("2024-06-13"));

    let mv = sc.request_ok(
        "timetable.touchMove",
        json!({ "start": {"x": 0, "y": 0}, "current": {"x": 30, "y": 5} }),
    );
    assert_eq!(mv.get("suppressScroll").and_then(|v| v.as_bool()), Some(true));
}
