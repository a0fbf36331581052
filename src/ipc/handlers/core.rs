use crate::data::load_dataset;
use crate::ipc::error::{bad_params, err, ok};
use crate::ipc::types::{AppState, Request};
use crate::settings::{load_settings, settings_from_json};
use serde_json::json;
use std::path::PathBuf;

fn handle_health(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(
        &req.id,
        json!({
            "version": env!("CARGO_PKG_VERSION"),
            "workspacePath": state.workspace.as_ref().map(|p| p.to_string_lossy().to_string()),
            "dataLoaded": state.data.is_some(),
        }),
    )
}

fn handle_workspace_select(state: &mut AppState, req: &Request) -> serde_json::Value {
    let p = req
        .params
        .get("path")
        .and_then(|v| v.as_str())
        .map(PathBuf::from);
    let Some(path) = p else {
        return bad_params(&req.id, "missing params.path");
    };
    if !path.is_dir() {
        return err(
            &req.id,
            "workspace_not_found",
            format!("not a directory: {}", path.to_string_lossy()),
            None,
        );
    }

    // Inline settings win over the directory's settings file.
    let settings = match req.params.get("settings").and_then(|v| v.as_object()) {
        Some(obj) => settings_from_json(obj),
        None => load_settings(&path),
    };
    let data = load_dataset(&path, &settings);

    let result = json!({
        "workspacePath": path.to_string_lossy(),
        "entries": data.store.len(),
        "scheduleError": data.schedule_error,
        "lastModified": data.last_modified.label(),
    });

    state.workspace = Some(path);
    state.settings = settings;
    state.data = Some(data);
    ok(&req.id, result)
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "health" => Some(handle_health(state, req)),
        "workspace.select" => Some(handle_workspace_select(state, req)),
        _ => None,
    }
}
