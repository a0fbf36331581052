use serde::Serialize;
use serde_json::json;

pub fn ok(id: &str, result: serde_json::Value) -> serde_json::Value {
    json!({
        "id": id,
        "ok": true,
        "result": result
    })
}

/// `ok` for any serializable result.
pub fn ok_with<T: Serialize>(id: &str, result: &T) -> serde_json::Value {
    match serde_json::to_value(result) {
        Ok(v) => ok(id, v),
        Err(e) => err(id, "internal", format!("serialize result: {e}"), None),
    }
}

pub fn err(
    id: &str,
    code: &str,
    message: impl Into<String>,
    details: Option<serde_json::Value>,
) -> serde_json::Value {
    let mut error = json!({
        "code": code,
        "message": message.into(),
    });
    if let Some(d) = details {
        error["details"] = d;
    }
    json!({
        "id": id,
        "ok": false,
        "error": error,
    })
}

pub fn bad_params(id: &str, message: impl Into<String>) -> serde_json::Value {
    err(id, "bad_params", message, None)
}
