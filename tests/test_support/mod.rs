#![allow(dead_code)]

use serde_json::json;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::time::{SystemTime, UNIX_EPOCH};

pub fn temp_dir(prefix: &str) -> PathBuf {
    let p = std::env::temp_dir().join(format!(
        "{}-{}-{}",
        prefix,
        std::process::id(),
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos()
    ));
    std::fs::create_dir_all(&p).expect("create temp dir");
    p
}

pub fn write_json(dir: &Path, name: &str, value: &serde_json::Value) {
    std::fs::write(dir.join(name), value.to_string()).expect("write fixture");
}

/// A data directory with the given schedule rows and two readable info payloads.
pub fn data_dir(prefix: &str, entries: serde_json::Value) -> PathBuf {
    let dir = temp_dir(prefix);
    write_json(&dir, "schedule.json", &entries);
    write_json(
        &dir,
        "info_spring.json",
        &json!({ "file_path": "spring.xlsx", "last_modified": "2025-04-01 09:05:03" }),
    );
    write_json(
        &dir,
        "info_fall.json",
        &json!({ "file_path": "fall.xlsx", "last_modified": "2025-09-30 18:00:00" }),
    );
    dir
}

pub struct Sidecar {
    pub child: Child,
    pub stdin: ChildStdin,
    pub reader: BufReader<ChildStdout>,
    next_id: u64,
}

impl Drop for Sidecar {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

pub fn spawn_sidecar() -> Sidecar {
    let exe = env!("CARGO_BIN_EXE_timetabled");
    let mut child = Command::new(exe)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn timetabled");
    let stdin = child.stdin.take().expect("child stdin");
    let stdout = child.stdout.take().expect("child stdout");
    Sidecar {
        child,
        stdin,
        reader: BufReader::new(stdout),
        next_id: 0,
    }
}

impl Sidecar {
    /// Sends one request and returns the whole response envelope.
    pub fn request(&mut self, method: &str, params: serde_json::Value) -> serde_json::Value {
        self.next_id += 1;
        let id = self.next_id.to_string();
        let payload = json!({
            "id": id,
            "method": method,
            "params": params,
        });
        writeln!(self.stdin, "{}", payload).expect("write request");
        self.stdin.flush().expect("flush request");

        let mut line = String::new();
        self.reader.read_line(&mut line).expect("read response line");
        assert!(!line.trim().is_empty(), "empty response for {}", method);
        let value: serde_json::Value =
            serde_json::from_str(line.trim()).expect("parse response json");
        assert_eq!(value.get("id").and_then(|v| v.as_str()), Some(id.as_str()));
        value
    }

    /// Sends one request, asserts success, and returns `result`.
    pub fn request_ok(&mut self, method: &str, params: serde_json::Value) -> serde_json::Value {
        let resp = self.request(method, params);
        assert_eq!(
            resp.get("ok").and_then(|v| v.as_bool()),
            Some(true),
            "{} failed: {}",
            method,
            resp
        );
        resp.get("result").cloned().unwrap_or(serde_json::Value::Null)
    }

    /// Sends one request, asserts failure, and returns the error code.
    pub fn request_err(&mut self, method: &str, params: serde_json::Value) -> String {
        let resp = self.request(method, params);
        assert_eq!(
            resp.get("ok").and_then(|v| v.as_bool()),
            Some(false),
            "{} unexpectedly succeeded: {}",
            method,
            resp
        );
        resp.pointer("/error/code")
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_string()
    }
}

/// Text of a body cell, or "" for empty cells.
pub fn cell_text(render: &serde_json::Value, row: usize, col: usize) -> String {
    render
        .pointer(&format!("/body/{}/cells/{}/course", row, col))
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string()
}
