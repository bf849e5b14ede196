//! Logging trait for chat client operations.
//!
//! This module provides the [`ClientLogger`] trait that allows callers to
//! capture every interaction passing through the [`ChatClient`], and
//! [`JsonLinesLogger`], which appends each event to a file as one JSON object
//! per line.
//!
//! [`ChatClient`]: crate::ChatClient

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

use serde_json::{Value, json};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::error::{Error, Result};
use crate::types::{ChatRequest, ChatResponse};

/// A trait for logging chat client operations.
///
/// Implementations must not fail the request they observe, so every hook
/// returns `()`.
///
/// # Example
///
/// ```rust
/// use std::sync::Mutex;
/// use chatfront::{ChatRequest, ChatResponse, ClientLogger, Error};
///
/// #[derive(Default)]
/// struct CountingLogger {
///     events: Mutex<usize>,
/// }
///
/// impl ClientLogger for CountingLogger {
///     fn log_request(&self, _: &ChatRequest) {
///         *self.events.lock().unwrap() += 1;
///     }
///     fn log_response(&self, _: &ChatResponse) {
///         *self.events.lock().unwrap() += 1;
///     }
///     fn log_error(&self, _: &ChatRequest, _: &Error) {
///         *self.events.lock().unwrap() += 1;
///     }
/// }
/// ```
pub trait ClientLogger: Send + Sync {
    /// Log an outbound chat request, before it is sent.
    fn log_request(&self, request: &ChatRequest);

    /// Log a successfully decoded chat response.
    fn log_response(&self, response: &ChatResponse);

    /// Log a failed chat request.
    fn log_error(&self, request: &ChatRequest, error: &Error);
}

/// Appends client events to a file as JSON lines.
///
/// Each line carries an RFC 3339 timestamp and an `event` discriminator of
/// `request`, `response` or `error`.
pub struct JsonLinesLogger {
    file: Mutex<File>,
}

impl JsonLinesLogger {
    /// Opens `path` for appending, creating it if necessary.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|err| Error::io(format!("failed to open {}", path.display()), err))?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }

    fn append(&self, mut record: Value) {
        if let Value::Object(map) = &mut record {
            let timestamp = OffsetDateTime::now_utc()
                .format(&Rfc3339)
                .unwrap_or_default();
            map.insert("timestamp".to_string(), Value::String(timestamp));
        }
        // A poisoned lock or full disk drops the record; the request goes on.
        if let Ok(mut file) = self.file.lock() {
            let _ = writeln!(file, "{record}");
        }
    }
}

impl ClientLogger for JsonLinesLogger {
    fn log_request(&self, request: &ChatRequest) {
        self.append(json!({"event": "request", "query": request.query}));
    }

    fn log_response(&self, response: &ChatResponse) {
        self.append(json!({"event": "response", "response": response}));
    }

    fn log_error(&self, request: &ChatRequest, error: &Error) {
        self.append(json!({
            "event": "error",
            "query": request.query,
            "status_code": error.status_code(),
            "error": error.to_string(),
        }));
    }
}

impl std::fmt::Debug for JsonLinesLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonLinesLogger").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_log(name: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!(
            "chatfront-{}-{}.jsonl",
            name,
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);
        path
    }

    #[test]
    fn writes_one_line_per_event() {
        let path = temp_log("events");
        let logger = JsonLinesLogger::open(&path).unwrap();
        let request = ChatRequest::new("Hello");
        logger.log_request(&request);
        logger.log_response(&ChatResponse {
            answer: "Hi there".to_string(),
            confidence: Some(0.9),
            ..ChatResponse::default()
        });
        logger.log_error(&request, &Error::api(500, "Internal server error"));

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<Value> = content
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0]["event"], "request");
        assert_eq!(lines[0]["query"], "Hello");
        assert_eq!(lines[1]["response"]["answer"], "Hi there");
        assert_eq!(lines[2]["status_code"], 500);
        assert!(lines.iter().all(|line| line["timestamp"].is_string()));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn appends_to_existing_file() {
        let path = temp_log("append");
        std::fs::write(&path, "{\"event\":\"earlier\"}\n").unwrap();
        let logger = JsonLinesLogger::open(&path).unwrap();
        logger.log_request(&ChatRequest::new("again"));
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
        let _ = std::fs::remove_file(&path);
    }
}
