//! Pure rendering of chat state into terminal text.
//!
//! Nothing here holds state: the same history, status and color setting
//! always produce the same text.  The [`Renderer`](crate::Renderer)
//! implementations use these functions to print incremental rows, and the
//! `/history` command uses [`render_message_list`] to redraw everything.

use crate::types::{Message, MessageRole, RequestStatus};

/// Text of the transient row shown while a request is in flight.
pub const LOADING_TEXT: &str = "Thinking…";

const ANSI_BOLD: &str = "\x1b[1m";
const ANSI_DIM: &str = "\x1b[2m";
const ANSI_RESET: &str = "\x1b[0m";
const ANSI_BLUE: &str = "\x1b[34m";
const ANSI_GREEN: &str = "\x1b[32m";
const ANSI_RED: &str = "\x1b[31m";

/// Wraps `text` in an ANSI style when color is enabled.
pub(crate) fn paint(text: &str, style: &str, use_color: bool) -> String {
    if use_color {
        format!("{style}{text}{ANSI_RESET}")
    } else {
        text.to_string()
    }
}

/// Formats a confidence score as a percentage badge, e.g. `conf 90%`.
///
/// Rounds halves up.  Returns `None` for non-finite scores.
pub fn confidence_badge(confidence: f64) -> Option<String> {
    if !confidence.is_finite() {
        return None;
    }
    let percent = (confidence * 100.0 + 0.5).floor();
    Some(format!("conf {percent:.0}%"))
}

/// The compact citation line of an assistant message, if it cites anything.
pub fn citation_line(message: &Message) -> Option<String> {
    let sources = message.citations();
    if sources.is_empty() {
        return None;
    }
    let mut line = format!("Sources: {}", sources.join(", "));
    if let Some(badge) = message.confidence.and_then(confidence_badge) {
        line.push_str(&format!(" [{badge}]"));
    }
    Some(line)
}

fn role_label(role: MessageRole, use_color: bool) -> String {
    match role {
        MessageRole::User => paint("You:", &format!("{ANSI_BOLD}{ANSI_BLUE}"), use_color),
        MessageRole::Assistant => paint(
            "Assistant:",
            &format!("{ANSI_BOLD}{ANSI_GREEN}"),
            use_color,
        ),
    }
}

/// Renders one message bubble.
///
/// The content is reproduced verbatim, line breaks included.  Assistant
/// messages add their bullets and citation line; user messages never do.
pub fn render_message(message: &Message, use_color: bool) -> String {
    let mut out = String::new();
    out.push_str(&role_label(message.role, use_color));
    out.push('\n');
    out.push_str(&message.content);
    if !message.content.ends_with('\n') {
        out.push('\n');
    }
    for bullet in message.bullets() {
        out.push_str("  • ");
        out.push_str(bullet);
        out.push('\n');
    }
    if let Some(line) = citation_line(message) {
        out.push_str(&paint(&line, ANSI_DIM, use_color));
        out.push('\n');
    }
    out
}

/// The transient row for a status, if the status has one.
pub fn render_status_row(status: &RequestStatus, use_color: bool) -> Option<String> {
    match status {
        RequestStatus::Idle => None,
        RequestStatus::Loading => Some(paint(LOADING_TEXT, ANSI_DIM, use_color)),
        RequestStatus::Error(message) => Some(render_error_row(message, use_color)),
    }
}

/// Formats an error row.
pub fn render_error_row(message: &str, use_color: bool) -> String {
    paint(&format!("Error: {message}"), ANSI_RED, use_color)
}

/// Renders the full history followed by the loading or error row.
pub fn render_message_list(messages: &[Message], status: &RequestStatus, use_color: bool) -> String {
    let mut rows: Vec<String> = messages
        .iter()
        .map(|message| render_message(message, use_color))
        .collect();
    if let Some(row) = render_status_row(status, use_color) {
        rows.push(format!("{row}\n"));
    }
    rows.join("\n")
}
