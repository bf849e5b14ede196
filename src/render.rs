//! Output rendering for the chat application.
//!
//! This module provides a trait-based rendering abstraction so the session
//! can report progress without knowing where the output goes.  The default
//! implementation prints to the terminal, with ANSI styling unless disabled.

use std::io::{self, Stdout, Write};

use crate::chat::view::{LOADING_TEXT, paint, render_error_row, render_message};
use crate::types::Message;

/// ANSI escape code for dim text (used for the loading row and info lines).
const ANSI_DIM: &str = "\x1b[2m";

/// Carriage return plus erase-line, used to retract the loading row.
const ANSI_CLEAR_LINE: &str = "\r\x1b[2K";

/// Trait for rendering chat output.
///
/// This abstraction allows for different rendering strategies:
/// - Plain text with ANSI styling
/// - Plain text without styling (for piping/redirecting)
/// - Silent or recording renderers for embedding and tests
pub trait Renderer: Send {
    /// Print a message bubble that was just appended to the history.
    fn print_message(&mut self, message: &Message);

    /// Show the loading row while a request is in flight.
    fn print_loading(&mut self);

    /// Retract the loading row once the request settles.
    fn clear_loading(&mut self) {}

    /// Print an error row.
    fn print_error(&mut self, error: &str);

    /// Print an informational message.
    fn print_info(&mut self, info: &str);
}

/// Plain text renderer with optional ANSI styling.
///
/// This renderer outputs text directly to stdout; errors go to stderr.
pub struct PlainTextRenderer {
    stdout: Stdout,
    use_color: bool,
    loading_shown: bool,
}

impl PlainTextRenderer {
    /// Creates a new PlainTextRenderer with ANSI colors enabled.
    pub fn new() -> Self {
        Self::with_color(true)
    }

    /// Creates a new PlainTextRenderer with specified color setting.
    pub fn with_color(use_color: bool) -> Self {
        Self {
            stdout: io::stdout(),
            use_color,
            loading_shown: false,
        }
    }

    /// Whether ANSI styling is enabled.
    pub fn use_color(&self) -> bool {
        self.use_color
    }

    /// Flushes stdout to ensure immediate display.
    fn flush(&mut self) {
        let _ = self.stdout.flush();
    }
}

impl Default for PlainTextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Text that returns the cursor to column zero and blanks the loading row.
fn loading_eraser(use_color: bool) -> String {
    if use_color {
        ANSI_CLEAR_LINE.to_string()
    } else {
        format!("\r{}\r", " ".repeat(LOADING_TEXT.chars().count()))
    }
}

impl Renderer for PlainTextRenderer {
    fn print_message(&mut self, message: &Message) {
        self.clear_loading();
        print!("{}", render_message(message, self.use_color));
        println!();
        self.flush();
    }

    fn print_loading(&mut self) {
        print!("{}", paint(LOADING_TEXT, ANSI_DIM, self.use_color));
        self.loading_shown = true;
        self.flush();
    }

    fn clear_loading(&mut self) {
        if !self.loading_shown {
            return;
        }
        print!("{}", loading_eraser(self.use_color));
        self.loading_shown = false;
        self.flush();
    }

    fn print_error(&mut self, error: &str) {
        self.clear_loading();
        eprintln!("{}", render_error_row(error, self.use_color));
    }

    fn print_info(&mut self, info: &str) {
        self.clear_loading();
        println!("{info}");
        self.flush();
    }
}

/// A renderer that discards everything.
///
/// Useful when driving a session programmatically and reading its state
/// afterwards.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn print_message(&mut self, _: &Message) {}

    fn print_loading(&mut self) {}

    fn print_error(&mut self, _: &str) {}

    fn print_info(&mut self, _: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renderer_default_has_color() {
        let renderer = PlainTextRenderer::new();
        assert!(renderer.use_color());
    }

    #[test]
    fn renderer_without_color() {
        let renderer = PlainTextRenderer::with_color(false);
        assert!(!renderer.use_color());
    }

    #[test]
    fn plain_eraser_overwrites_loading_row() {
        let eraser = loading_eraser(false);
        assert!(!eraser.contains('\n'));
        assert!(!eraser.contains('\x1b'));
        assert!(eraser.starts_with('\r'));
        assert!(eraser.ends_with('\r'));
        assert_eq!(eraser.trim_matches('\r').len(), LOADING_TEXT.chars().count());
        assert!(eraser.trim_matches('\r').chars().all(|c| c == ' '));
        assert_eq!(loading_eraser(true), ANSI_CLEAR_LINE);
    }

    #[test]
    fn loading_is_cleared_once() {
        let mut renderer = PlainTextRenderer::with_color(false);
        renderer.print_loading();
        assert!(renderer.loading_shown);
        renderer.clear_loading();
        assert!(!renderer.loading_shown);
        renderer.clear_loading();
        assert!(!renderer.loading_shown);
    }
}
