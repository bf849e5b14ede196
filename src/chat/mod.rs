//! Chat application module for interactive conversations with the backend.
//!
//! This module provides the REPL-facing half of chatfront, built on top of
//! the [`ChatClient`](crate::ChatClient).  It supports:
//!
//! - A session that owns history and an idle/loading/error request status
//! - An input control with trim, optimistic clear and disable-while-loading
//! - Pure rendering of message bubbles and the full message list
//! - Slash commands for session control
//! - Layered configuration from flags, environment and a YAML file
//!
//! # Architecture
//!
//! - [`config`]: CLI argument parsing and configuration
//! - [`session`]: Core chat session management and backend interaction
//! - [`input`]: The draft/submit rules of the input control
//! - [`view`]: Pure functions from chat state to text
//! - [`commands`]: Slash command parsing and handling
//! - [`health`]: Backend health reporting at startup and on `/health`

mod commands;
mod config;
mod health;
mod input;
mod session;
pub mod view;

pub use crate::render::{NullRenderer, PlainTextRenderer, Renderer};
pub use commands::{ChatCommand, help_text, parse_command};
pub use config::{
    BACKEND_URL_ENV, ChatArgs, ChatConfig, ChatConfigFile, DEFAULT_BACKEND_URL, DEFAULT_TIMEOUT,
    parse_backend_url,
};
pub use health::check_backend;
pub use input::InputBox;
pub use session::{ChatFailure, ChatSession, FALLBACK_ERROR_MESSAGE, SessionStats};
