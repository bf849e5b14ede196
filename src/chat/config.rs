//! Configuration types for the chat application.
//!
//! This module provides CLI argument parsing via `arrrg`, an optional YAML
//! configuration file, and the resolved [`ChatConfig`] that the client and the
//! REPL are constructed from.  Values are layered with the precedence
//! command line > environment > file > built-in default.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use arrrg_derive::CommandLine;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Error, Result};

/// Backend used when nothing else is configured.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

/// Environment variable consulted for the backend URL.
pub const BACKEND_URL_ENV: &str = "CHATFRONT_BACKEND_URL";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(20_000);

/// Default banner printed when the REPL starts.
const DEFAULT_TITLE: &str = "Chatbot";

/// Command-line arguments for the chatfront tool.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct ChatArgs {
    /// Base URL of the chat backend.
    #[arrrg(optional, "Backend base URL (default: http://localhost:8000)", "URL")]
    pub backend_url: Option<String>,

    /// Request timeout in milliseconds.
    #[arrrg(optional, "Request timeout in milliseconds (default: 20000)", "MS")]
    pub timeout_ms: Option<u64>,

    /// YAML file with default settings.
    #[arrrg(optional, "YAML configuration file", "FILE")]
    pub config: Option<String>,

    /// File that receives one JSON line per client event.
    #[arrrg(optional, "Append client events as JSON lines to FILE", "FILE")]
    pub log_file: Option<String>,

    /// Banner shown at startup.
    #[arrrg(optional, "Title shown at startup", "TITLE")]
    pub title: Option<String>,

    /// Disable ANSI colors and styles.
    #[arrrg(flag, "Disable ANSI colors/styles")]
    pub no_color: bool,
}

/// Settings that may be read from a YAML configuration file.
///
/// Every field is optional; absent fields fall through to the defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ChatConfigFile {
    /// Base URL of the chat backend.
    #[serde(default)]
    pub backend_url: Option<String>,

    /// Request timeout in milliseconds.
    #[serde(default)]
    pub timeout_ms: Option<u64>,

    /// Whether to use ANSI colors.
    #[serde(default)]
    pub color: Option<bool>,

    /// JSON-lines client log.
    #[serde(default)]
    pub log_file: Option<PathBuf>,

    /// Banner shown at startup.
    #[serde(default)]
    pub title: Option<String>,
}

impl ChatConfigFile {
    /// Reads and parses a configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|err| {
            Error::io(
                format!("failed to read config file {}", path.display()),
                err,
            )
        })?;
        Self::from_yaml(&content)
    }

    /// Parses configuration from YAML text.
    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }
}

/// Resolved configuration for a chat session.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatConfig {
    /// Base URL of the backend; always ends in `/`.
    pub backend_url: Url,

    /// Per-request timeout.
    pub timeout: Duration,

    /// Whether to use ANSI colors and styles in output.
    pub use_color: bool,

    /// Optional JSON-lines client log.
    pub log_path: Option<PathBuf>,

    /// Banner shown at startup.
    pub title: String,
}

impl ChatConfig {
    /// Creates a new ChatConfig with default values.
    ///
    /// Defaults:
    /// - Backend: http://localhost:8000
    /// - Timeout: 20 seconds
    /// - Color: enabled
    /// - Client log: disabled
    pub fn new() -> Self {
        Self {
            backend_url: default_backend_url(),
            timeout: DEFAULT_TIMEOUT,
            use_color: true,
            log_path: None,
            title: DEFAULT_TITLE.to_string(),
        }
    }

    /// Sets the backend URL, normalizing it so that endpoint paths join under it.
    pub fn with_backend_url(mut self, backend_url: &str) -> Result<Self> {
        self.backend_url = parse_backend_url(backend_url)?;
        Ok(self)
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Disables ANSI color output.
    pub fn without_color(mut self) -> Self {
        self.use_color = false;
        self
    }

    /// Sets the client log path.
    pub fn with_log_path(mut self, path: Option<PathBuf>) -> Self {
        self.log_path = path;
        self
    }

    /// Sets the startup banner.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Layers command-line arguments, the backend URL taken from the
    /// environment, and the optional configuration file named by the arguments.
    pub fn resolve(args: ChatArgs, env_backend_url: Option<String>) -> Result<Self> {
        let file = match args.config.as_deref() {
            Some(path) => ChatConfigFile::from_file(path)?,
            None => ChatConfigFile::default(),
        };
        Self::layer(args, env_backend_url, file)
    }

    /// Layers already-loaded sources; see [`ChatConfig::resolve`].
    pub fn layer(
        args: ChatArgs,
        env_backend_url: Option<String>,
        file: ChatConfigFile,
    ) -> Result<Self> {
        let mut config = ChatConfig::new();

        let env_backend_url = env_backend_url.filter(|url| !url.trim().is_empty());
        if let Some(url) = args
            .backend_url
            .or(env_backend_url)
            .or(file.backend_url)
        {
            config = config.with_backend_url(&url)?;
        }

        if let Some(timeout_ms) = args.timeout_ms.or(file.timeout_ms) {
            if timeout_ms == 0 {
                return Err(Error::config(
                    "timeout must be positive",
                    Some("timeout_ms".to_string()),
                ));
            }
            config = config.with_timeout(Duration::from_millis(timeout_ms));
        }

        if args.no_color || file.color == Some(false) {
            config = config.without_color();
        }

        config = config.with_log_path(args.log_file.map(PathBuf::from).or(file.log_file));

        if let Some(title) = args.title.or(file.title) {
            config = config.with_title(title);
        }

        Ok(config)
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn default_backend_url() -> Url {
    Url::parse(DEFAULT_BACKEND_URL)
        .map(ensure_trailing_slash)
        .expect("default backend URL should be valid")
}

/// Parses a backend base URL, accepting only http and https.
pub fn parse_backend_url(input: &str) -> Result<Url> {
    let url = Url::parse(input.trim())?;
    match url.scheme() {
        "http" | "https" => Ok(ensure_trailing_slash(url)),
        scheme => Err(Error::config(
            format!("unsupported URL scheme '{scheme}'"),
            Some("backend_url".to_string()),
        )),
    }
}

fn ensure_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
