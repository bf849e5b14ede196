use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client as ReqwestClient, Response, header};
use serde::Deserialize;
use url::Url;

use crate::chat::ChatConfig;
use crate::client_logger::ClientLogger;
use crate::error::{Error, Result};
use crate::observability::{
    CLIENT_HEALTH_CHECKS, CLIENT_REQUEST_DURATION, CLIENT_REQUEST_ERRORS, CLIENT_REQUEST_TIMEOUTS,
    CLIENT_REQUESTS,
};
use crate::types::{ChatRequest, ChatResponse, HealthStatus};

const CHAT_PATH: &str = "api/chat";
const HEALTH_PATH: &str = "api/health";

/// The backend seam the chat session talks to.
///
/// [`ChatClient`] is the production implementation; tests substitute their own.
#[async_trait::async_trait]
pub trait ChatBackend: Send + Sync {
    /// Ask the backend one question.  A single attempt; failures are returned,
    /// never retried.
    async fn chat(&self, query: &str) -> Result<ChatResponse>;
}

/// Client for the chat-answering service.
#[derive(Clone)]
pub struct ChatClient {
    client: ReqwestClient,
    base_url: Url,
    timeout: Duration,
    logger: Option<Arc<dyn ClientLogger>>,
}

impl ChatClient {
    /// Create a new client from a resolved configuration.
    ///
    /// The base URL and timeout come only from `config`; the client never
    /// consults the environment.
    pub fn new(config: &ChatConfig) -> Result<Self> {
        Self::with_options(config.backend_url.clone(), config.timeout)
    }

    /// Create a new client with an explicit base URL and timeout.
    pub fn with_options(base_url: Url, timeout: Duration) -> Result<Self> {
        let client = ReqwestClient::builder()
            .timeout(timeout)
            .default_headers(default_headers())
            .build()
            .map_err(|e| {
                Error::http_client(
                    format!("Failed to build HTTP client: {}", e),
                    Some(Box::new(e)),
                )
            })?;

        Ok(Self {
            client,
            base_url,
            timeout,
            logger: None,
        })
    }

    /// Attach a logger that observes every chat request.
    pub fn with_logger(mut self, logger: Arc<dyn ClientLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// The base URL requests are resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    fn map_send_error(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::timeout(
                format!("timeout of {}ms exceeded", self.timeout.as_millis()),
                Some(self.timeout.as_secs_f64()),
            )
        } else if e.is_connect() {
            Error::connection("Network Error", Some(Box::new(e)))
        } else {
            Error::http_client(format!("Request failed: {}", e), Some(Box::new(e)))
        }
    }

    /// Process an error response and convert it to our Error type.
    ///
    /// The message prefers a string `detail` from the body, which is what the
    /// backend's framework produces for raised HTTP errors.
    async fn process_error_response(response: Response) -> Error {
        let status_code = response.status().as_u16();

        #[derive(Deserialize)]
        struct ErrorResponse {
            detail: Option<serde_json::Value>,
        }

        let fallback = format!("Request failed with status code {status_code}");
        let message = match response.text().await {
            Ok(body) => serde_json::from_str::<ErrorResponse>(&body)
                .ok()
                .and_then(|e| e.detail)
                .and_then(|detail| match detail {
                    serde_json::Value::String(detail) if !detail.trim().is_empty() => {
                        Some(detail)
                    }
                    _ => None,
                })
                .unwrap_or(fallback),
            Err(_) => fallback,
        };
        Error::api(status_code, message)
    }

    async fn post_chat(&self, request: &ChatRequest) -> Result<ChatResponse> {
        let url = self.endpoint(CHAT_PATH)?;

        let response = self
            .client
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        if !response.status().is_success() {
            return Err(Self::process_error_response(response).await);
        }

        response.json::<ChatResponse>().await.map_err(|e| {
            if e.is_timeout() {
                self.map_send_error(e)
            } else {
                Error::serialization(
                    format!("Failed to parse response: {}", e),
                    Some(Box::new(e)),
                )
            }
        })
    }

    /// Send one query to `POST /api/chat`.
    pub async fn chat(&self, query: &str) -> Result<ChatResponse> {
        let request = ChatRequest::new(query);
        if let Some(logger) = &self.logger {
            logger.log_request(&request);
        }

        CLIENT_REQUESTS.click();
        let start = Instant::now();
        let result = self.post_chat(&request).await;
        CLIENT_REQUEST_DURATION.add(start.elapsed().as_secs_f64());

        match &result {
            Ok(response) => {
                if let Some(logger) = &self.logger {
                    logger.log_response(response);
                }
            }
            Err(err) => {
                CLIENT_REQUEST_ERRORS.click();
                if err.is_timeout() {
                    CLIENT_REQUEST_TIMEOUTS.click();
                }
                if let Some(logger) = &self.logger {
                    logger.log_error(&request, err);
                }
            }
        }
        result
    }

    /// Probe `GET /api/health`.
    pub async fn health(&self) -> Result<HealthStatus> {
        CLIENT_HEALTH_CHECKS.click();
        let url = self.endpoint(HEALTH_PATH)?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        if !response.status().is_success() {
            return Err(Self::process_error_response(response).await);
        }

        response.json::<HealthStatus>().await.map_err(|e| {
            Error::serialization(
                format!("Failed to parse health response: {}", e),
                Some(Box::new(e)),
            )
        })
    }
}

#[async_trait::async_trait]
impl ChatBackend for ChatClient {
    async fn chat(&self, query: &str) -> Result<ChatResponse> {
        ChatClient::chat(self, query).await
    }
}

impl std::fmt::Debug for ChatClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatClient")
            .field("base_url", &self.base_url.as_str())
            .field("timeout", &self.timeout)
            .field("logger", &self.logger.is_some())
            .finish()
    }
}

/// Create and return default headers for API requests.
fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
    headers
}
