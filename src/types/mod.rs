// Public modules
pub mod chat_request;
pub mod chat_response;
pub mod health;
pub mod message;
pub mod request_status;

// Re-exports
pub use chat_request::ChatRequest;
pub use chat_response::{ChatResponse, StructuredAnswer};
pub use health::HealthStatus;
pub use message::{Message, MessageRole};
pub use request_status::RequestStatus;
