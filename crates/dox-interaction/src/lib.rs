//! HTTP client for the dox assistant service.

pub mod http_assistant;
pub mod sse;

pub use http_assistant::HttpAssistant;
pub use sse::SseDecoder;
