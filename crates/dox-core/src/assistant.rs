//! Boundary with the external answer-generation service.
//!
//! The wire types mirror the service contract: a query with an optional
//! session id in, an explanation with the session id out, or an `{ error }`
//! payload on failure. A streaming variant delivers `{ chunk }` events.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// A question forwarded to the assistant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantRequest {
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

impl AssistantRequest {
    pub fn new(query: impl Into<String>, session_id: Option<String>) -> Self {
        Self {
            query: query.into(),
            session_id,
        }
    }
}

/// A successful answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantReply {
    pub explanation: String,
    /// Session the service filed the exchange under.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

impl AssistantReply {
    pub fn new(explanation: impl Into<String>, session_id: Option<String>) -> Self {
        Self {
            explanation: explanation.into(),
            session_id,
        }
    }
}

/// Body returned with a non-2xx status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub error: String,
}

/// One event of the streaming variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StreamEvent {
    Chunk { chunk: String },
    Error { error: String },
}

/// Request asking the service to forget a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearMemoryRequest {
    pub action: String,
    pub session_id: String,
}

impl ClearMemoryRequest {
    pub const ACTION: &'static str = "clearMemory";

    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            action: Self::ACTION.to_string(),
            session_id: session_id.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearMemoryReply {
    pub success: bool,
    pub message: String,
}

/// Client for the external assistant.
///
/// Implementations report failures as `DoxError::AssistantRequestFailed`.
#[async_trait]
pub trait AssistantClient: Send + Sync {
    /// Sends one question and waits for the whole answer.
    async fn ask(&self, request: &AssistantRequest) -> Result<AssistantReply>;

    /// Sends one question, forwarding partial text to `chunks` as it arrives.
    ///
    /// The returned reply carries the full concatenated answer. The default
    /// implementation delivers the whole answer as a single chunk.
    async fn ask_streaming(
        &self,
        request: &AssistantRequest,
        chunks: &mpsc::UnboundedSender<String>,
    ) -> Result<AssistantReply> {
        let reply = self.ask(request).await?;
        let _ = chunks.send(reply.explanation.clone());
        Ok(reply)
    }

    /// Asks the service to drop its memory of `session_id`.
    async fn clear_memory(&self, session_id: &str) -> Result<ClearMemoryReply>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_wire_shape() {
        let request = AssistantRequest::new("what is a trait?", Some("abc".to_string()));
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({ "query": "what is a trait?", "sessionId": "abc" })
        );

        let anonymous = AssistantRequest::new("hi", None);
        assert_eq!(serde_json::to_value(&anonymous).unwrap(), json!({ "query": "hi" }));
    }

    #[test]
    fn test_reply_without_session_id() {
        let reply: AssistantReply =
            serde_json::from_value(json!({ "explanation": "Traits are..." })).unwrap();
        assert_eq!(reply, AssistantReply::new("Traits are...", None));
    }

    #[test]
    fn test_stream_events() {
        let chunk: StreamEvent = serde_json::from_str(r#"{"chunk":"Hel"}"#).unwrap();
        assert_eq!(chunk, StreamEvent::Chunk { chunk: "Hel".to_string() });

        let error: StreamEvent = serde_json::from_str(r#"{"error":"overloaded"}"#).unwrap();
        assert_eq!(error, StreamEvent::Error { error: "overloaded".to_string() });
    }

    #[test]
    fn test_clear_memory_wire_shape() {
        assert_eq!(
            serde_json::to_value(ClearMemoryRequest::new("abc")).unwrap(),
            json!({ "action": "clearMemory", "sessionId": "abc" })
        );
    }
}
