//! HttpAssistant - JSON-over-HTTP implementation of [`AssistantClient`].
//!
//! Questions are POSTed as `{ query, sessionId }` to the configured endpoint.
//! Non-2xx responses carry `{ error }`; the streaming variant answers with
//! `text/event-stream` events of `{ chunk }` or `{ error }`.

use crate::sse::{DONE_MARKER, SseDecoder};
use async_trait::async_trait;
use dox_core::assistant::{
    AssistantClient, AssistantReply, AssistantRequest, ClearMemoryReply, ClearMemoryRequest,
    ErrorPayload, StreamEvent,
};
use dox_core::config::AssistantSettings;
use dox_core::error::{DoxError, Result};
use dox_core::request::FALLBACK_FAILURE;
use futures::StreamExt;
use reqwest::{Client, Response, header};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio::sync::mpsc;

/// Client for the assistant service.
#[derive(Debug, Clone)]
pub struct HttpAssistant {
    client: Client,
    endpoint: String,
}

impl HttpAssistant {
    pub fn new(settings: &AssistantSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| DoxError::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: settings.endpoint.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn post<B: serde::Serialize + ?Sized>(&self, body: &B, accept: &str) -> Result<Response> {
        let response = self
            .client
            .post(&self.endpoint)
            .header(header::ACCEPT, accept)
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        tracing::debug!("Assistant responded with {}", status);
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = error_message(&body);
        tracing::warn!("Assistant request failed with {}: {}", status, message);
        Err(DoxError::assistant_status(status.as_u16(), message))
    }

    async fn post_json<B, T>(&self, body: &B) -> Result<T>
    where
        B: serde::Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.post(body, "application/json").await?;
        let status = response.status();
        response.json::<T>().await.map_err(|e| {
            DoxError::assistant_status(
                status.as_u16(),
                format!("Malformed assistant response: {}", e),
            )
        })
    }
}

#[async_trait]
impl AssistantClient for HttpAssistant {
    async fn ask(&self, request: &AssistantRequest) -> Result<AssistantReply> {
        tracing::info!("Asking assistant at {}", self.endpoint);
        self.post_json(request).await
    }

    async fn ask_streaming(
        &self,
        request: &AssistantRequest,
        chunks: &mpsc::UnboundedSender<String>,
    ) -> Result<AssistantReply> {
        tracing::info!("Streaming from assistant at {}", self.endpoint);
        let response = self.post(request, "text/event-stream").await?;

        // Servers without streaming support answer with the plain JSON reply.
        let is_event_stream = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("text/event-stream"));
        if !is_event_stream {
            let reply: AssistantReply = response
                .json()
                .await
                .map_err(|e| DoxError::assistant(format!("Malformed assistant response: {}", e)))?;
            let _ = chunks.send(reply.explanation.clone());
            return Ok(reply);
        }

        let mut stream = response.bytes_stream();
        let mut decoder = SseDecoder::new();
        let mut explanation = String::new();

        while let Some(bytes) = stream.next().await {
            let bytes = bytes.map_err(transport_error)?;
            for payload in decoder.push_bytes(&bytes) {
                apply_event(&payload, &mut explanation, chunks)?;
            }
        }
        if let Some(payload) = decoder.finish() {
            apply_event(&payload, &mut explanation, chunks)?;
        }

        Ok(AssistantReply::new(explanation, request.session_id.clone()))
    }

    async fn clear_memory(&self, session_id: &str) -> Result<ClearMemoryReply> {
        tracing::info!("Clearing assistant memory of session {}", session_id);
        self.post_json(&ClearMemoryRequest::new(session_id)).await
    }
}

fn apply_event(
    payload: &str,
    explanation: &mut String,
    chunks: &mpsc::UnboundedSender<String>,
) -> Result<()> {
    if payload.trim() == DONE_MARKER {
        return Ok(());
    }

    match serde_json::from_str::<StreamEvent>(payload) {
        Ok(StreamEvent::Chunk { chunk }) => {
            explanation.push_str(&chunk);
            let _ = chunks.send(chunk);
            Ok(())
        }
        Ok(StreamEvent::Error { error }) => Err(DoxError::assistant(error)),
        Err(e) => {
            tracing::debug!("Skipping unrecognised stream event: {}", e);
            Ok(())
        }
    }
}

/// Extracts the message of an `{ error }` body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorPayload>(body)
        .ok()
        .map(|payload| payload.error)
        .filter(|error| !error.trim().is_empty())
        .unwrap_or_else(|| FALLBACK_FAILURE.to_string())
}

fn transport_error(err: reqwest::Error) -> DoxError {
    if err.is_timeout() {
        return DoxError::assistant("Request timed out");
    }
    match err.status() {
        Some(status) => DoxError::assistant_status(status.as_u16(), err.to_string()),
        None if err.is_connect() => DoxError::assistant(format!("Could not reach assistant: {}", err)),
        None => DoxError::assistant(err.to_string()),
    }
}
