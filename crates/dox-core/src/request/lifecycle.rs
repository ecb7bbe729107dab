use crate::assistant::AssistantReply;
use crate::error::{DoxError, Result};
use crate::history::Transcript;
use tokio_util::sync::CancellationToken;

/// Notice appended when the user cancels an in-flight request.
pub const CANCELLED_NOTICE: &str = "Request cancelled by user.";

/// Message used when a failure carries no usable description.
pub const FALLBACK_FAILURE: &str = "Failed to get explanation";

/// Handle for one forwarded request.
#[derive(Debug, Clone)]
pub struct RequestTicket {
    id: u64,
    token: CancellationToken,
}

impl RequestTicket {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// State of the request slot.
#[derive(Debug, Clone, Default)]
pub enum RequestState {
    #[default]
    Idle,
    Loading {
        ticket: RequestTicket,
    },
}

impl RequestState {
    pub fn is_loading(&self) -> bool {
        matches!(self, RequestState::Loading { .. })
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, RequestState::Idle)
    }
}

/// What happened to a finished request.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// The answer was appended as a response entry.
    Answered(AssistantReply),
    /// The failure was appended as an error entry.
    Failed(String),
    /// The request was cancelled; nothing was appended.
    Cancelled,
    /// The result belonged to a superseded or cancelled ticket and was dropped.
    Discarded,
}

/// Tracks the single in-flight request and applies its outcome.
#[derive(Debug, Default)]
pub struct RequestController {
    state: RequestState,
    next_id: u64,
    last_error: Option<String>,
}

impl RequestController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &RequestState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    /// Message of the most recent failure, cleared when the next request starts.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Enters `Loading` with a fresh ticket.
    ///
    /// A request that is still loading is cancelled first, so its result can
    /// never be applied.
    pub fn begin(&mut self) -> RequestTicket {
        if let RequestState::Loading { ticket } = &self.state {
            tracing::warn!("Superseding in-flight request {}", ticket.id);
            ticket.token.cancel();
        }

        self.last_error = None;
        self.next_id += 1;
        let ticket = RequestTicket {
            id: self.next_id,
            token: CancellationToken::new(),
        };
        tracing::debug!("Request {} started", ticket.id);
        self.state = RequestState::Loading {
            ticket: ticket.clone(),
        };
        ticket
    }

    /// Cancels the in-flight request, if any.
    ///
    /// With `notice`, a response entry saying the request was cancelled is
    /// appended. Returns `false` and changes nothing when idle.
    pub fn cancel(&mut self, transcript: &mut Transcript, notice: bool) -> bool {
        let RequestState::Loading { ticket } = &self.state else {
            return false;
        };

        tracing::info!("Request {} cancelled by user", ticket.id);
        ticket.token.cancel();
        self.state = RequestState::Idle;
        if notice {
            transcript.push_response(CANCELLED_NOTICE);
        }
        true
    }

    /// Applies the result of the request identified by `ticket_id`.
    ///
    /// Only the current, uncancelled ticket may append to the transcript.
    pub fn complete(
        &mut self,
        ticket_id: u64,
        result: Result<AssistantReply>,
        transcript: &mut Transcript,
    ) -> Resolution {
        let current = match &self.state {
            RequestState::Loading { ticket } => ticket.id == ticket_id && !ticket.is_cancelled(),
            _ => false,
        };
        if !current {
            tracing::debug!("Discarding result of stale request {}", ticket_id);
            return Resolution::Discarded;
        }

        match result {
            Ok(reply) => {
                tracing::debug!("Request {} answered", ticket_id);
                self.state = RequestState::Idle;
                transcript.push_response(reply.explanation.clone());
                Resolution::Answered(reply)
            }
            Err(DoxError::RequestCancelled) => {
                self.state = RequestState::Idle;
                Resolution::Cancelled
            }
            Err(err) => {
                let message = failure_message(&err);
                tracing::warn!("Request {} failed: {}", ticket_id, message);
                transcript.push_error(format!("Error: {message}"));
                self.state = RequestState::Idle;
                self.last_error = Some(message.clone());
                Resolution::Failed(message)
            }
        }
    }
}

fn failure_message(err: &DoxError) -> String {
    let message = err.to_string();
    if message.trim().is_empty() {
        FALLBACK_FAILURE.to_string()
    } else {
        message
    }
}
