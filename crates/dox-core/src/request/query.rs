use super::lifecycle::RequestTicket;
use crate::assistant::{AssistantClient, AssistantReply, AssistantRequest};
use crate::error::{DoxError, Result};
use tokio::sync::mpsc;

/// A question accepted for forwarding, not yet sent.
#[derive(Debug, Clone)]
pub struct PendingQuery {
    ticket: RequestTicket,
    request: AssistantRequest,
}

/// Result of running a [`PendingQuery`], to be handed back to the engine.
#[derive(Debug, Clone)]
pub struct QueryOutcome {
    pub ticket_id: u64,
    pub result: Result<AssistantReply>,
}

impl PendingQuery {
    pub fn new(ticket: RequestTicket, request: AssistantRequest) -> Self {
        Self { ticket, request }
    }

    pub fn ticket(&self) -> &RequestTicket {
        &self.ticket
    }

    pub fn request(&self) -> &AssistantRequest {
        &self.request
    }

    /// Sends the question and waits for the answer or for cancellation.
    ///
    /// With `chunks`, the streaming variant is used and partial text is
    /// forwarded as it arrives. Cancellation wins over a pending response
    /// and yields `DoxError::RequestCancelled`.
    pub async fn run(
        self,
        client: &dyn AssistantClient,
        chunks: Option<mpsc::UnboundedSender<String>>,
    ) -> QueryOutcome {
        let token = self.ticket.token().clone();
        let call = async {
            match &chunks {
                Some(tx) => client.ask_streaming(&self.request, tx).await,
                None => client.ask(&self.request).await,
            }
        };

        let result = tokio::select! {
            biased;
            _ = token.cancelled() => Err(DoxError::RequestCancelled),
            result = call => result,
        };

        QueryOutcome {
            ticket_id: self.ticket.id(),
            result,
        }
    }
}
