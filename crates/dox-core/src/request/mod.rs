//! Lifecycle of questions forwarded to the assistant.
//!
//! At most one request is in flight. Each request gets a [`RequestTicket`]
//! carrying a cancellation token; results arriving for a ticket that is no
//! longer current are discarded without touching the transcript.

mod lifecycle;
mod query;

pub use lifecycle::{
    CANCELLED_NOTICE, FALLBACK_FAILURE, RequestController, RequestState, RequestTicket, Resolution,
};
pub use query::{PendingQuery, QueryOutcome};
