//! Interpretation layer of the dox documentation-assistant terminal.
//!
//! Front-ends drive a [`TerminalEngine`]: built-in commands are handled
//! locally, everything else becomes a query for an [`AssistantClient`], and
//! answers are parsed into [`markup::Block`]s for display.

pub mod assistant;
pub mod command;
pub mod config;
pub mod engine;
pub mod error;
pub mod history;
pub mod markup;
pub mod request;
pub mod session;
pub mod theme;

// Re-export the types every front-end touches
pub use assistant::{AssistantClient, AssistantReply, AssistantRequest};
pub use engine::{Submission, TerminalEngine};
pub use error::{DoxError, Result};
