//! The terminal engine.
//!
//! One [`TerminalEngine`] per terminal. It owns the transcript, theme store,
//! session store and request controller, and is the single place they are
//! mutated. Network calls happen outside the engine: [`TerminalEngine::submit`]
//! hands back a [`PendingQuery`] to run, and its [`QueryOutcome`] comes back
//! through [`TerminalEngine::finish`].

use crate::assistant::AssistantRequest;
use crate::command::{AppInfo, CommandInterpreter};
use crate::config::TerminalConfig;
use crate::history::{HistoryEntry, Transcript};
use crate::markup::{Document, MarkupParser};
use crate::request::{PendingQuery, QueryOutcome, RequestController, RequestState, Resolution};
use crate::session::{SessionStore, Turn};
use crate::theme::ThemeStore;

/// What became of one submitted line.
#[derive(Debug)]
pub enum Submission {
    /// Blank input; nothing was recorded.
    Ignored,
    /// A built-in command ran locally.
    Handled,
    /// The line must be sent to the assistant.
    Forwarded(PendingQuery),
}

pub struct TerminalEngine {
    config: TerminalConfig,
    transcript: Transcript,
    theme: ThemeStore,
    sessions: SessionStore,
    session_id: String,
    interpreter: CommandInterpreter,
    controller: RequestController,
    parser: MarkupParser,
}

impl TerminalEngine {
    /// Creates an engine whose transcript starts with the welcome banner.
    pub fn new(config: TerminalConfig, theme: ThemeStore, info: AppInfo) -> Self {
        let banner = welcome_banner(&info.version);
        Self {
            parser: MarkupParser::new(config.markup.clone()),
            config,
            transcript: Transcript::with_banner(banner),
            theme,
            sessions: SessionStore::new(),
            session_id: SessionStore::new_session_id(),
            interpreter: CommandInterpreter::new(info),
            controller: RequestController::new(),
        }
    }

    /// Continues an existing assistant session instead of a fresh one.
    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = session_id.into();
        self
    }

    /// Records `input` and either handles it locally or prepares a query.
    ///
    /// The command entry is appended before anything else happens, so it
    /// always precedes the entries produced by the input.
    pub fn submit(&mut self, input: &str) -> Submission {
        let input = input.trim();
        if input.is_empty() {
            return Submission::Ignored;
        }

        self.transcript.push_command(input);
        if self
            .interpreter
            .interpret(input, &mut self.theme, &mut self.transcript)
        {
            return Submission::Handled;
        }

        self.sessions.append_human(Some(self.session_id.as_str()), input);
        let ticket = self.controller.begin();
        tracing::info!("Forwarding query as request {}", ticket.id());
        Submission::Forwarded(PendingQuery::new(
            ticket,
            AssistantRequest::new(input, Some(self.session_id.clone())),
        ))
    }

    /// Applies the outcome of a query started by [`submit`](Self::submit).
    pub fn finish(&mut self, outcome: QueryOutcome) -> Resolution {
        let resolution =
            self.controller
                .complete(outcome.ticket_id, outcome.result, &mut self.transcript);

        if let Resolution::Answered(reply) = &resolution {
            if let Some(server_id) = reply
                .session_id
                .as_deref()
                .filter(|id| !id.is_empty() && *id != self.session_id)
            {
                tracing::debug!("Assistant moved session {} to {}", self.session_id, server_id);
                self.sessions.rename(&self.session_id, server_id);
                self.session_id = server_id.to_string();
            }
            self.sessions
                .append_assistant(Some(self.session_id.as_str()), &reply.explanation);
        }
        resolution
    }

    /// Cancels the in-flight query. Returns `false` when nothing was loading.
    pub fn cancel(&mut self) -> bool {
        self.controller
            .cancel(&mut self.transcript, self.config.cancel_notice)
    }

    /// Drops the current session and starts a new one.
    ///
    /// Returns the forgotten id so the caller can ask the assistant to clear
    /// its memory of it.
    pub fn forget_session(&mut self) -> String {
        self.sessions.clear(Some(self.session_id.as_str()));
        let forgotten =
            std::mem::replace(&mut self.session_id, SessionStore::new_session_id());
        tracing::info!("Forgot session {}", forgotten);
        forgotten
    }

    /// Parses the content of a transcript entry for display.
    pub fn parse(&self, content: &str) -> Document {
        self.parser.parse_document(content)
    }

    pub fn config(&self) -> &TerminalConfig {
        &self.config
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        self.transcript.entries()
    }

    pub fn theme(&self) -> &ThemeStore {
        &self.theme
    }

    pub fn theme_mut(&mut self) -> &mut ThemeStore {
        &mut self.theme
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn turns(&self) -> &[Turn] {
        self.sessions.turns(Some(self.session_id.as_str()))
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub fn request_state(&self) -> &RequestState {
        self.controller.state()
    }

    pub fn is_loading(&self) -> bool {
        self.controller.is_loading()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.controller.last_error()
    }
}

/// First transcript entry of a new terminal.
pub fn welcome_banner(version: &str) -> String {
    format!(
        "Welcome to DOX CLI v{version} - Your intelligent documentation assistant.\n\
         Type `help` to see available commands or ask any programming question to get started."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::{AssistantClient, AssistantReply, ClearMemoryReply};
    use crate::error::{DoxError, Result};
    use crate::history::EntryKind;
    use crate::session::TurnRole;
    use crate::theme::ThemeId;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};
    use tokio::sync::{mpsc, oneshot};

    /// Answers once, whenever the test decides to.
    struct OneshotAssistant {
        reply: Mutex<Option<oneshot::Receiver<Result<AssistantReply>>>>,
    }

    impl OneshotAssistant {
        fn new() -> (Arc<Self>, oneshot::Sender<Result<AssistantReply>>) {
            let (tx, rx) = oneshot::channel();
            let client = Arc::new(Self {
                reply: Mutex::new(Some(rx)),
            });
            (client, tx)
        }
    }

    #[async_trait]
    impl AssistantClient for OneshotAssistant {
        async fn ask(&self, _request: &AssistantRequest) -> Result<AssistantReply> {
            let rx = self.reply.lock().unwrap().take();
            match rx {
                Some(rx) => rx
                    .await
                    .unwrap_or_else(|_| Err(DoxError::internal("reply dropped"))),
                None => Err(DoxError::internal("asked twice")),
            }
        }

        async fn clear_memory(&self, _session_id: &str) -> Result<ClearMemoryReply> {
            Ok(ClearMemoryReply {
                success: true,
                message: "cleared".to_string(),
            })
        }
    }

    fn engine() -> TerminalEngine {
        TerminalEngine::new(
            TerminalConfig::default(),
            ThemeStore::new(ThemeId::Green),
            AppInfo::new("1.0.0", 2026),
        )
        .with_session_id("s1")
    }

    fn forward(engine: &mut TerminalEngine, input: &str) -> PendingQuery {
        match engine.submit(input) {
            Submission::Forwarded(pending) => pending,
            other => panic!("expected forwarded query, got {other:?}"),
        }
    }

    #[test]
    fn test_new_engine_shows_banner() {
        let engine = engine();
        assert_eq!(engine.entries(), &[HistoryEntry::response(welcome_banner("1.0.0"))]);
        assert!(!engine.is_loading());
    }

    #[test]
    fn test_blank_input_is_ignored() {
        let mut engine = engine();
        assert!(matches!(engine.submit("   "), Submission::Ignored));
        assert_eq!(engine.entries().len(), 1);
    }

    #[test]
    fn test_command_is_handled_locally() {
        let mut engine = engine();
        assert!(matches!(engine.submit("theme amber"), Submission::Handled));

        assert_eq!(engine.theme().get(), ThemeId::Amber);
        assert_eq!(engine.entries()[1], HistoryEntry::command("theme amber"));
        assert!(engine.turns().is_empty());
        assert!(!engine.is_loading());
    }

    #[tokio::test]
    async fn test_query_round_trip() {
        let (client, tx) = OneshotAssistant::new();
        let mut engine = engine();

        let pending = forward(&mut engine, "what is a lifetime?");
        assert!(engine.is_loading());
        assert_eq!(pending.request().session_id.as_deref(), Some("s1"));
        assert_eq!(engine.entries()[1], HistoryEntry::command("what is a lifetime?"));

        tx.send(Ok(AssistantReply::new("A lifetime is...", Some("s1".to_string()))))
            .unwrap();
        let outcome = pending.run(client.as_ref(), None).await;
        let resolution = engine.finish(outcome);

        assert!(matches!(resolution, Resolution::Answered(_)));
        assert_eq!(engine.entries()[2], HistoryEntry::response("A lifetime is..."));
        let roles: Vec<TurnRole> = engine.turns().iter().map(|turn| turn.role).collect();
        assert_eq!(roles, vec![TurnRole::Human, TurnRole::Assistant]);
    }

    #[tokio::test]
    async fn test_cancel_then_resolve_appends_nothing() {
        let (client, tx) = OneshotAssistant::new();
        let mut engine = engine();

        let pending = forward(&mut engine, "explain async");
        let handle = tokio::spawn(async move { pending.run(client.as_ref(), None).await });

        assert!(engine.cancel());
        let _ = tx.send(Ok(AssistantReply::new("too late", None)));
        let outcome = handle.await.unwrap();

        assert_eq!(engine.finish(outcome), Resolution::Discarded);
        let last = engine.entries().last().unwrap();
        assert_eq!(last, &HistoryEntry::response("Request cancelled by user."));
        assert!(engine.entries().iter().all(|e| e.content != "too late"));
        assert!(engine.request_state().is_idle());
    }

    #[tokio::test]
    async fn test_cancel_then_reject_appends_no_error() {
        let (client, tx) = OneshotAssistant::new();
        let mut engine = engine();

        let pending = forward(&mut engine, "explain async");
        let ticket_id = pending.ticket().id();
        assert!(engine.cancel());

        let _ = tx.send(Err(DoxError::assistant_status(500, "boom")));
        let outcome = pending.run(client.as_ref(), None).await;
        assert_eq!(outcome.ticket_id, ticket_id);

        assert_eq!(engine.finish(outcome), Resolution::Discarded);
        assert!(engine.entries().iter().all(|e| e.kind != EntryKind::Error));
    }

    #[test]
    fn test_cancel_without_notice() {
        let config = TerminalConfig {
            cancel_notice: false,
            ..TerminalConfig::default()
        };
        let mut engine =
            TerminalEngine::new(config, ThemeStore::default(), AppInfo::new("1.0.0", 2026));

        forward(&mut engine, "explain async");
        let before = engine.entries().len();

        assert!(engine.cancel());
        assert_eq!(engine.entries().len(), before);
        assert!(!engine.cancel());
    }

    #[tokio::test]
    async fn test_failure_appends_error_entry() {
        let (client, tx) = OneshotAssistant::new();
        let mut engine = engine();

        let pending = forward(&mut engine, "explain async");
        tx.send(Err(DoxError::assistant_status(503, "Service unavailable")))
            .unwrap();
        let resolution = engine.finish(pending.run(client.as_ref(), None).await);

        assert_eq!(resolution, Resolution::Failed("Service unavailable".to_string()));
        assert_eq!(
            engine.entries().last(),
            Some(&HistoryEntry::error("Error: Service unavailable"))
        );
        assert!(engine.request_state().is_idle());
        assert_eq!(engine.last_error(), Some("Service unavailable"));

        // A new question is accepted after a failure.
        assert!(matches!(engine.submit("try again"), Submission::Forwarded(_)));
    }

    #[tokio::test]
    async fn test_streaming_forwards_chunks() {
        let (client, tx) = OneshotAssistant::new();
        let mut engine = engine();
        let (chunk_tx, mut chunk_rx) = mpsc::unbounded_channel();

        let pending = forward(&mut engine, "stream please");
        tx.send(Ok(AssistantReply::new("whole answer", None))).unwrap();
        let outcome = pending.run(client.as_ref(), Some(chunk_tx)).await;

        assert_eq!(chunk_rx.recv().await.as_deref(), Some("whole answer"));
        engine.finish(outcome);
        assert_eq!(engine.entries().last(), Some(&HistoryEntry::response("whole answer")));
    }

    #[tokio::test]
    async fn test_server_session_id_is_adopted() {
        let (client, tx) = OneshotAssistant::new();
        let mut engine = engine();

        let pending = forward(&mut engine, "hello");
        tx.send(Ok(AssistantReply::new("hi", Some("server-7".to_string()))))
            .unwrap();
        engine.finish(pending.run(client.as_ref(), None).await);

        assert_eq!(engine.session_id(), "server-7");
        assert_eq!(engine.turns().len(), 2);
        assert!(!engine.sessions().contains(Some("s1")));
    }

    #[test]
    fn test_forget_session_starts_fresh() {
        let mut engine = engine();
        forward(&mut engine, "remember me");

        let forgotten = engine.forget_session();

        assert_eq!(forgotten, "s1");
        assert_ne!(engine.session_id(), "s1");
        assert!(!engine.sessions().contains(Some("s1")));
        assert!(engine.turns().is_empty());
    }

    #[test]
    fn test_parse_uses_configured_options() {
        let engine = engine();
        let document = engine.parse("```\nlet x = 1;\n```");
        assert_eq!(
            document.blocks,
            vec![crate::markup::Block::CodeBlock {
                language: "javascript".to_string(),
                code: "let x = 1;".to_string(),
            }]
        );
        assert!(document.anomalies.is_empty());
    }
}
