//! `dox` - a documentation assistant in the terminal.

mod helper;
mod render;

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use rustyline::Editor;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use dox_core::assistant::AssistantClient;
use dox_core::command::{AppInfo, Command};
use dox_core::config::DoxConfig;
use dox_core::error::DoxError;
use dox_core::request::{PendingQuery, QueryOutcome, Resolution};
use dox_core::theme::{ThemeId, ThemeStore};
use dox_core::{Submission, TerminalEngine};
use dox_infrastructure::{ConfigService, TomlThemeRepository};
use dox_interaction::HttpAssistant;

use helper::DoxHelper;
use render::Renderer;

const LOG_ENV: &str = "DOX_LOG";

#[derive(Parser)]
#[command(name = "dox", version, about = "Ask programming questions from the terminal")]
struct Args {
    /// Assistant endpoint URL
    #[arg(long)]
    endpoint: Option<String>,

    /// Colour theme (green, blue, amber)
    #[arg(long)]
    theme: Option<ThemeId>,

    /// Stream answers as they are generated
    #[arg(long)]
    stream: bool,

    /// Path to config.toml
    #[arg(long)]
    config: Option<PathBuf>,

    /// Continue an existing assistant session
    #[arg(long)]
    session: Option<String>,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(args: &Args) -> Result<DoxConfig> {
    let service = match &args.config {
        Some(path) => ConfigService::new(path.clone()),
        None => ConfigService::default_location()?,
    };
    let mut config = service.load()?;

    if let Some(endpoint) = &args.endpoint {
        config.assistant.endpoint = endpoint.clone();
    }
    if args.stream {
        config.assistant.stream = true;
    }
    Ok(config)
}

fn theme_store(args: &Args, config: &DoxConfig) -> ThemeStore {
    let fallback = config.terminal.default_theme;
    let mut store = match TomlThemeRepository::default_location() {
        Ok(repository) => ThemeStore::with_repository(fallback, Arc::new(repository)),
        Err(e) => {
            tracing::warn!("Theme will not be saved: {}", e);
            ThemeStore::new(fallback)
        }
    };
    // A command-line theme applies to this run only.
    if let Some(theme) = args.theme {
        store.override_with(theme);
    }
    store
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let config = load_config(&args)?;
    let client: Arc<dyn AssistantClient> = Arc::new(HttpAssistant::new(&config.assistant)?);

    let mut engine = TerminalEngine::new(
        config.terminal.clone(),
        theme_store(&args, &config),
        AppInfo::current(),
    );
    if let Some(session) = &args.session {
        engine = engine.with_session_id(session.clone());
    }
    tracing::info!("Using assistant at {}", config.assistant.endpoint);

    run(engine, client, config.assistant.stream).await
}

/// The REPL loop.
async fn run(
    mut engine: TerminalEngine,
    client: Arc<dyn AssistantClient>,
    stream: bool,
) -> Result<()> {
    let mut rl: Editor<DoxHelper, DefaultHistory> = Editor::new()?;
    rl.set_helper(Some(DoxHelper::new()));

    let mut printed = print_new(&engine, 0);

    loop {
        match rl.readline("dox> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(trimmed);

                match trimmed {
                    "quit" | "exit" => {
                        println!("{}", "Goodbye!".bright_green());
                        break;
                    }
                    "reset" => {
                        reset_session(&mut engine, client.as_ref()).await;
                        continue;
                    }
                    _ => {}
                }

                if Command::parse(trimmed) == Some(Command::Clear) {
                    print!("\x1B[2J\x1B[H");
                    printed = 0;
                }

                if let Submission::Forwarded(pending) = engine.submit(trimmed) {
                    printed = print_new(&engine, printed);
                    if wait_for_answer(&mut engine, pending, client.clone(), stream).await {
                        printed = engine.entries().len();
                    }
                }
                printed = print_new(&engine, printed);
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    Ok(())
}

/// Prints the entries appended since `printed`; returns the new count.
fn print_new(engine: &TerminalEngine, printed: usize) -> usize {
    let renderer = Renderer::new(engine.theme().palette());
    let entries = engine.transcript().since(printed);
    for entry in entries {
        let document = engine.parse(&entry.content);
        println!("{}", renderer.entry(entry, &document));
    }
    printed + entries.len()
}

/// Runs the query until it resolves or Ctrl-C cancels it.
///
/// Returns `true` when the answer was already shown while streaming.
async fn wait_for_answer(
    engine: &mut TerminalEngine,
    pending: PendingQuery,
    client: Arc<dyn AssistantClient>,
    stream: bool,
) -> bool {
    let ticket_id = pending.ticket().id();
    let (chunk_tx, mut chunk_rx) = mpsc::unbounded_channel::<String>();
    let chunks = stream.then_some(chunk_tx);

    let mut task = tokio::spawn(async move { pending.run(client.as_ref(), chunks).await });
    let mut streamed = false;

    let joined = loop {
        tokio::select! {
            joined = &mut task => break joined,
            Some(chunk) = chunk_rx.recv() => {
                streamed = true;
                print!("{}", chunk);
                let _ = std::io::stdout().flush();
            }
            _ = tokio::signal::ctrl_c() => {
                engine.cancel();
            }
        }
    };

    let outcome = joined.unwrap_or_else(|e| QueryOutcome {
        ticket_id,
        result: Err(DoxError::internal(format!("Query task failed: {}", e))),
    });

    // Chunks still buffered when the task finished.
    while let Ok(chunk) = chunk_rx.try_recv() {
        streamed = true;
        print!("{}", chunk);
    }
    if streamed {
        println!();
    }

    let resolution = engine.finish(outcome);
    streamed && matches!(resolution, Resolution::Answered(_))
}

async fn reset_session(engine: &mut TerminalEngine, client: &dyn AssistantClient) {
    let forgotten = engine.forget_session();
    match client.clear_memory(&forgotten).await {
        Ok(reply) if reply.success => {
            println!("{}", format!("Session reset. {}", reply.message).bright_green());
        }
        Ok(reply) => {
            println!("{}", format!("Session reset locally. {}", reply.message).yellow());
        }
        Err(e) => {
            tracing::warn!("Failed to clear assistant memory: {}", e);
            println!(
                "{}",
                format!("Session reset locally; the assistant did not confirm: {}", e).yellow()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use dox_core::AssistantRequest;
    use dox_core::assistant::{AssistantReply, ClearMemoryReply};
    use dox_core::config::TerminalConfig;
    use dox_core::history::HistoryEntry;

    /// Answers every question from a script.
    struct ScriptedAssistant {
        chunks: Vec<&'static str>,
        result: dox_core::Result<AssistantReply>,
    }

    impl ScriptedAssistant {
        fn answering(explanation: &str) -> Arc<dyn AssistantClient> {
            Arc::new(Self {
                chunks: Vec::new(),
                result: Ok(AssistantReply::new(explanation, None)),
            })
        }

        fn streaming(chunks: Vec<&'static str>) -> Arc<dyn AssistantClient> {
            let explanation = chunks.concat();
            Arc::new(Self {
                chunks,
                result: Ok(AssistantReply::new(explanation, None)),
            })
        }

        fn failing(message: &str) -> Arc<dyn AssistantClient> {
            Arc::new(Self {
                chunks: Vec::new(),
                result: Err(DoxError::assistant_status(502, message)),
            })
        }
    }

    #[async_trait]
    impl AssistantClient for ScriptedAssistant {
        async fn ask(&self, _request: &AssistantRequest) -> dox_core::Result<AssistantReply> {
            self.result.clone()
        }

        async fn ask_streaming(
            &self,
            _request: &AssistantRequest,
            chunks: &mpsc::UnboundedSender<String>,
        ) -> dox_core::Result<AssistantReply> {
            let reply = self.result.clone()?;
            for chunk in &self.chunks {
                let _ = chunks.send(chunk.to_string());
            }
            Ok(reply)
        }

        async fn clear_memory(&self, _session_id: &str) -> dox_core::Result<ClearMemoryReply> {
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
    }

    fn forward(engine: &mut TerminalEngine, input: &str) -> PendingQuery {
        match engine.submit(input) {
            Submission::Forwarded(pending) => pending,
            other => panic!("expected forwarded query, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_plain_answer_is_appended() {
        let mut engine = engine();
        let pending = forward(&mut engine, "what is a lifetime?");

        let shown = wait_for_answer(
            &mut engine,
            pending,
            ScriptedAssistant::answering("A lifetime is a scope."),
            false,
        )
        .await;

        assert!(!shown);
        assert!(!engine.is_loading());
        assert_eq!(
            engine.entries().last(),
            Some(&HistoryEntry::response("A lifetime is a scope."))
        );
    }

    #[tokio::test]
    async fn test_streamed_answer_is_appended_and_reported_shown() {
        let mut engine = engine();
        let pending = forward(&mut engine, "explain traits");

        let shown = wait_for_answer(
            &mut engine,
            pending,
            ScriptedAssistant::streaming(vec!["Traits ", "define ", "behaviour."]),
            true,
        )
        .await;

        assert!(shown);
        assert!(!engine.is_loading());
        assert_eq!(
            engine.entries().last(),
            Some(&HistoryEntry::response("Traits define behaviour."))
        );
    }

    #[tokio::test]
    async fn test_stream_failing_before_first_chunk_shows_error() {
        let mut engine = engine();
        let pending = forward(&mut engine, "explain macros");

        let shown = wait_for_answer(
            &mut engine,
            pending,
            ScriptedAssistant::failing("Bad gateway"),
            true,
        )
        .await;

        assert!(!shown);
        assert!(!engine.is_loading());
        assert_eq!(
            engine.entries().last(),
            Some(&HistoryEntry::error("Error: Bad gateway"))
        );

        // The next question is accepted.
        assert!(matches!(engine.submit("try again"), Submission::Forwarded(_)));
    }
}
