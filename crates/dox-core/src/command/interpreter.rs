use super::builtin::{Command, builtin_commands};
use crate::history::Transcript;
use crate::theme::{ThemeId, ThemeStore};

/// Notice left behind by `clear`.
pub const CLEARED_NOTICE: &str = "Terminal cleared. Ready for your next question or command.";

/// Notice shown by `history` when nothing was typed before it.
pub const EMPTY_HISTORY_NOTICE: &str = "No command history yet.";

/// Fixed metadata reported by `version` and `about`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppInfo {
    pub version: String,
    pub copyright_year: i32,
}

impl AppInfo {
    pub fn new(version: impl Into<String>, copyright_year: i32) -> Self {
        Self {
            version: version.into(),
            copyright_year,
        }
    }

    /// Metadata of this build, dated with the current year.
    pub fn current() -> Self {
        use chrono::Datelike;
        Self::new(env!("CARGO_PKG_VERSION"), chrono::Local::now().year())
    }
}

/// Decides whether terminal input is a local directive.
///
/// Handled commands only touch the theme store and the transcript; the
/// interpreter never talks to the assistant.
#[derive(Debug, Clone)]
pub struct CommandInterpreter {
    info: AppInfo,
}

impl CommandInterpreter {
    pub fn new(info: AppInfo) -> Self {
        Self { info }
    }

    pub fn info(&self) -> &AppInfo {
        &self.info
    }

    /// Runs `raw_input` if it is a built-in command.
    ///
    /// Returns `true` when the input was handled locally, `false` when it
    /// must be forwarded unchanged to the assistant. The caller is expected
    /// to have appended the command entry for `raw_input` already.
    pub fn interpret(
        &self,
        raw_input: &str,
        theme: &mut ThemeStore,
        transcript: &mut Transcript,
    ) -> bool {
        let Some(command) = Command::parse(raw_input) else {
            return false;
        };
        tracing::debug!("Handling built-in command: {}", command.name());

        match command {
            Command::Clear => transcript.reset(CLEARED_NOTICE),
            Command::Help => transcript.push_response(help_text()),
            Command::History => transcript.push_response(history_text(transcript)),
            Command::Theme(None) => transcript.push_response(theme_listing(theme.get())),
            Command::Theme(Some(requested)) => match requested.parse::<ThemeId>() {
                Ok(id) => {
                    // An unsaved theme still applies until the terminal exits.
                    if let Err(e) = theme.set(id) {
                        tracing::debug!("Theme {} not saved, keeping it for this session: {}", id, e);
                    }
                    transcript.push_response(format!("Theme changed to {id}."));
                }
                Err(_) => transcript.push_error(format!(
                    "Invalid theme: {requested}. Available themes: {}.",
                    ThemeId::known_ids()
                )),
            },
            Command::Version => transcript.push_response(format!(
                "DOX CLI v{} - Documentation Assistant\nRunning on Rust and Tokio",
                self.info.version
            )),
            Command::About => transcript.push_response(format!(
                "# DOX CLI - Documentation Assistant\n\n\
                 • Description: An AI-powered documentation assistant that answers your programming questions.\n\
                 • Technology: Built with Rust, Tokio, reqwest and rustyline.\n\
                 • Version: {}\n\n\
                 Copyright © {}",
                self.info.version, self.info.copyright_year
            )),
        }
        true
    }
}

fn help_text() -> String {
    let lines: Vec<String> = builtin_commands()
        .iter()
        .map(|cmd| format!("• {:<8} - {}", cmd.name, cmd.description))
        .collect();
    format!(
        "# Available Commands\n\n{}\n\nFor programming assistance, simply type your question directly.",
        lines.join("\n")
    )
}

fn history_text(transcript: &Transcript) -> String {
    let mut commands: Vec<&str> = transcript.commands().collect();
    // The `history` entry itself was appended just before dispatch.
    commands.pop();

    if commands.is_empty() {
        return EMPTY_HISTORY_NOTICE.to_string();
    }
    let lines: Vec<String> = commands.iter().map(|cmd| format!("• {cmd}")).collect();
    format!("# Command History\n\n{}", lines.join("\n"))
}

fn theme_listing(current: ThemeId) -> String {
    let lines: Vec<String> = ThemeId::ALL
        .iter()
        .map(|id| format!("• {:<5} - {}", id.as_str(), id.description()))
        .collect();
    format!(
        "# Available Themes\n\n{}\n\nCurrent theme: {current}\n\nTo apply a new theme, use: theme [color]",
        lines.join("\n")
    )
}
