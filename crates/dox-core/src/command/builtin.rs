//! Built-in terminal commands.
//!
//! These are always available and handled locally; anything else typed into
//! the terminal is forwarded to the assistant.

use serde::Serialize;

/// A built-in command shown by `help`.
#[derive(Debug, Clone, Serialize)]
pub struct BuiltinCommand {
    /// Command name as typed
    pub name: &'static str,
    /// Usage format (e.g., "theme [color]")
    pub usage: &'static str,
    /// Human-readable description
    pub description: &'static str,
}

impl BuiltinCommand {
    pub const fn new(name: &'static str, usage: &'static str, description: &'static str) -> Self {
        Self {
            name,
            usage,
            description,
        }
    }
}

const BUILTIN_COMMANDS: &[BuiltinCommand] = &[
    BuiltinCommand::new(
        "help",
        "help",
        "Display all available commands and their usage",
    ),
    BuiltinCommand::new("clear", "clear", "Reset the terminal to its initial state"),
    BuiltinCommand::new(
        "history",
        "history",
        "View a list of your previously executed commands",
    ),
    BuiltinCommand::new(
        "theme",
        "theme [color]",
        "Customize the terminal appearance with different color schemes",
    ),
    BuiltinCommand::new(
        "version",
        "version",
        "Display the current DOX CLI version information",
    ),
    BuiltinCommand::new(
        "about",
        "about",
        "Learn more about DOX CLI and its capabilities",
    ),
];

/// Returns all built-in commands in help order.
pub fn builtin_commands() -> &'static [BuiltinCommand] {
    BUILTIN_COMMANDS
}

/// Find a built-in command by name.
pub fn find_builtin_command(name: &str) -> Option<&'static BuiltinCommand> {
    builtin_commands().iter().find(|cmd| cmd.name == name)
}

/// A recognized command with its argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Clear,
    Help,
    History,
    /// `theme` alone lists palettes; with an id it switches.
    Theme(Option<String>),
    Version,
    About,
}

impl Command {
    /// Recognizes a built-in command.
    ///
    /// Matching is case-insensitive on the trimmed input. `theme` is matched
    /// on its first token; every other command must be the whole input, so a
    /// question such as "help me with lifetimes" still reaches the assistant.
    pub fn parse(input: &str) -> Option<Command> {
        let normalized = input.trim().to_lowercase();
        let mut tokens = normalized.split_whitespace();
        let first = tokens.next()?;

        if first == "theme" {
            return Some(Command::Theme(tokens.next().map(str::to_string)));
        }
        if tokens.next().is_some() {
            return None;
        }

        match first {
            "clear" => Some(Command::Clear),
            "help" => Some(Command::Help),
            "history" => Some(Command::History),
            "version" => Some(Command::Version),
            "about" => Some(Command::About),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::Clear => "clear",
            Command::Help => "help",
            Command::History => "history",
            Command::Theme(_) => "theme",
            Command::Version => "version",
            Command::About => "about",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_commands_initialized() {
        let commands = builtin_commands();
        assert_eq!(commands.len(), 6);
        assert!(commands.iter().any(|c| c.name == "help"));
        assert!(commands.iter().any(|c| c.name == "theme"));
    }

    #[test]
    fn test_find_builtin_command() {
        assert!(find_builtin_command("about").is_some());
        assert!(find_builtin_command("nonexistent").is_none());
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(Command::parse("  HELP "), Some(Command::Help));
        assert_eq!(
            Command::parse("Theme Blue"),
            Some(Command::Theme(Some("blue".to_string())))
        );
        assert_eq!(Command::parse("theme"), Some(Command::Theme(None)));
    }

    #[test]
    fn test_questions_are_not_commands() {
        assert_eq!(Command::parse("help me with lifetimes"), None);
        assert_eq!(Command::parse("history of rust"), None);
        assert_eq!(Command::parse("what is a closure?"), None);
        assert_eq!(Command::parse(""), None);
    }

    #[test]
    fn test_every_command_is_listed() {
        for input in ["clear", "help", "history", "theme", "version", "about"] {
            let command = Command::parse(input).unwrap();
            assert!(find_builtin_command(command.name()).is_some());
        }
    }
}
