//! Built-in command dispatch.
//!
//! Input typed into the terminal is either one of the built-in commands,
//! handled locally against the transcript and theme store, or a question
//! forwarded to the assistant.

pub mod builtin;
pub mod interpreter;

pub use builtin::{BuiltinCommand, Command, builtin_commands, find_builtin_command};
pub use interpreter::{AppInfo, CLEARED_NOTICE, CommandInterpreter, EMPTY_HISTORY_NOTICE};
