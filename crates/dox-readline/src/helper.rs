//! rustyline helper: completion, hints and highlighting of built-in words.

use colored::Colorize;
use dox_core::command::builtin_commands;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};
use std::borrow::Cow::{self, Borrowed, Owned};

/// Words the REPL itself understands besides the built-in commands.
pub const REPL_DIRECTIVES: [&str; 3] = ["reset", "quit", "exit"];

#[derive(Clone)]
pub struct DoxHelper {
    words: Vec<String>,
}

impl DoxHelper {
    pub fn new() -> Self {
        let words = builtin_commands()
            .iter()
            .map(|cmd| cmd.name)
            .chain(REPL_DIRECTIVES)
            .map(str::to_string)
            .collect();
        Self { words }
    }

    fn is_word(&self, line: &str) -> bool {
        let first = line.split_whitespace().next().unwrap_or_default();
        self.words.iter().any(|word| word == first)
    }
}

impl Helper for DoxHelper {}

impl Completer for DoxHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];
        if line.is_empty() || line.contains(' ') {
            return Ok((0, vec![]));
        }

        let candidates = self
            .words
            .iter()
            .filter(|word| word.starts_with(line))
            .map(|word| Pair {
                display: word.clone(),
                replacement: word.clone(),
            })
            .collect();
        Ok((0, candidates))
    }
}

impl Highlighter for DoxHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if self.is_word(line) {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for DoxHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];
        if line.is_empty() || line.contains(' ') {
            return None;
        }

        self.words
            .iter()
            .find(|word| word.starts_with(line) && word.len() > line.len())
            .map(|word| word[line.len()..].to_string())
    }
}

impl Validator for DoxHelper {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_knows_commands_and_directives() {
        let helper = DoxHelper::new();
        assert!(helper.is_word("theme blue"));
        assert!(helper.is_word("reset"));
        assert!(!helper.is_word("what is a trait"));
    }

    #[test]
    fn test_hint_completes_prefix() {
        let helper = DoxHelper::new();
        let history = rustyline::history::DefaultHistory::new();
        let ctx = Context::new(&history);

        assert_eq!(helper.hint("his", 3, &ctx), Some("tory".to_string()));
        assert_eq!(helper.hint("theme ", 6, &ctx), None);
    }
}
