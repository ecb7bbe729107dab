use super::model::{Session, Turn, TurnRole};
use std::collections::HashMap;

/// Session id used when the caller does not name one.
pub const DEFAULT_SESSION_ID: &str = "default";

/// Sessions of one terminal instance, keyed by id.
///
/// Sessions are created on first reference and destroyed only by
/// [`SessionStore::clear`]; a cleared id comes back empty on next lookup.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    sessions: HashMap<String, Session>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generates a fresh session id.
    pub fn new_session_id() -> String {
        uuid::Uuid::new_v4().to_string()
    }

    fn resolve(session_id: Option<&str>) -> &str {
        match session_id {
            Some(id) if !id.trim().is_empty() => id,
            _ => DEFAULT_SESSION_ID,
        }
    }

    /// Returns the session, creating an empty one if needed.
    pub fn get_or_create(&mut self, session_id: Option<&str>) -> &mut Session {
        let id = Self::resolve(session_id);
        self.sessions
            .entry(id.to_string())
            .or_insert_with(|| Session::new(id))
    }

    /// Returns the session without creating it.
    pub fn get(&self, session_id: Option<&str>) -> Option<&Session> {
        self.sessions.get(Self::resolve(session_id))
    }

    /// Turns of the session in chronological order; empty if it does not exist.
    pub fn turns(&self, session_id: Option<&str>) -> &[Turn] {
        self.get(session_id)
            .map(|session| session.turns.as_slice())
            .unwrap_or(&[])
    }

    pub fn append_human(&mut self, session_id: Option<&str>, content: impl Into<String>) {
        self.get_or_create(session_id).push(TurnRole::Human, content);
    }

    pub fn append_assistant(&mut self, session_id: Option<&str>, content: impl Into<String>) {
        self.get_or_create(session_id)
            .push(TurnRole::Assistant, content);
    }

    /// Removes the session entirely. Returns whether it existed.
    pub fn clear(&mut self, session_id: Option<&str>) -> bool {
        let id = Self::resolve(session_id);
        let existed = self.sessions.remove(id).is_some();
        tracing::debug!("Cleared session {} (existed: {})", id, existed);
        existed
    }

    /// Moves the turns of `from` under `to`, appending to any turns `to` has.
    ///
    /// Used when the assistant answers under a different session id than
    /// the one requested.
    pub fn rename(&mut self, from: &str, to: &str) {
        if from == to {
            return;
        }
        let Some(moved) = self.sessions.remove(from) else {
            return;
        };
        let target = self.get_or_create(Some(to));
        target.turns.extend(moved.turns);
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn contains(&self, session_id: Option<&str>) -> bool {
        self.sessions.contains_key(Self::resolve(session_id))
    }
}
