//! In-memory conversation history.
//!
//! The store is append-only. Every append bumps a revision counter, which the
//! renderer compares against its cached layout to decide when the full turn
//! list must be laid out again.

use super::message::{Role, Turn};

#[derive(Debug, Default, Clone)]
pub struct ConversationStore {
    turns: Vec<Turn>,
    revision: u64,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, turn: Turn) {
        self.turns.push(turn);
        self.revision = self.revision.wrapping_add(1);
    }

    /// Append `turn` and return a reference to it in its final position.
    pub fn append_and_get(&mut self, turn: Turn) -> &Turn {
        self.append(turn);
        &self.turns[self.turns.len() - 1]
    }

    pub fn all(&self) -> &[Turn] {
        &self.turns
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// True when the newest turn is a user turn still waiting for its answer.
    pub fn has_unanswered_user_turn(&self) -> bool {
        self.last().map(|turn| turn.role() == Role::User).unwrap_or(false)
    }
}
