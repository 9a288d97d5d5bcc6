//! Bounded per-session chat history.

use std::collections::VecDeque;

use tracing::debug;
use uuid::Uuid;

use crate::actors::messages::ChatMessage;
use crate::coach::prompts::{FEEDBACK_INSTRUCTIONS, GENERATION_INSTRUCTIONS};

/// Maximum number of entries, system message included.
pub const DEFAULT_CAPACITY: usize = 10;

/// History of one coaching session in one mode.
///
/// The system message always sits at index 0 and is never evicted. Once the
/// buffer holds more than `capacity` entries the oldest turn is dropped.
#[derive(Debug, Clone)]
pub struct Conversation {
    id: Uuid,
    system: ChatMessage,
    turns: VecDeque<ChatMessage>,
    capacity: usize,
}

impl Conversation {
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self::with_capacity(system_prompt, DEFAULT_CAPACITY)
    }

    /// `capacity` counts the system message and is at least 2.
    pub fn with_capacity(system_prompt: impl Into<String>, capacity: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            system: ChatMessage::system(system_prompt),
            turns: VecDeque::new(),
            capacity: capacity.max(2),
        }
    }

    /// A conversation primed for email feedback.
    pub fn feedback() -> Self {
        Self::new(FEEDBACK_INSTRUCTIONS)
    }

    /// A conversation primed for free email generation.
    pub fn generation() -> Self {
        Self::new(GENERATION_INSTRUCTIONS)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.push(ChatMessage::user(content));
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.push(ChatMessage::assistant(content));
    }

    /// Append an entry, then evict the oldest turns while over capacity.
    pub fn push(&mut self, message: ChatMessage) {
        self.turns.push_back(message);

        while self.len() > self.capacity {
            if self.turns.pop_front().is_none() {
                break;
            }
            debug!(conversation = %self.id, "Evicted oldest conversation entry");
        }
    }

    /// Snapshot of the full history, system message first.
    pub fn messages(&self) -> Vec<ChatMessage> {
        std::iter::once(self.system.clone())
            .chain(self.turns.iter().cloned())
            .collect()
    }

    /// Snapshot plus one extra, not yet recorded, user message.
    pub fn messages_with(&self, pending_user: impl Into<String>) -> Vec<ChatMessage> {
        let mut messages = self.messages();
        messages.push(ChatMessage::user(pending_user));
        messages
    }

    pub fn system_prompt(&self) -> &str {
        &self.system.content
    }

    /// Entries including the system message.
    pub fn len(&self) -> usize {
        self.turns.len() + 1
    }

    /// True when only the system message is present.
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Drop every turn, keeping the system message and id.
    pub fn clear(&mut self) {
        self.turns.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actors::messages::Role;

    #[test]
    fn test_length_stabilizes_at_capacity() {
        let mut conversation = Conversation::new("system");

        for i in 0..25 {
            conversation.push_user(format!("message {}", i));
            assert!(conversation.len() <= DEFAULT_CAPACITY);
        }

        let messages = conversation.messages();
        assert_eq!(messages.len(), DEFAULT_CAPACITY);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[0].content, "system");
        assert_eq!(messages[1].content, "message 16");
        assert_eq!(messages[9].content, "message 24");
    }

    #[test]
    fn test_clear_keeps_system() {
        let mut conversation = Conversation::feedback();
        let id = conversation.id();
        conversation.push_user("hi");
        conversation.push_assistant("hello");
        assert_eq!(conversation.len(), 3);

        conversation.clear();
        assert!(conversation.is_empty());
        assert_eq!(conversation.len(), 1);
        assert_eq!(conversation.id(), id);
        assert_eq!(conversation.system_prompt(), FEEDBACK_INSTRUCTIONS);
    }

    #[test]
    fn test_messages_with_does_not_record() {
        let conversation = Conversation::generation();
        let messages = conversation.messages_with("write an email");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].role, Role::User);
        assert_eq!(conversation.len(), 1);
    }

    #[test]
    fn test_conversations_are_independent() {
        let mut a = Conversation::feedback();
        let b = Conversation::feedback();
        a.push_user("only in a");
        assert_ne!(a.id(), b.id());
        assert_eq!(b.len(), 1);
    }
}
