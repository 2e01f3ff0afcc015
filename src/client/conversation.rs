// src/client/conversation.rs
use uuid::Uuid;

use crate::message::{ConversationMessage, Role};

pub const ERROR_NOTICE: &str = "Sorry, I encountered an error. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Reply,
    /// Failure notice shown to the user; never sent back upstream.
    Notice,
}

#[derive(Debug, Clone)]
pub struct ChatEntry {
    pub id: Uuid,
    pub role: Role,
    pub text: String,
    pub kind: EntryKind,
}

/// Where assembled assistant text goes.
pub trait MessageSink {
    /// Adds an empty assistant entry and returns its id.
    fn open_assistant(&mut self) -> Uuid;

    /// Replaces the text of the entry opened by `open_assistant`.
    fn update_assistant(&mut self, id: Uuid, text: &str);

    fn push_notice(&mut self, text: &str);
}

/// Local chat buffer. Entries are append-only except the assistant
/// placeholder, which is rewritten in place while its stream is live.
#[derive(Debug, Default)]
pub struct Conversation {
    entries: Vec<ChatEntry>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[ChatEntry] {
        &self.entries
    }

    pub fn last(&self) -> Option<&ChatEntry> {
        self.entries.last()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn push_user(&mut self, text: impl Into<String>) -> Uuid {
        self.push(Role::User, text.into(), EntryKind::Reply)
    }

    /// History in the shape the relay expects. Notices are left out.
    pub fn to_messages(&self) -> Vec<ConversationMessage> {
        self.entries
            .iter()
            .filter(|e| e.kind == EntryKind::Reply)
            .map(|e| ConversationMessage::new(e.role, e.text.clone()))
            .collect()
    }

    fn push(&mut self, role: Role, text: String, kind: EntryKind) -> Uuid {
        let id = Uuid::new_v4();
        self.entries.push(ChatEntry { id, role, text, kind });
        id
    }
}

impl MessageSink for Conversation {
    fn open_assistant(&mut self) -> Uuid {
        self.push(Role::Assistant, String::new(), EntryKind::Reply)
    }

    fn update_assistant(&mut self, id: Uuid, text: &str) {
        if let Some(entry) = self.entries.iter_mut().rev().find(|e| e.id == id) {
            entry.text.clear();
            entry.text.push_str(text);
        }
    }

    fn push_notice(&mut self, text: &str) {
        self.push(Role::Assistant, text.to_string(), EntryKind::Notice);
    }
}
