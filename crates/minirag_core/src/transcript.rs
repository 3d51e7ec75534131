use std::fmt;

use crate::Citation;

/// Stable identity of a transcript entry. Never reused within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MessageId(u64);

impl MessageId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "msg-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

/// A settled answer: text split into display lines plus its citations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    pub lines: Vec<String>,
    pub citations: Vec<Citation>,
}

impl Answer {
    pub fn new(text: &str, sources: Vec<String>) -> Self {
        Self {
            lines: text.split('\n').map(ToOwned::to_owned).collect(),
            citations: Citation::from_sources(sources),
        }
    }
}

/// Lifecycle of an assistant entry: created `Pending`, settled once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssistantState {
    Pending,
    Resolved(Answer),
    Failed,
}

/// User text is fixed at creation; only assistant entries change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageBody {
    User(String),
    Assistant(AssistantState),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: MessageId,
    pub body: MessageBody,
}

impl ChatMessage {
    pub fn role(&self) -> Role {
        match self.body {
            MessageBody::User(_) => Role::User,
            MessageBody::Assistant(_) => Role::Assistant,
        }
    }
}

/// Append-only, insertion-ordered message log.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChatTranscript {
    messages: Vec<ChatMessage>,
    next_id: u64,
}

impl ChatTranscript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, body: MessageBody) -> MessageId {
        self.next_id += 1;
        let id = MessageId(self.next_id);
        self.messages.push(ChatMessage { id, body });
        id
    }

    pub fn append_user(&mut self, text: impl Into<String>) -> MessageId {
        self.append(MessageBody::User(text.into()))
    }

    pub fn append_placeholder(&mut self) -> MessageId {
        self.append(MessageBody::Assistant(AssistantState::Pending))
    }

    /// Settles a pending assistant entry.
    ///
    /// Returns false without touching anything when the id is unknown, the
    /// entry is a user message, or it has already been settled.
    pub fn replace(&mut self, id: MessageId, state: AssistantState) -> bool {
        let Some(message) = self.get_mut(id) else {
            return false;
        };
        match &mut message.body {
            MessageBody::Assistant(current) if matches!(current, AssistantState::Pending) => {
                *current = state;
                true
            }
            _ => false,
        }
    }

    pub fn get(&self, id: MessageId) -> Option<&ChatMessage> {
        self.messages
            .binary_search_by_key(&id, |message| message.id)
            .ok()
            .map(|idx| &self.messages[idx])
    }

    fn get_mut(&mut self, id: MessageId) -> Option<&mut ChatMessage> {
        self.messages
            .binary_search_by_key(&id, |message| message.id)
            .ok()
            .map(|idx| &mut self.messages[idx])
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChatMessage> {
        self.messages.iter()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// The entry the view stays anchored to.
    pub fn latest(&self) -> Option<MessageId> {
        self.messages.last().map(|message| message.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_follow_append_order() {
        let mut transcript = ChatTranscript::new();
        let a = transcript.append_user("q");
        let b = transcript.append_placeholder();
        assert!(a < b);
        assert_eq!(transcript.latest(), Some(b));
        let roles: Vec<_> = transcript.iter().map(ChatMessage::role).collect();
        assert_eq!(roles, vec![Role::User, Role::Assistant]);
    }

    #[test]
    fn placeholder_settles_once() {
        let mut transcript = ChatTranscript::new();
        let id = transcript.append_placeholder();
        assert!(transcript.replace(id, AssistantState::Failed));
        assert!(!transcript.replace(id, AssistantState::Pending));
        assert_eq!(
            transcript.get(id).map(|m| &m.body),
            Some(&MessageBody::Assistant(AssistantState::Failed))
        );
    }

    #[test]
    fn user_messages_and_unknown_ids_are_untouched() {
        let mut transcript = ChatTranscript::new();
        let user = transcript.append_user("hello");
        assert!(!transcript.replace(user, AssistantState::Failed));
        assert!(!transcript.replace(MessageId(99), AssistantState::Failed));
        assert_eq!(
            transcript.get(user).map(|m| &m.body),
            Some(&MessageBody::User("hello".to_string()))
        );
    }

    #[test]
    fn answer_splits_on_newlines() {
        let answer = Answer::new("line1\nline2", vec!["s".to_string()]);
        assert_eq!(answer.lines, vec!["line1", "line2"]);
        assert_eq!(answer.citations.len(), 1);
    }
}
