// Chat transcript: the append-only message log behind the chat view.
//
// The log lives for one mount of the chat view. Entries are appended by the
// orchestrator (user sends, service replies, fallbacks) and are never
// mutated or removed once in the log.

/// Who produced a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Bot,
    System,
}

/// A single transcript entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    /// Monotonically increasing per-log id.
    pub id: u64,
    pub text: String,
    pub sender: Sender,
    /// Synthetic announcement of a completed screening score.
    pub is_score: bool,
    /// The service's reply to a delivered score.
    pub is_score_response: bool,
    /// Fallback entry produced by a failed request.
    pub is_error: bool,
}

/// Greeting seeded as the first entry whenever the chat view mounts.
pub const GREETING: &str = "Hello! I'm your WellNest assistant. How can I help you today?";

/// The append-only transcript for one chat-view lifetime.
#[derive(Debug, Clone)]
pub struct ChatLog {
    messages: Vec<ChatMessage>,
    next_id: u64,
}

impl Default for ChatLog {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatLog {
    /// Fresh transcript seeded with the assistant greeting.
    pub fn new() -> Self {
        let mut log = ChatLog {
            messages: Vec::new(),
            next_id: 1,
        };
        log.append(GREETING, Sender::Bot, false, false, false);
        log
    }

    fn append(
        &mut self,
        text: impl Into<String>,
        sender: Sender,
        is_score: bool,
        is_score_response: bool,
        is_error: bool,
    ) {
        let id = self.next_id;
        self.next_id += 1;
        self.messages.push(ChatMessage {
            id,
            text: text.into(),
            sender,
            is_score,
            is_score_response,
            is_error,
        });
    }

    /// A message typed by the user.
    pub fn push_user(&mut self, text: impl Into<String>) {
        self.append(text, Sender::User, false, false, false);
    }

    /// A plain reply from the service.
    pub fn push_bot(&mut self, text: impl Into<String>) {
        self.append(text, Sender::Bot, false, false, false);
    }

    /// The synthetic system line announcing a completed screening score.
    pub fn push_score_announcement(&mut self, text: impl Into<String>) {
        self.append(text, Sender::System, true, false, false);
    }

    /// The service's reply to a delivered score.
    pub fn push_score_response(&mut self, text: impl Into<String>) {
        self.append(text, Sender::Bot, false, true, false);
    }

    /// A fallback entry for a failed request.
    pub fn push_error(&mut self, text: impl Into<String>) {
        self.append(text, Sender::Bot, false, false, true);
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// The most recently appended entry.
    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }
}
