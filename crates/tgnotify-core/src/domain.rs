/// Telegram user id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct UserId(pub i64);

/// Telegram chat id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChatId(pub i64);

/// Telegram message id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MessageId(pub i32);

/// The account a token belongs to, as reported by `getMe`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BotIdentity {
    pub id: UserId,
    pub first_name: String,
    pub username: Option<String>,
}

/// Who sent a message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sender {
    pub id: UserId,
    pub first_name: String,
    pub username: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    pub message_id: MessageId,
    /// Absent for anonymous channel posts.
    pub from: Option<Sender>,
    pub chat_id: ChatId,
    pub text: Option<String>,
}

impl Message {
    /// Text body, if present and non-empty.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref().filter(|t| !t.is_empty())
    }
}

/// One server-delivered envelope.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

/// Smallest update id not yet acknowledged.
///
/// Starts empty ("from the earliest buffered update") and only ever moves forward.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UpdateCursor(Option<i64>);

impl UpdateCursor {
    pub fn new() -> Self {
        Self(None)
    }

    /// Offset to send with the next `getUpdates` call.
    pub fn offset(&self) -> Option<i64> {
        self.0
    }

    /// Acknowledge `update_id`; a stale id leaves the cursor where it is.
    pub fn advance_past(&mut self, update_id: i64) {
        let next = update_id.saturating_add(1);
        match self.0 {
            Some(cur) if cur >= next => {}
            _ => self.0 = Some(next),
        }
    }

    /// Whether `update_id` was already acknowledged.
    pub fn is_acknowledged(&self, update_id: i64) -> bool {
        self.0.is_some_and(|cur| update_id < cur)
    }
}
