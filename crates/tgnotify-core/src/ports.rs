use async_trait::async_trait;

use crate::{
    domain::{BotIdentity, ChatId, MessageId, Update},
    Result,
};

/// Update categories a `getUpdates` call can be restricted to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UpdateKind {
    Message,
}

impl UpdateKind {
    pub fn as_api_str(self) -> &'static str {
        match self {
            UpdateKind::Message => "message",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ParseMode {
    #[default]
    Plain,
    Html,
}

impl ParseMode {
    /// Value of the `parse_mode` field; plain text omits it.
    pub fn as_api_str(self) -> Option<&'static str> {
        match self {
            ParseMode::Plain => None,
            ParseMode::Html => Some("HTML"),
        }
    }
}

/// One long-poll request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GetUpdates {
    /// `None` fetches from the earliest buffered update.
    pub offset: Option<i64>,
    pub limit: u32,
    pub timeout_secs: u32,
    pub allowed_updates: Vec<UpdateKind>,
}

/// One outbound message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SendMessage {
    pub chat_id: ChatId,
    pub text: String,
    pub parse_mode: ParseMode,
    pub disable_web_page_preview: bool,
    pub disable_notification: bool,
    pub reply_to_message_id: Option<MessageId>,
}

impl SendMessage {
    /// HTML message with previews and notifications left on.
    pub fn html(chat_id: ChatId, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            text: text.into(),
            parse_mode: ParseMode::Html,
            disable_web_page_preview: false,
            disable_notification: false,
            reply_to_message_id: None,
        }
    }

    pub fn reply_to(mut self, message_id: MessageId) -> Self {
        self.reply_to_message_id = Some(message_id);
        self
    }
}

/// Hexagonal port for the bot HTTP API.
///
/// Every call is a single request: implementations never retry or queue. Retry policy belongs
/// to the caller (see [`crate::poller`]).
#[async_trait]
pub trait BotApi: Send + Sync {
    /// Verify the token and fetch the bot's own account.
    async fn get_me(&self) -> Result<BotIdentity>;

    /// One long-poll round trip. The returned batch is owned by the caller.
    async fn get_updates(&self, req: &GetUpdates) -> Result<Vec<Update>>;

    async fn send_message(&self, req: &SendMessage) -> Result<MessageId>;
}
