//! Echo policy: every text message gets one greeting naming its sender.

use crate::{
    domain::{Message, Sender},
    ports::SendMessage,
};

pub fn greeting(sender: &Sender) -> String {
    format!("Hello {}, your ID is {}", sender.first_name, sender.id.0)
}

/// Escape text for Telegram's HTML parse mode (outside of tags).
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Reply for `msg`, or `None` when it has no text or no known sender.
///
/// The reply goes out as HTML, so the sender's name is escaped.
pub fn reply_for(msg: &Message) -> Option<SendMessage> {
    msg.text()?;
    let sender = msg.from.as_ref()?;
    let safe = Sender {
        first_name: escape_html(&sender.first_name),
        ..sender.clone()
    };
    Some(SendMessage::html(msg.chat_id, greeting(&safe)).reply_to(msg.message_id))
}

/// Console line for an incoming message: `Ann (ID: 42, @ann): hi`.
pub fn describe(msg: &Message) -> String {
    let text = msg.text().unwrap_or_default();
    match &msg.from {
        Some(s) => format!(
            "{} (ID: {}, @{}): {}",
            s.first_name,
            s.id.0,
            s.username.as_deref().unwrap_or("-"),
            text
        ),
        None => format!("(chat {}): {}", msg.chat_id.0, text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{ChatId, MessageId, UserId},
        ports::ParseMode,
    };

    fn ann() -> Sender {
        Sender {
            id: UserId(42),
            first_name: "Ann".to_string(),
            username: Some("ann".to_string()),
        }
    }

    fn msg(text: Option<&str>) -> Message {
        Message {
            message_id: MessageId(7),
            from: Some(ann()),
            chat_id: ChatId(-100),
            text: text.map(str::to_string),
        }
    }

    #[test]
    fn greeting_text_is_exact() {
        assert_eq!(greeting(&ann()), "Hello Ann, your ID is 42");
    }

    #[test]
    fn reply_targets_chat_and_original_message() {
        let r = reply_for(&msg(Some("hi"))).unwrap();
        assert_eq!(r.chat_id, ChatId(-100));
        assert_eq!(r.reply_to_message_id, Some(MessageId(7)));
        assert_eq!(r.parse_mode, ParseMode::Html);
        assert!(!r.disable_notification);
        assert_eq!(r.text, "Hello Ann, your ID is 42");
    }

    #[test]
    fn no_reply_without_text() {
        assert!(reply_for(&msg(None)).is_none());
        assert!(reply_for(&msg(Some(""))).is_none());
    }

    #[test]
    fn reply_escapes_html_in_sender_name() {
        let mut m = msg(Some("hi"));
        m.from = Some(Sender {
            id: UserId(42),
            first_name: "Tom & <Jerry>".to_string(),
            username: None,
        });
        let r = reply_for(&m).unwrap();
        assert_eq!(r.parse_mode, ParseMode::Html);
        assert_eq!(r.text, "Hello Tom &amp; &lt;Jerry&gt;, your ID is 42");
        assert!(!r.text.contains('<'));
    }

    #[test]
    fn escape_html_leaves_plain_text_alone() {
        assert_eq!(escape_html("Ann"), "Ann");
        assert_eq!(escape_html("<3"), "&lt;3");
    }

    #[test]
    fn describe_matches_console_format() {
        assert_eq!(describe(&msg(Some("hi"))), "Ann (ID: 42, @ann): hi");
    }
}
