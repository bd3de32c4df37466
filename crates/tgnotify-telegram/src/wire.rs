//! Telegram Bot API JSON shapes (only the fields we use).

use serde::{Deserialize, Serialize};

use tgnotify_core::domain;

/// Envelope every Bot API method responds with.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
    pub error_code: Option<u16>,
    pub parameters: Option<ResponseParameters>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ResponseParameters {
    pub retry_after: Option<u64>,
    pub migrate_to_chat_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub is_bot: bool,
    pub first_name: String,
    pub username: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
pub struct Message {
    pub message_id: i32,
    pub from: Option<User>,
    pub chat: Chat,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

#[derive(Debug, Serialize)]
pub struct GetUpdatesBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
    pub limit: u32,
    pub timeout: u32,
    pub allowed_updates: Vec<&'a str>,
}

#[derive(Debug, Serialize)]
pub struct SendMessageBody<'a> {
    pub chat_id: i64,
    pub text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_mode: Option<&'static str>,
    pub disable_web_page_preview: bool,
    pub disable_notification: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to_message_id: Option<i32>,
}

impl From<User> for domain::Sender {
    fn from(u: User) -> Self {
        Self {
            id: domain::UserId(u.id),
            first_name: u.first_name,
            username: u.username,
        }
    }
}

impl From<User> for domain::BotIdentity {
    fn from(u: User) -> Self {
        Self {
            id: domain::UserId(u.id),
            first_name: u.first_name,
            username: u.username,
        }
    }
}

impl From<Message> for domain::Message {
    fn from(m: Message) -> Self {
        Self {
            message_id: domain::MessageId(m.message_id),
            from: m.from.map(Into::into),
            chat_id: domain::ChatId(m.chat.id),
            text: m.text,
        }
    }
}

impl From<Update> for domain::Update {
    fn from(u: Update) -> Self {
        Self {
            update_id: u.update_id,
            message: u.message.map(Into::into),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_without_message_parses() {
        let raw = r#"{"update_id": 9, "edited_message": {"message_id": 1}}"#;
        let u: domain::Update = serde_json::from_str::<Update>(raw).unwrap().into();
        assert_eq!(u.update_id, 9);
        assert!(u.message.is_none());
    }

    #[test]
    fn message_maps_to_domain() {
        let raw = r#"{
            "update_id": 100,
            "message": {
                "message_id": 5,
                "date": 1706529600,
                "from": {"id": 42, "is_bot": false, "first_name": "Ann", "username": "ann"},
                "chat": {"id": -42, "type": "group", "title": "g"},
                "text": "hi"
            }
        }"#;
        let u: domain::Update = serde_json::from_str::<Update>(raw).unwrap().into();
        let m = u.message.unwrap();
        assert_eq!(m.message_id, domain::MessageId(5));
        assert_eq!(m.chat_id, domain::ChatId(-42));
        assert_eq!(m.text.as_deref(), Some("hi"));
        let from = m.from.unwrap();
        assert_eq!(from.first_name, "Ann");
        assert_eq!(from.username.as_deref(), Some("ann"));
    }

    #[test]
    fn send_body_omits_unset_optionals() {
        let body = SendMessageBody {
            chat_id: 1,
            text: "x",
            parse_mode: None,
            disable_web_page_preview: false,
            disable_notification: true,
            reply_to_message_id: None,
        };
        let v = serde_json::to_value(&body).unwrap();
        assert_eq!(
            v,
            serde_json::json!({
                "chat_id": 1,
                "text": "x",
                "disable_web_page_preview": false,
                "disable_notification": true
            })
        );
    }

    #[test]
    fn get_updates_body_omits_missing_offset() {
        let body = GetUpdatesBody {
            offset: None,
            limit: 20,
            timeout: 0,
            allowed_updates: vec!["message"],
        };
        let v = serde_json::to_value(&body).unwrap();
        assert_eq!(
            v,
            serde_json::json!({"limit": 20, "timeout": 0, "allowed_updates": ["message"]})
        );
    }
}
