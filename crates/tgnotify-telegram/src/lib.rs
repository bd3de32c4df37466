//! Telegram adapter.
//!
//! This crate implements the `tgnotify-core` [`BotApi`] port over the Telegram Bot HTTP API.
//! One method call is one HTTP request: no retries, no queuing.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{de::DeserializeOwned, Serialize};

pub mod wire;

use tgnotify_core::{
    config::BotToken,
    domain::{BotIdentity, MessageId, Update},
    errors::Error,
    ports::{BotApi, GetUpdates, SendMessage},
    Result,
};

use crate::wire::{ApiResponse, GetUpdatesBody, SendMessageBody};

#[derive(Clone, Debug)]
pub struct TelegramClient {
    token: BotToken,
    base_url: String,
    http: reqwest::Client,
}

impl TelegramClient {
    pub fn new(token: BotToken, base_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| Error::Config(format!("http client build failed: {e}")))?;
        Ok(Self::with_http(token, base_url, http))
    }

    pub fn with_http(token: BotToken, base_url: impl Into<String>, http: reqwest::Client) -> Self {
        Self {
            token,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        }
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url, self.token.as_str(), method)
    }

    async fn call<B, T>(&self, method: &str, body: Option<&B>) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.method_url(method);
        let req = match body {
            Some(b) => self.http.post(url).json(b),
            None => self.http.get(url),
        };

        // The URL carries the token; keep it out of error messages.
        let resp = req
            .send()
            .await
            .map_err(|e| Error::Network(format!("{method}: {}", e.without_url())))?;
        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| Error::Network(format!("{method}: {}", e.without_url())))?;

        decode_response(method, status, &text)
    }
}

/// Turn an HTTP status + body into the method result or a classified error.
pub fn decode_response<T: DeserializeOwned>(
    method: &str,
    status: StatusCode,
    body: &str,
) -> Result<T> {
    let parsed: ApiResponse<T> = match serde_json::from_str(body) {
        Ok(v) => v,
        Err(e) => {
            if status.is_success() {
                return Err(Error::Protocol(format!("{method}: malformed response: {e}")));
            }
            return Err(classify(method, status.as_u16(), None, None));
        }
    };

    if parsed.ok {
        return parsed
            .result
            .ok_or_else(|| Error::Protocol(format!("{method}: response has no result")));
    }

    let params = parsed.parameters.unwrap_or_default();
    let mut description = parsed.description;
    if let Some(chat) = params.migrate_to_chat_id {
        description = Some(format!(
            "{} (group migrated to chat {chat})",
            description.unwrap_or_default()
        ));
    }
    Err(classify(
        method,
        parsed.error_code.unwrap_or(status.as_u16()),
        description.as_deref(),
        params.retry_after,
    ))
}

fn classify(method: &str, code: u16, description: Option<&str>, retry_after: Option<u64>) -> Error {
    let detail = description.unwrap_or("no description");
    match code {
        401 | 404 => Error::Auth(format!("{method}: {code} {detail}")),
        429 => Error::RateLimited {
            retry_after: retry_after.map(std::time::Duration::from_secs),
        },
        _ => Error::Protocol(format!("{method}: {code} {detail}")),
    }
}

#[async_trait]
impl BotApi for TelegramClient {
    async fn get_me(&self) -> Result<BotIdentity> {
        let me: wire::User = self.call::<(), _>("getMe", None).await?;
        if !me.is_bot {
            tracing::warn!(id = me.id, "getMe returned a non-bot account");
        }
        Ok(me.into())
    }

    async fn get_updates(&self, req: &GetUpdates) -> Result<Vec<Update>> {
        let body = GetUpdatesBody {
            offset: req.offset,
            limit: req.limit,
            timeout: req.timeout_secs,
            allowed_updates: req.allowed_updates.iter().map(|k| k.as_api_str()).collect(),
        };
        let updates: Vec<wire::Update> = self.call("getUpdates", Some(&body)).await?;
        Ok(updates.into_iter().map(Into::into).collect())
    }

    async fn send_message(&self, req: &SendMessage) -> Result<MessageId> {
        let body = SendMessageBody {
            chat_id: req.chat_id.0,
            text: &req.text,
            parse_mode: req.parse_mode.as_api_str(),
            disable_web_page_preview: req.disable_web_page_preview,
            disable_notification: req.disable_notification,
            reply_to_message_id: req.reply_to_message_id.map(|m| m.0),
        };
        let sent: wire::Message = self.call("sendMessage", Some(&body)).await?;
        Ok(MessageId(sent.message_id))
    }
}
