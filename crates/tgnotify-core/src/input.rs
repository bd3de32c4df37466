//! Send-mode payload assembly from standard input.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::{
    domain::{ChatId, MessageId},
    errors::Error,
    ports::{BotApi, SendMessage},
    Result,
};

/// Parse a destination chat id: any non-zero integer (negative ids are groups/channels).
pub fn parse_chat_id(raw: &str) -> Result<ChatId> {
    match raw.trim().parse::<i64>() {
        Ok(0) | Err(_) => Err(Error::Config(format!("malformed destination chat: {raw:?}"))),
        Ok(id) => Ok(ChatId(id)),
    }
}

/// Read everything `reader` yields until EOF into one owned buffer.
pub async fn read_all<R: AsyncRead + Unpin + ?Sized>(reader: &mut R) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf).await?;
    Ok(buf)
}

/// Message text for raw input bytes; invalid UTF-8 sequences are replaced.
pub fn payload_text(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    }
}

/// Ask for a chat id on `writer` and read one line from `reader`.
///
/// `reader` stays usable afterwards: whatever follows the line is the message body.
pub async fn prompt_chat_id<R, W>(reader: &mut R, writer: &mut W) -> Result<ChatId>
where
    R: AsyncBufRead + Unpin + ?Sized,
    W: AsyncWrite + Unpin + ?Sized,
{
    writer.write_all(b"To: ").await?;
    writer.flush().await?;

    let mut line = String::new();
    if reader.read_line(&mut line).await? == 0 {
        return Err(Error::Config(
            "no destination chat given on standard input".to_string(),
        ));
    }
    parse_chat_id(&line)
}

/// Read `reader` to EOF and send it to `chat_id` as exactly one HTML message.
pub async fn send_input<R: AsyncRead + Unpin + ?Sized>(
    api: &dyn BotApi,
    chat_id: ChatId,
    reader: &mut R,
) -> Result<MessageId> {
    let text = payload_text(read_all(reader).await?);
    tracing::debug!(chat_id = chat_id.0, bytes = text.len(), "sending input");
    api.send_message(&SendMessage::html(chat_id, text)).await
}
