use async_trait::async_trait;
use serde_json::Value;
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt, BufReader, Stdin},
    sync::Mutex,
};

use super::{ReplyError, ReplyProvider};
use crate::data::model::MessageBody;

/// Waits for a person to type the bot's reply.
///
/// Each reply is one line of JSON, either `{"type": ..., "content": ...}` or
/// a bare JSON string for a text reply. Requests are answered in the order
/// they reach the input lock.
pub struct OperatorReplyProvider<R> {
    input: Mutex<R>,
}

impl OperatorReplyProvider<BufReader<Stdin>> {
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }
}

impl<R> OperatorReplyProvider<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    pub fn new(input: R) -> Self {
        Self {
            input: Mutex::new(input),
        }
    }
}

pub fn parse_reply(line: &str) -> Result<MessageBody, ReplyError> {
    let value: Value = serde_json::from_str(line.trim())?;
    match value {
        Value::String(text) => Ok(MessageBody::Text(text)),
        other => Ok(serde_json::from_value(other)?),
    }
}

#[async_trait]
impl<R> ReplyProvider for OperatorReplyProvider<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    async fn reply(&self, username: &str, message: &MessageBody) -> Result<MessageBody, ReplyError> {
        let mut input = self.input.lock().await;

        tracing::info!(
            user = username,
            message = %serde_json::to_string(message).unwrap_or_default(),
            "awaiting operator reply (one JSON line)"
        );

        let mut line = String::new();
        if input.read_line(&mut line).await? == 0 {
            return Err(ReplyError::InputClosed);
        }

        parse_reply(&line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::AudioClip;

    #[tokio::test]
    async fn reads_one_reply_per_line() {
        let input: &[u8] = b"{\"type\":\"text\",\"content\":\"first\"}\n\"second\"\n";
        let provider = OperatorReplyProvider::new(input);

        let first = provider.reply("alice", &MessageBody::text("a")).await.unwrap();
        let second = provider.reply("alice", &MessageBody::text("b")).await.unwrap();

        assert_eq!(first, MessageBody::text("first"));
        assert_eq!(second, MessageBody::text("second"));
    }

    #[tokio::test]
    async fn structured_replies() {
        let input: &[u8] =
            b"{\"type\":\"audio\",\"content\":{\"url\":\"https://example.test/a.mp3\",\"duration\":4}}\n";
        let provider = OperatorReplyProvider::new(input);

        let reply = provider.reply("alice", &MessageBody::text("play")).await.unwrap();
        assert_eq!(
            reply,
            MessageBody::Audio(AudioClip {
                url: "https://example.test/a.mp3".to_string(),
                duration: Some(4.0),
            })
        );
    }

    #[tokio::test]
    async fn malformed_lines_fail() {
        let input: &[u8] = b"not json\n{\"type\":\"video\",\"content\":\"x\"}\n";
        let provider = OperatorReplyProvider::new(input);

        assert!(matches!(
            provider.reply("alice", &MessageBody::text("a")).await,
            Err(ReplyError::Malformed(_))
        ));
        assert!(matches!(
            provider.reply("alice", &MessageBody::text("b")).await,
            Err(ReplyError::Malformed(_))
        ));
    }

    #[tokio::test]
    async fn closed_input_fails() {
        let input: &[u8] = b"";
        let provider = OperatorReplyProvider::new(input);
        assert!(matches!(
            provider.reply("alice", &MessageBody::text("a")).await,
            Err(ReplyError::InputClosed)
        ));
    }
}
