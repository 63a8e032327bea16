use async_trait::async_trait;

use super::{ReplyError, ReplyProvider};
use crate::data::model::MessageBody;

/// Answers text with `"Echo: <text>"` and mirrors cards unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct EchoReplyProvider;

#[async_trait]
impl ReplyProvider for EchoReplyProvider {
    async fn reply(&self, _username: &str, message: &MessageBody) -> Result<MessageBody, ReplyError> {
        Ok(match message {
            MessageBody::Text(text) => MessageBody::Text(format!("Echo: {}", text)),
            other => other.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::ImageCard;

    #[tokio::test]
    async fn echoes_text_with_prefix() {
        let reply = EchoReplyProvider
            .reply("alice", &MessageBody::text("hi"))
            .await
            .unwrap();
        assert_eq!(reply, MessageBody::text("Echo: hi"));
    }

    #[tokio::test]
    async fn mirrors_cards() {
        let image = MessageBody::Image(ImageCard {
            url: "https://example.test/cat.png".to_string(),
            alt: Some("cat".to_string()),
        });
        let reply = EchoReplyProvider.reply("alice", &image).await.unwrap();
        assert_eq!(reply, image);
    }
}
