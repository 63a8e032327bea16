//! Strategies that produce the bot's answer to a user message.

use async_trait::async_trait;
use thiserror::Error;

use crate::data::model::MessageBody;

mod echo;
mod operator;

pub use echo::EchoReplyProvider;
pub use operator::OperatorReplyProvider;

#[derive(Debug, Error)]
pub enum ReplyError {
    #[error("Invalid reply JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Reply input closed")]
    InputClosed,

    #[error("Failed to read reply: {0}")]
    Io(#[from] std::io::Error),
}

#[async_trait]
pub trait ReplyProvider: Send + Sync {
    async fn reply(&self, username: &str, message: &MessageBody) -> Result<MessageBody, ReplyError>;
}
