use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Bot,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkCard {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_text: Option<String>,
    /// Opaque extension data, carried through to the rendered card.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ext: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageCard {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioClip {
    pub url: String,
    /// Length in seconds, when known up front.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

/// The `type` + `content` pair of a message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "content", rename_all = "lowercase")]
pub enum MessageBody {
    Text(String),
    Link(LinkCard),
    Image(ImageCard),
    Audio(AudioClip),
}

impl MessageBody {
    pub fn text(content: impl Into<String>) -> Self {
        MessageBody::Text(content.into())
    }

    /// A body with nothing to show: empty text, or a card without a url.
    pub fn is_empty(&self) -> bool {
        match self {
            MessageBody::Text(text) => text.is_empty(),
            MessageBody::Link(card) => card.url.is_empty(),
            MessageBody::Image(card) => card.url.is_empty(),
            MessageBody::Audio(clip) => clip.url.is_empty(),
        }
    }
}

impl From<&str> for MessageBody {
    fn from(value: &str) -> Self {
        MessageBody::text(value)
    }
}

impl From<String> for MessageBody {
    fn from(value: String) -> Self {
        MessageBody::Text(value)
    }
}

/// One chat turn.
///
/// Messages stored by the backend always carry `id` and `timestamp`; messages
/// built on the client before the server confirmed them carry neither.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub role: Role,
    #[serde(flatten)]
    pub body: MessageBody,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

impl Message {
    pub fn local(role: Role, body: MessageBody) -> Self {
        Self {
            id: None,
            role,
            body,
            timestamp: None,
        }
    }

    pub fn stored(id: u64, role: Role, body: MessageBody, timestamp: i64) -> Self {
        Self {
            id: Some(id),
            role,
            body,
            timestamp: Some(timestamp),
        }
    }
}

/// One page of `GET /messages`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessagePage {
    pub data: Vec<Message>,
    pub page: i64,
    pub total: usize,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn stored_message_wire_format() {
        let message = Message::stored(1, Role::User, MessageBody::text("hi"), 1_700_000_000_000);
        assert_eq!(
            serde_json::to_value(&message).unwrap(),
            json!({
                "id": 1,
                "role": "user",
                "type": "text",
                "content": "hi",
                "timestamp": 1_700_000_000_000i64
            })
        );
    }

    #[test]
    fn structured_bodies_parse() {
        let message: Message = serde_json::from_value(json!({
            "role": "bot",
            "type": "link",
            "content": {
                "url": "https://example.test",
                "title": "Example",
                "linkText": "Open",
                "ext": {"source": "search"}
            }
        }))
        .unwrap();

        assert_eq!(message.id, None);
        assert_eq!(message.role, Role::Bot);
        match message.body {
            MessageBody::Link(card) => {
                assert_eq!(card.url, "https://example.test");
                assert_eq!(card.link_text.as_deref(), Some("Open"));
                assert_eq!(card.ext, Some(json!({"source": "search"})));
                assert_eq!(card.description, None);
            }
            other => panic!("expected a link card, got {:?}", other),
        }
    }

    #[test]
    fn empty_bodies() {
        assert!(MessageBody::text("").is_empty());
        assert!(!MessageBody::text(" ").is_empty());
        assert!(MessageBody::Image(ImageCard {
            url: String::new(),
            alt: None
        })
        .is_empty());
    }
}
