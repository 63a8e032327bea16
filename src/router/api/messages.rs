use axum::{
    extract::{Extension, Query, State},
    Json,
};

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use std::sync::Arc;

use super::extract::ApiJson;
use crate::{
    config::ResponseShape,
    data::{
        model::{MessageBody, MessagePage},
        store::{DEFAULT_LIMIT, DEFAULT_PAGE},
    },
    error::ApiError,
    AppState, User,
};

/// Raw `?page&limit`; anything that is not a non-zero integer falls back to
/// the defaults.
#[derive(Deserialize, Serialize, Debug, Default)]
pub struct ListParams {
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl ListParams {
    pub fn page(&self) -> i64 {
        leading_int(self.page.as_deref()).unwrap_or(DEFAULT_PAGE)
    }

    pub fn limit(&self) -> i64 {
        leading_int(self.limit.as_deref()).unwrap_or(DEFAULT_LIMIT)
    }
}

/// Parses the leading (optionally signed) digits of `raw`; zero counts as
/// absent.
fn leading_int(raw: Option<&str>) -> Option<i64> {
    let raw = raw?.trim_start();
    let sign_len = usize::from(raw.starts_with('-') || raw.starts_with('+'));
    let digits = raw[sign_len..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    raw[..sign_len + digits]
        .parse::<i64>()
        .ok()
        .filter(|n| *n != 0)
}

/// Body of `POST /messages`: either `{"message": ...}` or `{"type", "content"}`.
#[derive(Deserialize, Serialize, Debug, Default)]
pub struct PostMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Value>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Value>,
}

impl PostMessage {
    pub fn into_body(self) -> Result<MessageBody, ApiError> {
        let body = match (self.kind, self.content, self.message) {
            (Some(kind), Some(content), _) => {
                serde_json::from_value(json!({ "type": kind, "content": content }))
                    .map_err(|e| ApiError::Validation(e.to_string()))?
            }
            (None, _, Some(Value::String(text))) => MessageBody::Text(text),
            (None, _, Some(Value::Bool(true))) => MessageBody::text("true"),
            (None, _, Some(Value::Number(n))) if n.as_f64() != Some(0.0) => {
                MessageBody::Text(n.to_string())
            }
            (None, _, Some(other @ Value::Object(_))) => serde_json::from_value(other)
                .map_err(|e| ApiError::Validation(e.to_string()))?,
            _ => return Err(message_required()),
        };

        if body.is_empty() {
            return Err(message_required());
        }
        Ok(body)
    }
}

fn message_required() -> ApiError {
    ApiError::Validation("Message required".to_string())
}

#[axum::debug_handler]
pub async fn list_messages(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Query(params): Query<ListParams>,
) -> Json<MessagePage> {
    let page = state
        .store
        .list_messages(&current_user.username, params.page(), params.limit())
        .await;

    Json(page)
}

#[axum::debug_handler]
pub async fn post_message(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    ApiJson(post): ApiJson<PostMessage>,
) -> Result<Json<Value>, ApiError> {
    let body = post.into_body()?;
    let received_at = chrono::Utc::now().timestamp_millis();

    let reply_body = state.replies.reply(&current_user.username, &body).await?;

    let reply = state
        .store
        .append_exchange(
            &current_user.username,
            body,
            received_at,
            reply_body,
            chrono::Utc::now().timestamp_millis(),
        )
        .await;

    let response = match state.response_shape {
        ResponseShape::Reply => match reply.body {
            MessageBody::Text(text) => json!({ "reply": text }),
            body => json!({ "reply": body }),
        },
        ResponseShape::Message => json!({ "message": reply }),
    };
    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(page: Option<&str>, limit: Option<&str>) -> ListParams {
        ListParams {
            page: page.map(str::to_string),
            limit: limit.map(str::to_string),
        }
    }

    #[test]
    fn paging_defaults() {
        assert_eq!(params(None, None).page(), 1);
        assert_eq!(params(None, None).limit(), 20);
        assert_eq!(params(Some("0"), Some("abc")).page(), 1);
        assert_eq!(params(Some("0"), Some("abc")).limit(), 20);
        assert_eq!(params(Some("3"), Some("5")).page(), 3);
        assert_eq!(params(Some("2px"), Some(" 7")).page(), 2);
        assert_eq!(params(Some("2px"), Some(" 7")).limit(), 7);
        assert_eq!(params(Some("-1"), None).page(), -1);
        assert_eq!(params(Some("-"), None).page(), 1);
    }

    #[test]
    fn post_bodies() {
        let legacy = PostMessage {
            message: Some(json!("hi")),
            ..Default::default()
        };
        assert_eq!(legacy.into_body().unwrap(), MessageBody::text("hi"));

        let structured = PostMessage {
            kind: Some("link".to_string()),
            content: Some(json!({"url": "https://example.test"})),
            ..Default::default()
        };
        assert!(matches!(structured.into_body().unwrap(), MessageBody::Link(_)));

        let nested = PostMessage {
            message: Some(json!({"type": "text", "content": "nested"})),
            ..Default::default()
        };
        assert_eq!(nested.into_body().unwrap(), MessageBody::text("nested"));

        let unknown = PostMessage {
            kind: Some("video".to_string()),
            content: Some(json!("x")),
            ..Default::default()
        };
        assert!(matches!(unknown.into_body(), Err(ApiError::Validation(_))));

        assert_eq!(
            PostMessage::default().into_body(),
            Err(ApiError::Validation("Message required".to_string()))
        );
    }
    #[test]
    fn scalar_messages_become_text() {
        let post = |value: Value| PostMessage {
            message: Some(value),
            ..Default::default()
        };
        assert_eq!(post(json!(123)).into_body().unwrap(), MessageBody::text("123"));
        assert_eq!(post(json!(1.5)).into_body().unwrap(), MessageBody::text("1.5"));
        assert_eq!(post(json!(true)).into_body().unwrap(), MessageBody::text("true"));

        for falsy in [json!(0), json!(false), json!(null), json!("")] {
            assert_eq!(
                post(falsy).into_body(),
                Err(ApiError::Validation("Message required".to_string()))
            );
        }
    }
}
