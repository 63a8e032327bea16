//! HTTP client for the chat API.
//!
//! Every call is bounded by the configured timeout and returns a
//! [`ClientError`] instead of panicking, whatever went wrong on the way.

use reqwest::{RequestBuilder, StatusCode};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::{json, Value};
use thiserror::Error;
use tokio::sync::RwLock;

use std::time::Duration;

use crate::{
    config::ClientConfig,
    data::model::{Message, MessageBody, MessagePage, Role},
};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    #[error("{0}")]
    Network(String),

    /// A non-2xx answer; `message` is the server's `error` text when it sent
    /// one, `HTTP <status>` otherwise.
    #[error("{message}")]
    Status { status: StatusCode, message: String },

    #[error("Invalid response: {0}")]
    Decode(String),
}

impl ClientError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, ClientError::Timeout(_))
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Network(err.to_string())
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    token: String,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: String,
}

/// Either wire contract of `POST /messages`.
#[derive(Deserialize)]
struct PostResponse {
    #[serde(default)]
    reply: Option<Value>,
    #[serde(default)]
    message: Option<Value>,
}

impl PostResponse {
    fn into_message(self) -> Result<Message, ClientError> {
        let decode = |e: serde_json::Error| ClientError::Decode(e.to_string());
        match (self.reply, self.message) {
            (Some(Value::String(text)), _) => Ok(Message::local(Role::Bot, MessageBody::Text(text))),
            (Some(body), _) => Ok(Message::local(
                Role::Bot,
                serde_json::from_value(body).map_err(decode)?,
            )),
            (None, Some(Value::String(text))) => {
                Ok(Message::local(Role::Bot, MessageBody::Text(text)))
            }
            (None, Some(message)) => serde_json::from_value(message).map_err(decode),
            (None, None) => Ok(Message::local(Role::Bot, MessageBody::text(""))),
        }
    }
}

pub struct ChatClient {
    http: reqwest::Client,
    base: String,
    timeout: Duration,
    token: RwLock<Option<String>>,
}

impl ChatClient {
    pub fn new(config: &ClientConfig) -> Self {
        Self::with_base(&config.base_url, &config.base_path, config.timeout)
    }

    pub fn with_base(base_url: &str, base_path: &str, timeout: Duration) -> Self {
        Self {
            http: reqwest::Client::new(),
            base: format!("{}{}", base_url.trim_end_matches('/'), base_path),
            timeout,
            token: RwLock::new(None),
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub async fn token(&self) -> Option<String> {
        self.token.read().await.clone()
    }

    pub async fn set_token(&self, token: Option<String>) {
        *self.token.write().await = token;
    }

    /// Registers and keeps the returned token for later calls.
    pub async fn register(&self, username: &str, password: &str) -> Result<String, ClientError> {
        self.authenticate("register", username, password).await
    }

    /// Logs in and keeps the returned token for later calls.
    pub async fn login(&self, username: &str, password: &str) -> Result<String, ClientError> {
        self.authenticate("login", username, password).await
    }

    async fn authenticate(
        &self,
        endpoint: &str,
        username: &str,
        password: &str,
    ) -> Result<String, ClientError> {
        let request = self
            .http
            .post(self.url(endpoint))
            .json(&json!({ "username": username, "password": password }));

        let TokenResponse { token } = self.execute(request).await?;
        self.set_token(Some(token.clone())).await;
        Ok(token)
    }

    pub async fn fetch_messages(&self, page: i64, limit: Option<i64>) -> Result<MessagePage, ClientError> {
        let mut query = vec![("page", page.to_string())];
        if let Some(limit) = limit {
            query.push(("limit", limit.to_string()));
        }
        let request = self.http.get(self.url("messages")).query(&query);
        self.execute(request).await
    }

    /// Sends a plain string (as a text message) or a structured body and
    /// returns the bot's reply.
    pub async fn send_message(&self, message: impl Into<MessageBody>) -> Result<Message, ClientError> {
        let body: MessageBody = message.into();
        let request = self.http.post(self.url("messages")).json(&body);
        let response: PostResponse = self.execute(request).await?;
        response.into_message()
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base, endpoint)
    }

    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let request = match self.token().await {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let exchange = async {
            let response = request.send().await?;
            let status = response.status();
            let body = response.bytes().await?;
            Ok::<_, ClientError>((status, body))
        };

        // Dropping the exchange future on expiry aborts the request.
        let (status, body) = tokio::time::timeout(self.timeout, exchange)
            .await
            .map_err(|_| ClientError::Timeout(self.timeout))??;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorResponse>(&body)
                .map(|e| e.error)
                .unwrap_or_else(|_| format!("HTTP {}", status.as_u16()));
            tracing::debug!(%status, %message, "request failed");
            return Err(ClientError::Status { status, message });
        }

        serde_json::from_slice(&body).map_err(|e| ClientError::Decode(e.to_string()))
    }
}
