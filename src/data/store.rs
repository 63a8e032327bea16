use std::collections::HashMap;

use tokio::sync::RwLock;

use super::model::{Message, MessageBody, MessagePage, Role};
use crate::{config::StoreScope, error::ApiError, session};

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 20;

/// In-memory users and messages for the mock backend.
///
/// Built once at startup and shared through `AppState`; everything is lost
/// when the process exits.
pub struct ChatStore {
    scope: StoreScope,
    users: RwLock<HashMap<String, String>>,
    messages: RwLock<MessageLog>,
}

#[derive(Default)]
struct MessageLog {
    global: Vec<Message>,
    per_user: HashMap<String, Vec<Message>>,
}

impl MessageLog {
    fn sequence(&self, scope: StoreScope, username: &str) -> &[Message] {
        match scope {
            StoreScope::Global => &self.global,
            StoreScope::PerUser => self
                .per_user
                .get(username)
                .map(Vec::as_slice)
                .unwrap_or(&[]),
        }
    }

    fn sequence_mut(&mut self, scope: StoreScope, username: &str) -> &mut Vec<Message> {
        match scope {
            StoreScope::Global => &mut self.global,
            StoreScope::PerUser => self.per_user.entry(username.to_string()).or_default(),
        }
    }
}

impl ChatStore {
    pub fn new(scope: StoreScope) -> Self {
        Self {
            scope,
            users: RwLock::new(HashMap::new()),
            messages: RwLock::new(MessageLog::default()),
        }
    }

    pub async fn register(&self, username: &str, password: &str) -> Result<String, ApiError> {
        if username.is_empty() || password.is_empty() {
            return Err(ApiError::Validation(
                "Missing username or password".to_string(),
            ));
        }

        let mut users = self.users.write().await;
        if users.contains_key(username) {
            return Err(ApiError::Conflict("User exists".to_string()));
        }
        users.insert(username.to_string(), password.to_string());
        drop(users);

        if self.scope == StoreScope::PerUser {
            self.messages
                .write()
                .await
                .per_user
                .entry(username.to_string())
                .or_default();
        }

        Ok(session::encode_token(username))
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<String, ApiError> {
        let users = self.users.read().await;
        match users.get(username) {
            Some(stored) if stored == password => Ok(session::encode_token(username)),
            _ => Err(ApiError::Auth("Invalid credentials".to_string())),
        }
    }

    /// Resolves a session token to the registered username it encodes.
    pub async fn authenticate(&self, token: &str) -> Result<String, ApiError> {
        let username = session::decode_token(token).ok_or_else(ApiError::unauthorized)?;
        if self.users.read().await.contains_key(&username) {
            Ok(username)
        } else {
            Err(ApiError::unauthorized())
        }
    }

    pub async fn list_messages(&self, username: &str, page: i64, limit: i64) -> MessagePage {
        let log = self.messages.read().await;
        let messages = log.sequence(self.scope, username);
        let start = page.saturating_sub(1).saturating_mul(limit);
        let end = start.saturating_add(limit);
        let (from, to) = slice_bounds(messages.len(), start, end);

        MessagePage {
            data: messages[from..to].to_vec(),
            page,
            total: messages.len(),
        }
    }

    pub async fn total(&self, username: &str) -> usize {
        self.messages.read().await.sequence(self.scope, username).len()
    }

    /// Appends a user message and its reply back to back.
    ///
    /// Both land under one write lock, so no other exchange can slip between
    /// them. Returns the stored reply.
    pub async fn append_exchange(
        &self,
        username: &str,
        user_body: MessageBody,
        user_timestamp: i64,
        reply_body: MessageBody,
        reply_timestamp: i64,
    ) -> Message {
        let mut log = self.messages.write().await;
        let messages = log.sequence_mut(self.scope, username);

        let user_message = Message::stored(
            messages.len() as u64 + 1,
            Role::User,
            user_body,
            user_timestamp,
        );
        messages.push(user_message);

        let reply = Message::stored(
            messages.len() as u64 + 1,
            Role::Bot,
            reply_body,
            reply_timestamp,
        );
        messages.push(reply.clone());

        reply
    }
}

/// Resolves `[start, end)` against a sequence of `len` items the way an
/// array slice does: negative bounds count from the back, everything is
/// clamped to `[0, len]`, and a reversed range is empty.
pub fn slice_bounds(len: usize, start: i64, end: i64) -> (usize, usize) {
    let len_i = len as i64;
    let resolve = |bound: i64| -> usize {
        let absolute = if bound < 0 {
            bound.saturating_add(len_i).max(0)
        } else {
            bound.min(len_i)
        };
        absolute as usize
    };

    let from = resolve(start);
    let to = resolve(end);
    if to <= from {
        (from, from)
    } else {
        (from, to)
    }
}
