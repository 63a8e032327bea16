use std::{collections::VecDeque, sync::Arc};

use super::controller::{ChatState, Command, Event, RenderOp};
use crate::client::{ChatClient, ClientError};

/// Credentials the widget signs in with on start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            username: "demo".to_string(),
            password: "password".to_string(),
        }
    }
}

/// Runs a [`ChatState`] against the chat API.
///
/// Render instructions are handed to the sink as soon as the reducer emits
/// them, so the optimistic echo of a send reaches the view before the
/// request goes out.
pub struct ChatSession {
    client: Arc<ChatClient>,
    credentials: Credentials,
    page_limit: Option<i64>,
    state: ChatState,
}

impl ChatSession {
    pub fn new(client: Arc<ChatClient>, credentials: Credentials, state: ChatState) -> Self {
        Self {
            client,
            credentials,
            page_limit: None,
            state,
        }
    }

    pub fn with_page_limit(mut self, limit: i64) -> Self {
        self.page_limit = Some(limit);
        self
    }

    pub fn state(&self) -> &ChatState {
        &self.state
    }

    /// Feeds `event` (and every event its commands produce) through the
    /// reducer, collecting the render instructions.
    pub async fn dispatch(&mut self, event: Event) -> Vec<RenderOp> {
        let mut rendered = Vec::new();
        self.dispatch_with(event, |op| rendered.push(op)).await;
        rendered
    }

    pub async fn dispatch_with<F>(&mut self, event: Event, mut sink: F)
    where
        F: FnMut(RenderOp),
    {
        let mut events = VecDeque::from([event]);

        while let Some(event) = events.pop_front() {
            let update = self.state.update(event);
            update.render.into_iter().for_each(&mut sink);
            for command in update.commands {
                events.push_back(self.run(command).await);
            }
        }
    }

    async fn run(&self, command: Command) -> Event {
        match command {
            Command::Authenticate => Event::Authenticated(self.authenticate().await),
            Command::FetchPage(page) => Event::PageLoaded {
                page,
                result: self
                    .client
                    .fetch_messages(page, self.page_limit)
                    .await
                    .map_err(|e| e.to_string()),
            },
            Command::Send { send_id, body } => Event::ReplyReceived {
                send_id,
                result: self.client.send_message(body).await.map_err(|e| e.to_string()),
            },
        }
    }

    /// Registers the demo user, falling back to a login when it already
    /// exists.
    async fn authenticate(&self) -> Result<(), String> {
        let Credentials { username, password } = &self.credentials;
        match self.client.register(username, password).await {
            Ok(_) => Ok(()),
            Err(ClientError::Status { message, .. }) if message == "User exists" => self
                .client
                .login(username, password)
                .await
                .map(|_| ())
                .map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        }
    }
}
