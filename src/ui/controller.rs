use std::collections::HashSet;

use super::{
    input::{send_button_visible, InputMetrics, Overflow, CONTAINER_PADDING},
    Labels,
};
use crate::data::model::{Message, MessageBody, MessagePage, Role};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    /// At least one send is in flight. The input stays usable.
    AwaitingReply,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Other,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// The widget mounted: authenticate, then load the first page.
    Started,
    Authenticated(Result<(), String>),
    InputChanged(String),
    Focused,
    Blurred,
    KeyPressed { key: Key, shift: bool },
    SendClicked,
    LoadMoreClicked,
    WindowResized,
    PageLoaded {
        page: i64,
        result: Result<MessagePage, String>,
    },
    ReplyReceived {
        send_id: u64,
        result: Result<Message, String>,
    },
}

/// What the view should do, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderOp {
    AppendMessage(Message),
    /// A bot-styled bubble carrying an already prefixed error text.
    AppendError(String),
    ShowLoading,
    HideLoading,
    SetInput(String),
    SetInputHeight(f32),
    SetInputOverflow(Overflow),
    ToggleSendButton(bool),
    PositionSendButton { bottom: f32 },
    SetLoadMoreVisible(bool),
}

/// Network work the reducer asks for; its outcome comes back as an [`Event`].
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Authenticate,
    FetchPage(i64),
    Send { send_id: u64, body: MessageBody },
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Update {
    pub render: Vec<RenderOp>,
    pub commands: Vec<Command>,
}

impl Update {
    fn render(&mut self, op: RenderOp) {
        self.render.push(op);
    }

    fn command(&mut self, command: Command) {
        self.commands.push(command);
    }
}

/// A message shown locally that the server has not confirmed with an id.
///
/// The server numbers messages in arrival order, so its stored copy can only
/// carry an id above `after_id`, the highest id known when it was sent.
#[derive(Debug, Clone)]
struct Unconfirmed {
    send_id: u64,
    role: Role,
    body: MessageBody,
    after_id: u64,
}

impl Unconfirmed {
    fn matches(&self, message: &Message) -> bool {
        self.role == message.role
            && self.body == message.body
            && message.id.map_or(true, |id| id > self.after_id)
    }
}

#[derive(Debug, Clone)]
pub struct ChatState {
    pub messages: Vec<Message>,
    pub input: String,
    pub input_height: f32,
    pub send_visible: bool,
    pub phase: Phase,
    pub page: i64,
    pub total: usize,
    pub loaded: usize,
    pub load_more_visible: bool,
    pub last_error: Option<String>,
    metrics: InputMetrics,
    labels: Labels,
    in_flight: usize,
    next_send_id: u64,
    seen_ids: HashSet<u64>,
    unconfirmed: Vec<Unconfirmed>,
}

impl Default for ChatState {
    fn default() -> Self {
        Self::new(InputMetrics::default(), Labels::default())
    }
}

impl ChatState {
    pub fn new(metrics: InputMetrics, labels: Labels) -> Self {
        Self {
            messages: Vec::new(),
            input: String::new(),
            input_height: metrics.min_height(),
            send_visible: false,
            phase: Phase::Idle,
            page: 1,
            total: 0,
            loaded: 0,
            load_more_visible: false,
            last_error: None,
            metrics,
            labels,
            in_flight: 0,
            next_send_id: 1,
            seen_ids: HashSet::new(),
            unconfirmed: Vec::new(),
        }
    }

    pub fn labels(&self) -> &Labels {
        &self.labels
    }

    pub fn metrics(&self) -> &InputMetrics {
        &self.metrics
    }

    pub fn update(&mut self, event: Event) -> Update {
        let mut update = Update::default();

        match event {
            Event::Started => {
                self.refresh_input(&mut update);
                update.render(RenderOp::PositionSendButton {
                    bottom: CONTAINER_PADDING,
                });
                update.render(RenderOp::SetLoadMoreVisible(false));
                update.command(Command::Authenticate);
            }
            Event::Authenticated(Ok(())) => {
                update.command(Command::FetchPage(self.page));
            }
            Event::Authenticated(Err(error)) => {
                let prefix = self.labels.login_error_prefix.clone();
                self.show_error(&mut update, &prefix, error);
            }
            Event::InputChanged(text) => {
                self.input = text;
                self.refresh_input(&mut update);
            }
            Event::Focused | Event::Blurred => self.toggle_send_button(&mut update),
            Event::KeyPressed {
                key: Key::Enter,
                shift: false,
            } => self.submit(&mut update),
            Event::KeyPressed {
                key: Key::Enter,
                shift: true,
            } => {
                self.input.push('\n');
                update.render(RenderOp::SetInput(self.input.clone()));
                self.refresh_input(&mut update);
            }
            Event::KeyPressed { .. } => {}
            Event::SendClicked => self.submit(&mut update),
            Event::LoadMoreClicked => {
                self.page += 1;
                update.command(Command::FetchPage(self.page));
            }
            Event::WindowResized => update.render(RenderOp::PositionSendButton {
                bottom: CONTAINER_PADDING,
            }),
            Event::PageLoaded { page, result } => self.page_loaded(&mut update, page, result),
            Event::ReplyReceived { send_id, result } => {
                self.reply_received(&mut update, send_id, result)
            }
        }

        update
    }

    fn submit(&mut self, update: &mut Update) {
        let text = self.input.trim().to_string();
        if text.is_empty() {
            return;
        }

        let send_id = self.next_send_id;
        self.next_send_id += 1;

        let body = MessageBody::Text(text);
        let message = Message::local(Role::User, body.clone());
        self.unconfirmed.push(Unconfirmed {
            send_id,
            role: Role::User,
            body: body.clone(),
            after_id: self.highest_known_id(),
        });
        self.messages.push(message.clone());
        update.render(RenderOp::AppendMessage(message));

        self.input.clear();
        update.render(RenderOp::SetInput(String::new()));
        self.refresh_input(update);

        self.in_flight += 1;
        if self.in_flight == 1 {
            update.render(RenderOp::ShowLoading);
        }
        self.phase = Phase::AwaitingReply;
        update.command(Command::Send { send_id, body });
    }

    fn reply_received(&mut self, update: &mut Update, send_id: u64, result: Result<Message, String>) {
        self.in_flight = self.in_flight.saturating_sub(1);
        if self.in_flight == 0 {
            self.phase = Phase::Idle;
            update.render(RenderOp::HideLoading);
        }

        match result {
            Ok(reply) => {
                match reply.id {
                    // The user message is stored right before its reply.
                    Some(id) => {
                        self.seen_ids.insert(id);
                        if id > 1 {
                            self.seen_ids.insert(id - 1);
                        }
                        self.unconfirmed.retain(|m| m.send_id != send_id);
                    }
                    None => {
                        let after_id = self
                            .unconfirmed
                            .iter()
                            .find(|m| m.send_id == send_id)
                            .map_or_else(|| self.highest_known_id(), |m| m.after_id);
                        self.unconfirmed.push(Unconfirmed {
                            send_id,
                            role: reply.role,
                            body: reply.body.clone(),
                            after_id,
                        });
                    }
                }
                self.messages.push(reply.clone());
                update.render(RenderOp::AppendMessage(reply));
            }
            Err(error) => {
                // The optimistic message stays on screen but will not be
                // matched against later pages.
                self.unconfirmed.retain(|m| m.send_id != send_id);
                let prefix = self.labels.error_prefix.clone();
                self.show_error(update, &prefix, error);
            }
        }
    }

    fn page_loaded(&mut self, update: &mut Update, page: i64, result: Result<MessagePage, String>) {
        let page_data = match result {
            Ok(page_data) => page_data,
            Err(error) => {
                let prefix = self.labels.load_error_prefix.clone();
                self.show_error(update, &prefix, error);
                return;
            }
        };

        tracing::debug!(page, count = page_data.data.len(), total = page_data.total, "page loaded");
        self.total = page_data.total;
        self.loaded += page_data.data.len();

        for message in page_data.data {
            if !self.is_new(&message) {
                continue;
            }
            self.messages.push(message.clone());
            update.render(RenderOp::AppendMessage(message));
        }

        self.load_more_visible = self.loaded < self.total;
        update.render(RenderOp::SetLoadMoreVisible(self.load_more_visible));
    }

    /// Whether a message from a page is not already on screen, either by id
    /// or as a local copy still waiting for one.
    fn is_new(&mut self, message: &Message) -> bool {
        if let Some(id) = message.id {
            if !self.seen_ids.insert(id) {
                return false;
            }
        }
        match self.unconfirmed.iter().position(|m| m.matches(message)) {
            Some(index) => {
                self.unconfirmed.remove(index);
                false
            }
            None => true,
        }
    }

    fn highest_known_id(&self) -> u64 {
        let highest_seen = self.seen_ids.iter().copied().max().unwrap_or(0);
        highest_seen.max(self.total as u64)
    }

    fn show_error(&mut self, update: &mut Update, prefix: &str, error: String) {
        let text = format!("{}{}", prefix, error);
        self.last_error = Some(error);
        update.render(RenderOp::AppendError(text));
    }

    fn refresh_input(&mut self, update: &mut Update) {
        let resize = self.metrics.autosize(&self.input, self.input_height);
        if resize.changed {
            self.input_height = resize.height;
            update.render(RenderOp::SetInputHeight(resize.height));
        }
        update.render(RenderOp::SetInputOverflow(resize.overflow));
        update.render(RenderOp::PositionSendButton {
            bottom: CONTAINER_PADDING,
        });
        self.toggle_send_button(update);
    }

    fn toggle_send_button(&mut self, update: &mut Update) {
        self.send_visible = send_button_visible(&self.input);
        update.render(RenderOp::ToggleSendButton(self.send_visible));
    }
}
