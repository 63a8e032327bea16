//! Chat widget logic without a DOM.
//!
//! [`controller::ChatState`] is a reducer: it takes an [`controller::Event`]
//! and answers with render instructions plus the network commands to run.
//! [`session::ChatSession`] runs those commands through the HTTP client and
//! feeds the results back in; [`render::Renderer`] turns messages into HTML.

pub mod controller;
pub mod input;
pub mod render;
pub mod session;

pub use controller::{ChatState, Command, Event, Key, Phase, RenderOp, Update};
pub use input::{InputMetrics, Overflow};
pub use render::Renderer;
pub use session::ChatSession;

/// User-facing strings of the widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Labels {
    pub error_prefix: String,
    pub load_error_prefix: String,
    pub login_error_prefix: String,
    pub loading: String,
    pub just_now: String,
    pub default_link_text: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            error_prefix: "错误：".to_string(),
            load_error_prefix: "加载失败：".to_string(),
            login_error_prefix: "登录失败：".to_string(),
            loading: "AI 正在输入...".to_string(),
            just_now: "刚刚".to_string(),
            default_link_text: "查看详情 →".to_string(),
        }
    }
}

impl Labels {
    pub fn english() -> Self {
        Self {
            error_prefix: "Error: ".to_string(),
            load_error_prefix: "Failed to load: ".to_string(),
            login_error_prefix: "Login failed: ".to_string(),
            loading: "AI is typing...".to_string(),
            just_now: "just now".to_string(),
            default_link_text: "View details →".to_string(),
        }
    }
}
