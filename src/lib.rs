use std::sync::Arc;

pub mod client;
pub mod config;
pub mod data;
pub mod error;
pub mod middleware;
pub mod reply;
pub mod router;
pub mod session;
pub mod ui;

use config::ResponseShape;
use data::store::ChatStore;
use reply::ReplyProvider;

pub use router::app_router;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ChatStore>,
    pub replies: Arc<dyn ReplyProvider>,
    pub response_shape: ResponseShape,
}

/// The authenticated caller, inserted by [`middleware::auth`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub username: String,
}
