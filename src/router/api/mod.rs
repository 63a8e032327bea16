use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use std::sync::Arc;

use crate::{
    middleware::{auth, extract_user},
    AppState,
};

mod auth;
use self::auth::{login, register};
mod extract;
mod messages;
use messages::{list_messages, post_message};

pub use messages::{ListParams, PostMessage};

/// Builds the chat API, mounted under `base_path` (empty for the root).
pub fn app_router(state: Arc<AppState>, base_path: &str) -> Router {
    let messages_router = Router::new()
        .route("/messages", get(list_messages).post(post_message))
        .route_layer(axum::middleware::from_fn(auth));

    let api = Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .merge(messages_router)
        .with_state(state.clone());

    let router = if base_path.is_empty() {
        api
    } else {
        Router::new().nest(base_path, api)
    };

    router
        .layer(axum::middleware::from_fn_with_state(state, extract_user))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
