use axum::{
    extract::State,
    http::{header::AUTHORIZATION, Request},
    middleware::Next,
    response::{IntoResponse, Response},
    Extension,
};

use std::sync::Arc;

use crate::{error::ApiError, session::bearer_token, AppState, User};

/// Resolves the bearer token (if any) to a registered user and stores the
/// result as an `Option<User>` request extension.
pub async fn extract_user<B>(
    State(state): State<Arc<AppState>>,
    mut req: Request<B>,
    next: Next<B>,
) -> Response
where
    B: Send + 'static,
{
    let token = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(bearer_token)
        .unwrap_or_default()
        .to_string();

    let current_user = match state.store.authenticate(&token).await {
        Ok(username) => Some(User { username }),
        Err(_) => None,
    };

    req.extensions_mut().insert(current_user);
    next.run(req).await
}

/// Rejects requests without a known session with `401 {"error": "Unauthorized"}`.
pub async fn auth<B>(
    Extension(current_user): Extension<Option<User>>,
    mut req: Request<B>,
    next: Next<B>,
) -> Response
where
    B: Send + 'static,
{
    match current_user {
        Some(user) => {
            tracing::debug!(user = %user.username, "authenticated request");
            req.extensions_mut().insert(user);
            next.run(req).await
        }
        None => ApiError::unauthorized().into_response(),
    }
}
