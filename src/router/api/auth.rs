use axum::{extract::State, Json};

use serde::Deserialize;
use serde_json::{json, Value};

use std::sync::Arc;

use super::extract::ApiJson;
use crate::{error::ApiError, AppState};

#[derive(Deserialize, Debug, Default)]
pub struct Credentials {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

#[axum::debug_handler]
pub async fn register(
    State(state): State<Arc<AppState>>,
    ApiJson(credentials): ApiJson<Credentials>,
) -> Result<Json<Value>, ApiError> {
    let token = state
        .store
        .register(&credentials.username, &credentials.password)
        .await?;

    tracing::debug!(user = %credentials.username, "registered");
    Ok(Json(json!({ "token": token })))
}

#[axum::debug_handler]
pub async fn login(
    State(state): State<Arc<AppState>>,
    ApiJson(credentials): ApiJson<Credentials>,
) -> Result<Json<Value>, ApiError> {
    let token = state
        .store
        .login(&credentials.username, &credentials.password)
        .await?;

    Ok(Json(json!({ "token": token })))
}
