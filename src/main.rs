use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use std::{net::SocketAddr, sync::Arc};

use chat_mock::{
    app_router,
    config::{ReplyMode, ServerConfig},
    data::store::ChatStore,
    reply::{EchoReplyProvider, OperatorReplyProvider, ReplyProvider},
    AppState,
};

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chat_mock=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{}", e);
            ::std::process::exit(1);
        }
    };

    let replies: Arc<dyn ReplyProvider> = match config.reply_mode {
        ReplyMode::Echo => Arc::new(EchoReplyProvider),
        ReplyMode::Operator => Arc::new(OperatorReplyProvider::stdin()),
    };

    let state = AppState {
        store: Arc::new(ChatStore::new(config.store_scope)),
        replies,
        response_shape: config.response_shape,
    };
    let shared_app_state = Arc::new(state);

    let app = app_router(shared_app_state, &config.base_path);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Mock API server listening on port {}", config.port);
    tracing::debug!(
        base_path = %config.base_path,
        scope = ?config.store_scope,
        replies = ?config.reply_mode,
        contract = %config.response_shape,
        "api configured"
    );

    if let Err(e) = axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!("server error: {}", e);
        ::std::process::exit(1);
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::info!("shutting down");
    }
}
