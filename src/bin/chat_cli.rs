//! Terminal harness for the chat widget.
//!
//! Each stdin line is typed into the input and submitted with Enter. A line
//! ending in `\` is continued with Shift+Enter instead. `/more` loads the
//! next page and `/quit` exits. Appended messages are printed as the HTML
//! fragments the browser view would insert.

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use std::sync::Arc;

use chat_mock::{
    client::ChatClient,
    config::ClientConfig,
    ui::{
        session::Credentials, ChatSession, ChatState, Event, InputMetrics, Key, Labels, RenderOp,
        Renderer,
    },
};

fn print_op(renderer: &Renderer, op: RenderOp) {
    match renderer.fragment(&op) {
        Ok(Some(html)) => println!("{}", html.trim_end()),
        Ok(None) => tracing::debug!(?op, "render"),
        Err(e) => tracing::error!("failed to render {:?}: {}", op, e),
    }
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chat_mock=info,chat_cli=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{}", e);
            ::std::process::exit(1);
        }
    };
    let labels = if dotenv::var("CHAT_LOCALE").map_or(false, |l| l.starts_with("en")) {
        Labels::english()
    } else {
        Labels::default()
    };

    let renderer = match Renderer::new(labels.clone()) {
        Ok(renderer) => renderer,
        Err(e) => {
            tracing::error!("{}", e);
            ::std::process::exit(1);
        }
    };

    tracing::info!(base_url = %config.base_url, timeout = ?config.timeout, "connecting");
    let client = Arc::new(ChatClient::new(&config));
    let state = ChatState::new(InputMetrics::default(), labels);
    let mut session = ChatSession::new(client, Credentials::default(), state);

    session
        .dispatch_with(Event::Started, |op| print_op(&renderer, op))
        .await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut draft = String::new();

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                tracing::error!("failed to read stdin: {}", e);
                break;
            }
        };

        match line.trim() {
            "/quit" => break,
            "/more" => {
                session
                    .dispatch_with(Event::LoadMoreClicked, |op| print_op(&renderer, op))
                    .await;
                continue;
            }
            _ => {}
        }

        let (text, shift) = match line.strip_suffix('\\') {
            Some(text) => (text, true),
            None => (line.as_str(), false),
        };
        draft.push_str(text);

        session
            .dispatch_with(Event::InputChanged(draft.clone()), |op| print_op(&renderer, op))
            .await;
        session
            .dispatch_with(
                Event::KeyPressed {
                    key: Key::Enter,
                    shift,
                },
                |op| print_op(&renderer, op),
            )
            .await;

        draft = session.state().input.clone();
    }
}
