mod chat_api;
mod config;
mod message;
mod routes;
mod session;
mod state;

use std::sync::Arc;

use chat_api::ChatClient;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = config::AppConfig::from_env().expect("invalid server config");

    // Missing webhook is non-fatal: the transcript still renders, sends fail.
    let sender = match ChatClient::from_env() {
        Ok(client) => client,
        Err(e) => {
            tracing::warn!(error = %e, "chat webhook not configured — every send will fail");
            ChatClient::unconfigured()
        }
    };

    tracing::info!(configured = sender.is_configured(), "chat sender ready");

    let session = Arc::new(session::ChatSession::new(Arc::new(sender), config.greeting.clone()));
    let state = state::AppState::new(session, config.max_input_chars, config.suggestions.clone());

    let app = routes::app(state, config.static_dir.as_deref());
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port))
        .await
        .expect("failed to bind");

    tracing::info!(port = config.port, "chatline listening");
    axum::serve(listener, app).await.expect("server failed");
}
