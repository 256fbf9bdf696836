// src/main.rs

use std::str::FromStr;
use std::sync::Arc;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use polychat::api::create_router;
use polychat::config::GatewayConfig;
use polychat::llm::LlmRouter;
use polychat::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = GatewayConfig::from_env();

    // Initialize tracing
    let level = Level::from_str(&config.log_level).unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let (chatgpt, deepseek, gemini) = config.credential_presence();
    info!("Starting Polychat gateway v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Providers configured: chatgpt={} deepseek={} gemini={}",
        chatgpt, deepseek, gemini
    );
    if config.development {
        info!("Development mode: error responses include upstream detail");
    }

    let config = Arc::new(config);
    let llm = Arc::new(LlmRouter::from_config(&config)?);
    let state = AppState::new(config.clone(), llm);

    let app = create_router(state);

    let bind_address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!("Gateway listening on http://{}", bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
