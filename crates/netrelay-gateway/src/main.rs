use clap::Parser;
use netrelay_agent::{client::ResponseClient, gemini::GeminiProvider};
use netrelay_core::config::RelayConfig;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

mod app;
mod http;
mod ws;

#[derive(Parser, Debug)]
#[command(name = "netrelay-gateway", about = "AI turn relay gateway")]
struct Args {
    /// Path to netrelay.toml (default: ~/.netrelay/netrelay.toml).
    #[arg(long)]
    config: Option<String>,

    /// Override the listening port.
    #[arg(long)]
    port: Option<u16>,

    /// Override the bind address.
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "netrelay_gateway=info,tower_http=debug".into()),
        )
        .init();

    let args = Args::parse();

    let mut config = RelayConfig::load(args.config.as_deref()).unwrap_or_else(|e| {
        tracing::warn!("Config load failed ({}), using defaults", e);
        RelayConfig::default()
    });
    if let Some(port) = args.port {
        config.gateway.port = port;
    }
    if let Some(bind) = args.bind {
        config.gateway.bind = bind;
    }

    // A missing AI credential is structurally fatal — halt startup rather
    // than fail every turn at runtime.
    config.validate()?;

    let provider = GeminiProvider::new(
        config.ai.key.clone(),
        config.ai.model.clone(),
        Some(config.ai.endpoint.clone()),
    );
    let ai = ResponseClient::new(Box::new(provider));

    let addr: SocketAddr = format!("{}:{}", config.gateway.bind, config.gateway.port).parse()?;
    let state = Arc::new(app::AppState::new(config, ai));
    let router = app::build_router(state);

    info!(%addr, "netrelay gateway listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
