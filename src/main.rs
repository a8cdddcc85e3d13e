use papaji::config::Config;
use papaji::vision::AnthropicVision;
use papaji::{build_router, AppState};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("papaji=info,tower_http=info")),
        )
        .init();

    if config.api_key.is_none() {
        tracing::warn!("ANTHROPIC_API_KEY is not set; every diagnosis will fail until it is");
    }

    let model = Arc::new(AnthropicVision::new(&config));
    let bind_addr = config.bind_addr;
    let app = build_router(AppState::new(config, model));

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;

    tracing::info!("🚀 Server running on http://{}", listener.local_addr()?);
    tracing::info!("📸 Open /papaji in your browser to diagnose a photo");

    axum::serve(listener, app).await?;
    Ok(())
}
