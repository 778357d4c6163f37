//! Mockbird server entry point.

use clap::Parser;
use mockbird_server::{AppState, router};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "mockbird-server",
    about = "Mock API server and endpoint catalog driven by a remote OpenAPI document"
)]
struct Args {
    /// Port to listen on.
    #[arg(long, env = "PORT", default_value_t = 3000)]
    port: u16,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let app = router(AppState::new());

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", args.port)).await?;
    tracing::info!("Mockbird listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
