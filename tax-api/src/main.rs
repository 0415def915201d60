use anyhow::{Context, Result};
use clap::Parser;
use tax_api::config::Cli;
use tax_api::{AppState, app, logging, router};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_tracing();
    let cli = Cli::parse();

    let repo = app::open_repository(&cli.db_config(), cli.seeds.as_deref()).await?;
    let app = router(AppState::new(repo));

    let addr = cli.bind_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Starting municipal tax API on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for Ctrl-C");
    }
}
