use clap::Parser;
use popcache_server::{Args, build, serve};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,popcache=debug")),
        )
        .init();

    let args = Args::parse();
    let app = build(args.origin_url.clone(), &args.node_id)?;
    let listener = TcpListener::bind(args.listen_addr).await?;

    info!(
        "Starting PoP cache server on {}, proxying to {}",
        args.listen_addr, args.origin_url
    );
    serve(listener, app, shutdown_signal()).await?;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
