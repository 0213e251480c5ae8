use anyhow::{Context, Result};
use clap::Parser;
use cura_postprocess::config::Args;
use cura_postprocess::{PluginState, metadata, serve};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cura_postprocess=info".into()),
        )
        .init();

    let args = Args::parse();
    let endpoint = args.endpoint();

    let listener = TcpListener::bind((args.address.as_str(), args.port))
        .await
        .with_context(|| format!("failed to bind {endpoint}"))?;
    let local_addr = listener.local_addr()?;
    tracing::info!(
        "{} listening addr={local_addr} annotate_setting={}",
        metadata::version_id(),
        args.annotate_setting,
    );

    let state = PluginState::new(&args.annotate_setting);
    serve(listener, state, async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => tracing::info!("shutting down"),
            Err(e) => tracing::error!("failed to listen for ctrl-c, shutting down: {e}"),
        }
    })
    .await
    .context("plugin server failed")?;

    Ok(())
}
