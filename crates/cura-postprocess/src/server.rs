use crate::error::PluginError;
use crate::service::{
    BroadcastServiceImpl, HandshakeServiceImpl, PluginState, PostprocessServiceImpl,
};
use anyhow::{Context, Result};
use cura_postprocess_proto::broadcast::v0::broadcast_service_server::BroadcastServiceServer;
use cura_postprocess_proto::handshake::v0::handshake_service_server::HandshakeServiceServer;
use cura_postprocess_proto::postprocess::v0::postprocess_modify_service_server::PostprocessModifyServiceServer;
use std::future::Future;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::Server;

/// Serve the handshake, settings broadcast and postprocess slots on
/// `listener` until `shutdown` resolves.
///
/// Calls on the three slots are dispatched independently; a failed exchange
/// never stops the server. In-flight calls finish before this returns.
pub async fn serve<F>(
    listener: TcpListener,
    state: PluginState,
    shutdown: F,
) -> Result<(), PluginError>
where
    F: Future<Output = ()> + Send,
{
    Server::builder()
        .add_service(HandshakeServiceServer::new(HandshakeServiceImpl {
            state: state.clone(),
        }))
        .add_service(BroadcastServiceServer::new(BroadcastServiceImpl {
            state: state.clone(),
        }))
        .add_service(PostprocessModifyServiceServer::new(PostprocessServiceImpl {
            state,
        }))
        .serve_with_incoming_shutdown(TcpListenerStream::new(listener), shutdown)
        .await?;
    Ok(())
}

/// Spawn the plugin on a random local port.
/// Returns the bound address and a shutdown handle.
pub async fn spawn_plugin(state: PluginState) -> Result<(SocketAddr, oneshot::Sender<()>)> {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .context("failed to bind plugin")?;
    let local_addr = listener.local_addr()?;

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    tokio::spawn(async move {
        let shutdown = async {
            let _ = shutdown_rx.await;
        };
        if let Err(e) = serve(listener, state, shutdown).await {
            tracing::error!("plugin server failed: {e}");
        }
    });

    Ok((local_addr, shutdown_tx))
}
