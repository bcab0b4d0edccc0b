use crate::core_sandbox::Sandbox;
use crate::session::Session;
use anyhow::{Context, Result};
use log::{error, info};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

pub async fn start_server(listen_address: &str, sandbox: Arc<Sandbox>, chunk_size: usize) -> Result<()> {
    let listener = TcpListener::bind(listen_address)
        .await
        .with_context(|| format!("Failed to bind {}", listen_address))?;
    info!("Server listening on {}", listener.local_addr()?);

    serve(listener, sandbox, chunk_size).await
}

/// Accepts connections forever, one task per session.
///
/// Nothing a client does can stop this loop; accept errors are logged and
/// the loop carries on.
pub async fn serve(listener: TcpListener, sandbox: Arc<Sandbox>, chunk_size: usize) -> Result<()> {
    loop {
        let (socket, addr) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                error!("Failed to accept connection: {}", e);
                tokio::time::sleep(Duration::from_millis(100)).await;
                continue;
            }
        };
        info!("New connection from {:?}", addr);

        if let Err(e) = socket.set_nodelay(true) {
            error!("Failed to set TCP_NODELAY for {:?}: {}", addr, e);
        }

        let sandbox = Arc::clone(&sandbox);
        tokio::spawn(async move {
            Session::new(socket, sandbox, chunk_size, addr.to_string())
                .run()
                .await;
            info!("Connection closed for {:?}", addr);
        });
    }
}
