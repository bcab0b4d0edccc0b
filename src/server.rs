use crate::config::Config;
use crate::core_network::network;
use crate::core_sandbox::Sandbox;
use crate::helpers::log_config;
use anyhow::Result;
use log::{error, info};
use std::sync::Arc;

/// Runs the shell server with the provided configuration.
///
/// The root is resolved once here and shared read-only with every session.
/// Only startup failures (bad root, bind error) are returned.
pub async fn run(config: Config) -> Result<()> {
    info!("Starting server with config:");
    log_config(&config);

    let root = config.resolve_root()?;
    info!("Sessions are confined to {}", root.display());
    let sandbox = Arc::new(Sandbox::new(root));

    match network::start_server(&config.server.listen_address, sandbox, config.server.chunk_size).await
    {
        Ok(_) => Ok(()),
        Err(e) => {
            error!("Failed to start server: {}", e);
            Err(e)
        }
    }
}
