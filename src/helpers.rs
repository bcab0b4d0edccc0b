use crate::config::Config;
use colored::*;
use env_logger::{Builder, Env};
use log::info;
use std::io::Write;

/// Initializes the logger with a custom format and coloured levels.
///
/// `RUST_LOG` wins over `default_filter`.
pub fn init_logger(default_filter: &str) {
    Builder::from_env(Env::default().default_filter_or(default_filter))
        .format(|buf, record| {
            let timestamp = buf.timestamp().to_string();
            let level = match record.level() {
                log::Level::Error => record.level().to_string().red(),
                log::Level::Warn => record.level().to_string().yellow(),
                log::Level::Info => record.level().to_string().green(),
                log::Level::Debug => record.level().to_string().blue(),
                log::Level::Trace => record.level().to_string().white(),
            };
            writeln!(buf, "[{}] [{}] {}", timestamp, level, record.args())
        })
        .init();
}

// Helper function to log configuration options
pub fn log_config(config: &Config) {
    info!("  Listen Address: {}", config.server.listen_address);
    info!("  Root Directory: {}", config.server.root.display());
    info!("  Chunk Size: {} bytes", config.server.chunk_size);
}
