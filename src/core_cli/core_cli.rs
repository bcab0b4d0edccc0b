use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments
///
/// Every server setting can also come from the environment; flags and
/// environment variables take precedence over the configuration file.
#[derive(Parser, Debug, Default)]
#[command(name = "rouilleshd", about = "A sandboxed remote filesystem shell written in Rust.")]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, env = "ROUILLESHD_CONFIG")]
    pub config: Option<PathBuf>,

    /// Address to listen on, e.g. 127.0.0.1:9091
    #[arg(short, long, env = "ROUILLESHD_LISTEN_ADDRESS")]
    pub listen_address: Option<String>,

    /// Directory exposed to clients; nothing outside it is reachable
    #[arg(short, long, env = "ROUILLESHD_ROOT")]
    pub root: Option<PathBuf>,

    /// Largest data chunk sent in a transfer frame, in bytes
    #[arg(long, env = "ROUILLESHD_CHUNK_SIZE")]
    pub chunk_size: Option<usize>,

    /// Enable verbose mode
    #[arg(short, long)]
    pub verbose: bool,
}
