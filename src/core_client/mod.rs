pub mod client;
pub mod error;

pub use client::ShellClient;
pub use error::ClientError;
