pub mod error;
pub mod sandbox;

pub use error::SandboxError;
pub use sandbox::{clean_path, ResolvedPath, Sandbox};
