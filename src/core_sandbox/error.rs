// Errors for the path sandbox
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SandboxError {
    #[error("{0} is outside the root")]
    Violation(String),
}

impl SandboxError {
    pub fn to_shell_response(&self) -> String {
        format!("permission denied: {}\n", self)
    }
}
