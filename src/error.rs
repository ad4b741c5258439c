//! Error types for quictun.

use thiserror::Error;

/// Process exit codes for fatal startup failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Normal exit
    Success = 0,
    /// Other fatal startup error
    General = 1,
    /// Listener bind failed
    ListenFailed = 10,
    /// Credential generation failed
    CredentialFailed = 11,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

/// Main error type for quictun.
///
/// Only fatal startup conditions are represented here. Session-scoped
/// failures (dial, read, write) are logged and torn down where they occur
/// and never propagate out of the relay.
#[derive(Debug, Error)]
pub enum Error {
    #[error("credential generation failed: {0}")]
    CredentialGeneration(String),

    #[error("listen failed: {0}")]
    ListenFailed(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns the exit code for this error.
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Error::CredentialGeneration(_) => ExitCode::CredentialFailed,
            Error::ListenFailed(_) => ExitCode::ListenFailed,
            Error::Config(_) => ExitCode::General,
            Error::Io(_) => ExitCode::General,
        }
    }
}

/// Result type alias for quictun operations.
pub type Result<T> = std::result::Result<T, Error>;
