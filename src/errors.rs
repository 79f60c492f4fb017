//! Typed errors for authy CLI invocations.
//!
//! The numeric exit code is the primary discriminator: it selects the
//! [`AuthyError`] variant. The string error token from the `--json`
//! envelope is preserved on the variant for finer-grained inspection,
//! since the CLI may grow new tokens faster than new exit codes.

use serde::Deserialize;
use thiserror::Error;

/// Error token the CLI reports when no vault has been created yet.
pub(crate) const CODE_VAULT_NOT_INITIALIZED: &str = "vault_not_initialized";

/// Structured failure payload carried by every mapped CLI error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    /// Exit code of the failed invocation.
    pub exit_code: i32,

    /// Machine-readable error token (e.g. `"not_found"`).
    pub code: String,

    /// Human-readable message from the CLI.
    pub message: String,
}

impl std::fmt::Display for Failure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// All errors that can occur in the authy client.
#[derive(Debug, Error)]
pub enum AuthyError {
    /// The authy executable could not be found. Raised before any
    /// process is spawned, and never conflated with a vault-level error.
    #[error("authy binary not found on PATH (install authy or pass an explicit path)")]
    BinaryNotFound,

    /// The executable exists but the OS failed to start it.
    #[error("failed to spawn {binary}: {source}")]
    Spawn {
        binary: std::path::PathBuf,
        source: std::io::Error,
    },

    /// Supplied credentials were rejected (exit code 2).
    #[error("authentication failed: {0}")]
    AuthFailed(Failure),

    /// No secret with the requested name exists (exit code 3).
    #[error("secret not found: {0}")]
    NotFound(Failure),

    /// The operation was blocked by an access policy (exit code 4).
    #[error("access denied: {0}")]
    PolicyDenied(Failure),

    /// Store without `force` collided with an existing name (exit code 5).
    #[error("secret already exists: {0}")]
    AlreadyExists(Failure),

    /// No vault has been created yet (exit code 7).
    #[error("vault not initialized: {0}")]
    VaultNotInitialized(Failure),

    /// Any other exit code, or a failure whose stderr could not be
    /// parsed as the structured envelope. Carries the raw exit code and
    /// the trimmed stderr text (or a synthesized message when empty).
    #[error("authy exited with code {}: {}", .0.exit_code, .0.message)]
    Cli(Failure),

    /// A zero exit whose stdout failed to parse as one JSON object.
    /// The binary violated the wire contract; this is not a domain error.
    #[error("invalid JSON on stdout: {0}")]
    Protocol(String),

    /// IO error while feeding stdin or collecting output.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AuthyError {
    /// The structured failure payload, when this error was mapped from
    /// a finished CLI invocation.
    pub fn failure(&self) -> Option<&Failure> {
        match self {
            AuthyError::AuthFailed(f)
            | AuthyError::NotFound(f)
            | AuthyError::PolicyDenied(f)
            | AuthyError::AlreadyExists(f)
            | AuthyError::VaultNotInitialized(f)
            | AuthyError::Cli(f) => Some(f),
            _ => None,
        }
    }

    /// The string error token, when the CLI reported one.
    pub fn code(&self) -> Option<&str> {
        self.failure().map(|f| f.code.as_str())
    }

    /// The exit code, when this error came from a finished invocation.
    pub fn exit_code(&self) -> Option<i32> {
        self.failure().map(|f| f.exit_code)
    }
}

/// Convenience type alias for authy client results.
pub type Result<T> = std::result::Result<T, AuthyError>;

// ---------------------------------------------------------------------------
// Error envelope parsing and classification
// ---------------------------------------------------------------------------

/// The `{"error": {...}}` envelope printed on stderr in `--json` mode.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

/// Inner body of the error envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub code: String,
    pub message: String,
}

/// Parse the structured error envelope from stderr, if present.
pub(crate) fn parse_envelope(stderr: &str) -> Option<ErrorBody> {
    serde_json::from_str::<ErrorEnvelope>(stderr)
        .ok()
        .map(|envelope| envelope.error)
}

/// Select the error variant for a classified failure.
///
/// Pure over `(exit_code, code, message)`, so the whole taxonomy can be
/// exercised without spawning a process.
pub(crate) fn classify(exit_code: i32, code: String, message: String) -> AuthyError {
    let failure = Failure {
        exit_code,
        code,
        message,
    };
    match exit_code {
        2 => AuthyError::AuthFailed(failure),
        3 => AuthyError::NotFound(failure),
        4 => AuthyError::PolicyDenied(failure),
        5 => AuthyError::AlreadyExists(failure),
        7 => AuthyError::VaultNotInitialized(failure),
        _ => AuthyError::Cli(failure),
    }
}

/// Map a failed invocation's stderr to a typed error.
///
/// A well-formed envelope is classified by exit code. Anything else
/// becomes the generic [`AuthyError::Cli`] carrying the trimmed raw
/// text, with the token synthesized from the exit code alone.
pub(crate) fn map_failure(exit_code: i32, stderr: &str) -> AuthyError {
    match parse_envelope(stderr) {
        Some(body) => classify(exit_code, body.code, body.message),
        None => {
            let trimmed = stderr.trim();
            let message = if trimmed.is_empty() {
                format!("authy exited with code {exit_code}")
            } else {
                trimmed.to_string()
            };
            AuthyError::Cli(Failure {
                exit_code,
                code: fallback_code(exit_code).to_string(),
                message,
            })
        }
    }
}

/// Best-effort token for an exit code when stderr carried no envelope.
fn fallback_code(exit_code: i32) -> &'static str {
    match exit_code {
        1 => "internal_error",
        2 => "auth_failed",
        3 => "not_found",
        4 => "access_denied",
        5 => "already_exists",
        6 => "invalid_token",
        7 => "vault_not_initialized",
        _ => "unknown_error",
    }
}
