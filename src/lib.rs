//! Rust client for the authy secrets manager.
//!
//! Wraps the `authy` CLI binary as a subprocess peer: a request is an
//! argument vector plus an optional stdin payload, a response is an exit
//! code and two captured output streams. All invocations use `--json`
//! mode, secret values travel over stdin only, and CLI failures surface
//! as the typed [`AuthyError`] enum so callers can branch on kind.
//!
//! # Quick start
//!
//! ```no_run
//! use authy_client::Authy;
//!
//! # fn main() -> authy_client::Result<()> {
//! let client = Authy::new()?.passphrase("vault-passphrase");
//! client.store("db-url", "postgres://localhost/mydb", false)?;
//! assert_eq!(client.get("db-url")?, "postgres://localhost/mydb");
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod credentials;
pub mod errors;
pub mod invoke;
pub mod response;
pub mod secret;

pub use client::Authy;
pub use credentials::Credentials;
pub use errors::{AuthyError, Failure, Result};
pub use invoke::InvocationOutput;
pub use secret::{Secret, SecretSummary};
