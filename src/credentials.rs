//! Credential material forwarded to the authy child process.

use std::fmt;
use std::path::PathBuf;

use zeroize::Zeroizing;

/// Environment variable the authy CLI reads the vault passphrase from.
pub const AUTHY_PASSPHRASE: &str = "AUTHY_PASSPHRASE";

/// Environment variable the authy CLI reads the keyfile path from.
pub const AUTHY_KEYFILE: &str = "AUTHY_KEYFILE";

/// Optional passphrase and/or keyfile for vault authentication.
///
/// The entries are merged on top of the ambient environment for the
/// duration of a single child invocation only; the calling process
/// environment is never modified.
#[derive(Default, Clone)]
pub struct Credentials {
    /// Vault passphrase, wiped from memory on drop.
    passphrase: Option<Zeroizing<String>>,

    /// Path to a keyfile accepted by the CLI as an alternative credential.
    keyfile: Option<PathBuf>,
}

impl Credentials {
    /// Empty credentials: the child inherits the ambient environment as-is.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the vault passphrase.
    pub fn with_passphrase(mut self, passphrase: impl Into<String>) -> Self {
        self.passphrase = Some(Zeroizing::new(passphrase.into()));
        self
    }

    /// Set the keyfile path.
    pub fn with_keyfile(mut self, path: impl Into<PathBuf>) -> Self {
        self.keyfile = Some(path.into());
        self
    }

    /// Environment overlay containing only the entries actually supplied.
    pub(crate) fn env_overlay(&self) -> Vec<(&'static str, String)> {
        let mut env = Vec::new();
        if let Some(passphrase) = &self.passphrase {
            env.push((AUTHY_PASSPHRASE, passphrase.as_str().to_owned()));
        }
        if let Some(keyfile) = &self.keyfile {
            env.push((AUTHY_KEYFILE, keyfile.display().to_string()));
        }
        env
    }
}

// Manual impl so the passphrase never reaches logs or error output.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("passphrase", &self.passphrase.as_ref().map(|_| "<redacted>"))
            .field("keyfile", &self.keyfile)
            .finish()
    }
}
