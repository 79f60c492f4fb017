//! The `Authy` client facade.
//!
//! Composes credential scoping, process invocation, response decoding,
//! and error mapping into the public operations. Every operation spawns
//! exactly one child process (rotation spawns two, see [`Authy::rotate`])
//! and blocks until it exits.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use crate::credentials::Credentials;
use crate::errors::{self, AuthyError, Result};
use crate::invoke::{self, InvocationOutput};
use crate::response;
use crate::secret::{ListResponse, Secret, SecretSummary};

/// Name of the authy executable looked up on PATH.
const BINARY_NAME: &str = "authy";

/// Deliberately nonexistent name used by the initialization probe.
const PROBE_NAME: &str = "__probe";

/// Client for the authy secrets manager.
///
/// Wraps the `authy` binary as a subprocess, using `--json` output for
/// structured communication. Secret values always travel over stdin,
/// never as command-line arguments.
///
/// The client holds no mutable state beyond the binary path and the
/// credentials captured at construction, so it can be shared freely
/// across threads; concurrent operations each spawn an independent
/// child process.
///
/// ```no_run
/// use authy_client::Authy;
///
/// # fn main() -> authy_client::Result<()> {
/// let client = Authy::new()?.keyfile("/etc/authy/team.key");
/// for name in client.list(Some("deploy"))? {
///     println!("{name}");
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Authy {
    binary: PathBuf,
    credentials: Credentials,
}

impl Authy {
    /// Locate `authy` on PATH and build a client around it.
    ///
    /// Fails with [`AuthyError::BinaryNotFound`] when the executable is
    /// absent, before anything is spawned.
    pub fn new() -> Result<Self> {
        Ok(Self::with_binary(locate_binary()?))
    }

    /// Build a client around an explicit binary path (no PATH lookup).
    pub fn with_binary(path: impl Into<PathBuf>) -> Self {
        Self {
            binary: path.into(),
            credentials: Credentials::new(),
        }
    }

    /// Attach a vault passphrase, forwarded to each child invocation as
    /// `AUTHY_PASSPHRASE`. The calling process environment is untouched.
    pub fn passphrase(mut self, passphrase: impl Into<String>) -> Self {
        self.credentials = self.credentials.with_passphrase(passphrase);
        self
    }

    /// Attach a keyfile path, forwarded as `AUTHY_KEYFILE`.
    pub fn keyfile(mut self, path: impl Into<PathBuf>) -> Self {
        self.credentials = self.credentials.with_keyfile(path);
        self
    }

    // ------------------------------------------------------------------
    // Read operations
    // ------------------------------------------------------------------

    /// Get a secret's value.
    ///
    /// Fails with [`AuthyError::NotFound`] if absent.
    pub fn get(&self, name: &str) -> Result<String> {
        Ok(self.get_secret(name)?.value)
    }

    /// Get the full secret record, including version and timestamps.
    pub fn get_secret(&self, name: &str) -> Result<Secret> {
        let output = self.invoke(&["get", name], None)?;
        response::decode_as(&output)
    }

    /// Get a secret's value, or `None` if it does not exist.
    ///
    /// Only the not-found case is absorbed; every other error kind
    /// still propagates.
    pub fn get_opt(&self, name: &str) -> Result<Option<String>> {
        match self.get(name) {
            Ok(value) => Ok(Some(value)),
            Err(AuthyError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// List secret names, optionally filtered by a policy scope.
    ///
    /// Order is whatever the vault reports; the client does not re-sort.
    pub fn list(&self, scope: Option<&str>) -> Result<Vec<String>> {
        Ok(self
            .list_secrets(scope)?
            .into_iter()
            .map(|s| s.name)
            .collect())
    }

    /// List full secret summaries (name, version, timestamps).
    pub fn list_secrets(&self, scope: Option<&str>) -> Result<Vec<SecretSummary>> {
        let mut args = vec!["list"];
        if let Some(scope) = scope {
            args.extend(["--scope", scope]);
        }
        let output = self.invoke(&args, None)?;
        let listing: ListResponse = response::decode_as(&output)?;
        Ok(listing.secrets)
    }

    // ------------------------------------------------------------------
    // Write operations
    // ------------------------------------------------------------------

    /// Store a secret. The value is passed via stdin, never as argv.
    ///
    /// Fails with [`AuthyError::AlreadyExists`] when the name is taken
    /// and `force` is false.
    pub fn store(&self, name: &str, value: &str, force: bool) -> Result<()> {
        let mut args = vec!["store", name];
        if force {
            args.push("--force");
        }
        let output = self.invoke(&args, Some(value))?;
        response::decode(&output)?;
        Ok(())
    }

    /// Remove a secret. Returns `true` on success.
    ///
    /// Fails with [`AuthyError::NotFound`] if absent.
    pub fn remove(&self, name: &str) -> Result<bool> {
        let output = self.invoke(&["remove", name], None)?;
        response::decode(&output)?;
        Ok(true)
    }

    /// Rotate a secret to a new value and return the new version.
    ///
    /// Two invocations: `rotate` does not report the post-rotation
    /// version, so the client reads it back with a follow-up `get`. The
    /// pair is not atomic; if another actor mutates the same name
    /// between the steps, the returned version may not describe the
    /// value just set.
    pub fn rotate(&self, name: &str, new_value: &str) -> Result<u64> {
        let output = self.invoke(&["rotate", name], Some(new_value))?;
        response::decode(&output)?;
        Ok(self.get_secret(name)?.version)
    }

    /// Import secrets from a dotenv-style file. The vault reads the
    /// file directly; nothing is sent over stdin.
    pub fn import_file(&self, path: impl AsRef<Path>, force: bool) -> Result<()> {
        let path = path.as_ref();
        let mut args = vec![OsStr::new("import"), path.as_os_str()];
        if force {
            args.push(OsStr::new("--force"));
        }
        let output = self.invoke(&args, None)?;
        response::decode(&output)?;
        Ok(())
    }

    /// Import secrets from an external source (e.g. `"1password"`),
    /// optionally naming the source vault to read from.
    pub fn import_from(&self, source: &str, vault: Option<&str>) -> Result<()> {
        let mut args = vec!["import", "--from", source];
        if let Some(vault) = vault {
            args.extend(["--vault", vault]);
        }
        let output = self.invoke(&args, None)?;
        response::decode(&output)?;
        Ok(())
    }

    /// Initialize a new vault.
    pub fn init(&self) -> Result<()> {
        let output = self.invoke(&["init"], None)?;
        response::decode(&output)?;
        Ok(())
    }

    /// Run a command with applicable secrets injected as environment
    /// variables by the vault process itself.
    ///
    /// The target execution's exit code and output streams are returned
    /// verbatim; unlike every other operation, a non-zero exit here is
    /// the child command's outcome, not a client error, so no error
    /// mapping is applied.
    pub fn run(&self, command: &[String], scope: Option<&str>) -> Result<InvocationOutput> {
        let mut args = vec!["run"];
        if let Some(scope) = scope {
            args.extend(["--scope", scope]);
        }
        args.push("--");
        args.extend(command.iter().map(String::as_str));
        self.invoke(&args, None)
    }

    // ------------------------------------------------------------------
    // Probe
    // ------------------------------------------------------------------

    /// Check whether a vault exists, without requiring credentials.
    ///
    /// Issues an unauthenticated `get` for a sentinel name and inspects
    /// only the failure classification. The `vault_not_initialized`
    /// error token is the single outcome mapped to `false`; success and
    /// every other failure, including auth errors and unparseable error
    /// bodies, conservatively count as an existing vault.
    ///
    /// A missing binary fails with [`AuthyError::BinaryNotFound`]; it is
    /// never conflated with "no vault".
    pub fn is_initialized(binary: Option<&Path>) -> Result<bool> {
        let binary = match binary {
            Some(path) => path.to_path_buf(),
            None => locate_binary()?,
        };
        let output = invoke::invoke(&binary, &["get", PROBE_NAME], None, &[])?;
        if output.success() {
            // The sentinel coincidentally exists, so a vault certainly does.
            return Ok(true);
        }
        match errors::parse_envelope(&output.stderr) {
            Some(body) => Ok(body.code != errors::CODE_VAULT_NOT_INITIALIZED),
            None => Ok(true),
        }
    }

    /// Spawn one invocation with this client's binary and credential
    /// overlay applied.
    fn invoke<S: AsRef<OsStr>>(&self, args: &[S], payload: Option<&str>) -> Result<InvocationOutput> {
        invoke::invoke(&self.binary, args, payload, &self.credentials.env_overlay())
    }
}

/// Find the authy executable on PATH.
fn locate_binary() -> Result<PathBuf> {
    which::which(BINARY_NAME).map_err(|_| AuthyError::BinaryNotFound)
}
