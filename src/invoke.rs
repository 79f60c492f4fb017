//! One-shot invocation of the authy binary.
//!
//! Each call spawns a fresh process, optionally feeds a payload over
//! stdin, and blocks until it exits. There is no process reuse and no
//! shared invocation state, so concurrent callers never race on the
//! transport.

use std::ffi::OsStr;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

use crate::errors::{AuthyError, Result};

/// Raw outcome of a single authy process run: the exit code and both
/// output streams captured as text.
#[derive(Debug, Clone)]
pub struct InvocationOutput {
    /// Exit code of the child (-1 when killed by a signal).
    pub exit_code: i32,

    /// Captured standard output.
    pub stdout: String,

    /// Captured standard error.
    pub stderr: String,
}

impl InvocationOutput {
    /// Whether the child exited with code 0.
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Run `<binary> --json <args...>`, feeding `payload` over stdin when given.
///
/// The `--json` prefix is always applied so every response is structured.
/// Secret payloads reach the child through its input stream and the
/// stream is closed afterwards; they never appear in the argument vector.
/// `env` entries are applied to the child only.
pub(crate) fn invoke<S: AsRef<OsStr>>(
    binary: &Path,
    args: &[S],
    payload: Option<&str>,
    env: &[(&'static str, String)],
) -> Result<InvocationOutput> {
    let mut cmd = Command::new(binary);
    cmd.arg("--json")
        .args(args)
        .stdin(if payload.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    for (key, value) in env {
        cmd.env(key, value);
    }

    let mut child = cmd.spawn().map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            AuthyError::BinaryNotFound
        } else {
            AuthyError::Spawn {
                binary: binary.to_path_buf(),
                source: e,
            }
        }
    })?;

    if let (Some(value), Some(mut stdin)) = (payload, child.stdin.take()) {
        // A child that fails before reading stdin closes the pipe early;
        // surface its stderr instead of the EPIPE.
        if let Err(e) = stdin.write_all(value.as_bytes()) {
            if e.kind() != std::io::ErrorKind::BrokenPipe {
                return Err(e.into());
            }
        }
        // Dropping the handle closes the stream so the child sees EOF.
    }

    let output = child.wait_with_output()?;
    Ok(InvocationOutput {
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}
