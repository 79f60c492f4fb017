//! Shared fixture: a scripted stand-in for the authy binary.
//!
//! Each fake records every invocation's argument vector, stdin payload,
//! and credential environment variables into its temp dir, then emits
//! canned stdout/stderr and exits with a canned code. This mirrors the
//! wire contract closely enough to drive the client end to end without
//! a real vault.

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use authy_client::Authy;
use tempfile::TempDir;

pub struct FakeAuthy {
    dir: TempDir,
    pub bin: PathBuf,
}

impl FakeAuthy {
    /// Fake that answers every invocation the same way.
    pub fn new(stdout: &str, stderr: &str, exit_code: i32) -> Self {
        // Canned output is embedded single-quoted in the script; a quote
        // in a fixture would break out of it.
        assert!(!stdout.contains('\'') && !stderr.contains('\''));
        let body = format!(
            "printf '%s' '{stdout}'\n\
             printf '%s' '{stderr}' >&2\n\
             exit {exit_code}\n"
        );
        Self::with_body(&format!("cat >> \"$REC/stdin\"\n{body}"))
    }

    /// Fake whose second and later invocations answer differently than
    /// the first. Needed for the rotate-then-get protocol.
    pub fn two_phase(first: (&str, &str, i32), second: (&str, &str, i32)) -> Self {
        let (out1, err1, code1) = first;
        let (out2, err2, code2) = second;
        for text in [out1, err1, out2, err2] {
            assert!(!text.contains('\''));
        }
        Self::with_body(&format!(
            "if [ ! -f \"$REC/seen\" ]; then\n\
             : > \"$REC/seen\"\n\
             cat >> \"$REC/stdin\"\n\
             printf '%s' '{out1}'\n\
             printf '%s' '{err1}' >&2\n\
             exit {code1}\n\
             fi\n\
             cat > /dev/null\n\
             printf '%s' '{out2}'\n\
             printf '%s' '{err2}' >&2\n\
             exit {code2}\n"
        ))
    }

    fn with_body(body: &str) -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let record = dir.path().display();
        let script = format!(
            "#!/bin/sh\n\
             REC=\"{record}\"\n\
             printf '%s\\n' \"$@\" >> \"$REC/argv\"\n\
             printf '%s' \"$AUTHY_PASSPHRASE\" > \"$REC/passphrase\"\n\
             printf '%s' \"$AUTHY_KEYFILE\" > \"$REC/keyfile\"\n\
             {body}"
        );

        let bin = dir.path().join("authy");
        fs::write(&bin, script).expect("write fake binary");
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&bin, fs::Permissions::from_mode(0o755))
                .expect("mark fake binary executable");
        }

        Self { dir, bin }
    }

    /// Client pointed at this fake.
    pub fn client(&self) -> Authy {
        Authy::with_binary(&self.bin)
    }

    /// Every argument received, one per line, across all invocations.
    pub fn argv(&self) -> Vec<String> {
        self.read("argv")
            .lines()
            .map(|line| line.to_string())
            .collect()
    }

    /// Everything received over stdin.
    pub fn stdin(&self) -> String {
        self.read("stdin")
    }

    /// `AUTHY_PASSPHRASE` as seen by the child (empty when unset).
    pub fn passphrase(&self) -> String {
        self.read("passphrase")
    }

    /// `AUTHY_KEYFILE` as seen by the child (empty when unset).
    pub fn keyfile(&self) -> String {
        self.read("keyfile")
    }

    fn read(&self, name: &str) -> String {
        fs::read_to_string(self.dir.path().join(name)).unwrap_or_default()
    }
}

/// A full secret record in the CLI's `get` output format.
pub fn secret_json(name: &str, value: &str, version: u64) -> String {
    format!(
        r#"{{"name":"{name}","value":"{value}","version":{version},"created":"2025-01-01T00:00:00Z","modified":"2025-01-02T00:00:00Z"}}"#
    )
}

/// A structured error envelope in the CLI's stderr format.
pub fn error_json(code: &str, message: &str, exit_code: i32) -> String {
    format!(r#"{{"error":{{"code":"{code}","message":"{message}","exit_code":{exit_code}}}}}"#)
}
