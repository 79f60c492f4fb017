//! Response record types returned by read operations.
//!
//! These are materialized transiently from decoded responses; the
//! client never caches them.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// A stored secret as reported by `authy get`.
#[derive(Debug, Clone, Deserialize)]
pub struct Secret {
    /// The secret's name.
    pub name: String,

    /// The plaintext value.
    pub value: String,

    /// Monotonic version counter. Starts at 1 and increases on every
    /// successful store or rotation; the client only reports what the
    /// vault returns, it never computes this.
    pub version: u64,

    /// When the secret was first created.
    pub created: DateTime<Utc>,

    /// When the secret was last modified.
    pub modified: DateTime<Utc>,
}

/// A single `authy list` entry. The value is never included.
#[derive(Debug, Clone, Deserialize)]
pub struct SecretSummary {
    pub name: String,
    pub version: u64,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

/// Envelope around the `list` output.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ListResponse {
    #[serde(default)]
    pub secrets: Vec<SecretSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secret_deserializes_from_wire_format() {
        let secret: Secret = serde_json::from_str(
            r#"{"name":"db-url","value":"postgres://localhost/mydb","version":3,
               "created":"2025-01-01T00:00:00Z","modified":"2025-01-02T12:30:00Z"}"#,
        )
        .unwrap();
        assert_eq!(secret.name, "db-url");
        assert_eq!(secret.value, "postgres://localhost/mydb");
        assert_eq!(secret.version, 3);
        assert!(secret.modified > secret.created);
    }

    #[test]
    fn listing_preserves_reported_order() {
        let listing: ListResponse = serde_json::from_str(
            r#"{"secrets":[
                {"name":"zeta","version":1,"created":"2025-01-01T00:00:00Z","modified":"2025-01-01T00:00:00Z"},
                {"name":"alpha","version":2,"created":"2025-01-01T00:00:00Z","modified":"2025-01-01T00:00:00Z"}
            ]}"#,
        )
        .unwrap();
        let names: Vec<_> = listing.secrets.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["zeta", "alpha"]);
    }
}
