//! Deterministic identifiers derived from record content.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// A content-hashed identifier, 16 hex characters long.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordId(String);

impl RecordId {
    /// Hash the given fields, separated by `|`, and keep the first 16 hex characters.
    pub fn generate(fields: &[&str]) -> Self {
        let mut hasher = Sha256::new();
        for (i, field) in fields.iter().enumerate() {
            if i > 0 {
                hasher.update(b"|");
            }
            hasher.update(field.as_bytes());
        }
        let digest = hex::encode(hasher.finalize());
        Self(digest[..16].to_string())
    }

    /// Hash raw bytes, e.g. the full contents of an input file.
    pub fn of_bytes(bytes: &[u8]) -> Self {
        let digest = hex::encode(Sha256::digest(bytes));
        Self(digest[..16].to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecordId({})", self.0)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Identifier of a single game.
pub type GameId = RecordId;

/// Fingerprint of a whole input dataset.
pub type DatasetFingerprint = RecordId;
