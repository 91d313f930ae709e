use crate::pipeline::codec;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// SHA-256 of an asset, rendered in the base6x alphabet.
/// This is the form stored in `metadata.assets`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetDigest(String);

impl AssetDigest {
    /// Digest raw asset bytes
    pub fn of(data: &[u8]) -> Self {
        let hash = Sha256::digest(data);
        Self(codec::encode(&hash))
    }

    /// Wrap a digest string read back from a container
    pub fn from_encoded(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for AssetDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// SHA-256 of a whole container text, rendered as lowercase hex.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PackageHash(String);

impl PackageHash {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PackageHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Hash an entire serialized container
pub fn package_hash(content: &str) -> PackageHash {
    PackageHash(hex::encode(Sha256::digest(content.as_bytes())))
}
