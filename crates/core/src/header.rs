//! Block headers and attestation strings.
//!
//! A header is an opaque random token, not a hash of the block contents.
//! Signatures are plain `<header>:<identity>` strings and carry no
//! cryptographic weight.

use base64::engine::general_purpose::STANDARD as BASE64_ENGINE;
use base64::Engine as _;
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Number of random bytes drawn for a fresh header.
pub const HEADER_ENTROPY_BYTES: usize = 64;

/// Errors raised by core primitives.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("entropy source failed: {0}")]
    Entropy(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;

/// The unique identifier of a block.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Header(String);

impl Header {
    /// Wrap an existing token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The empty header, used as the parent of genesis.
    pub fn empty() -> Self {
        Self(String::new())
    }

    /// Draw a new header from the OS entropy source, base64 encoded.
    pub fn random() -> Result<Self> {
        let mut bytes = [0u8; HEADER_ENTROPY_BYTES];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| CoreError::Entropy(e.to_string()))?;
        Ok(Self(BASE64_ENGINE.encode(bytes)))
    }

    /// Get the underlying token.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check if this is the empty header.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let short: String = self.0.chars().take(8).collect();
        write!(f, "Header({})", short)
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Header {
    fn from(token: &str) -> Self {
        Self::new(token)
    }
}

/// An attestation over a header, attributed to the producing node.
#[derive(Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Signature(String);

impl Signature {
    /// Attest `header` on behalf of `identity`.
    pub fn attest(header: &Header, identity: &str) -> Self {
        Self(format!("{}:{}", header, identity))
    }

    /// The identity named by the attestation, if it has one.
    pub fn identity(&self) -> Option<&str> {
        self.0.rsplit_once(':').map(|(_, identity)| identity)
    }

    /// Get the raw attestation string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({:?})", self.identity().unwrap_or(""))
    }
}
