//! Account identities.
//!
//! An [`Identity`] is an opaque 20-byte account address supplied by the
//! caller. The registry never mints identities; it only stores and compares
//! them.
//!
//! # Derivation
//!
//! Hosts that hold a public key (or any stable label) rather than an address
//! can derive one with [`Identity::from_public_key`]: the last 20 bytes of
//! `SHA-256(key)`. The same input always yields the same address.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Length of an account address in bytes.
pub const IDENTITY_LEN: usize = 20;

/// A 20-byte account address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Identity([u8; IDENTITY_LEN]);

/// Errors produced when parsing an identity from text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityParseError {
    /// Input is not valid hexadecimal.
    #[error("identity is not valid hex: {0}")]
    InvalidHex(String),

    /// Input decodes to the wrong number of bytes.
    #[error("identity must be {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
}

impl Identity {
    /// Creates an identity from a 20-byte array.
    pub const fn from_bytes(bytes: [u8; IDENTITY_LEN]) -> Self {
        Self(bytes)
    }

    /// Returns the raw bytes of the address.
    pub fn as_bytes(&self) -> &[u8; IDENTITY_LEN] {
        &self.0
    }

    /// Derives an address from a public key or label.
    ///
    /// Takes the trailing 20 bytes of the SHA-256 digest of `key`.
    pub fn from_public_key(key: &[u8]) -> Self {
        let digest = Sha256::digest(key);
        let mut bytes = [0u8; IDENTITY_LEN];
        bytes.copy_from_slice(&digest[digest.len() - IDENTITY_LEN..]);
        Self(bytes)
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Identity {
    type Err = IdentityParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.strip_prefix("0x").unwrap_or(s);
        let decoded =
            hex::decode(trimmed).map_err(|e| IdentityParseError::InvalidHex(e.to_string()))?;
        let bytes: [u8; IDENTITY_LEN] =
            decoded
                .as_slice()
                .try_into()
                .map_err(|_| IdentityParseError::InvalidLength {
                    expected: IDENTITY_LEN,
                    actual: decoded.len(),
                })?;
        Ok(Self(bytes))
    }
}

impl Serialize for Identity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Identity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
