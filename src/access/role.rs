//! Role tags.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

/// Seed hashed to produce the proposer role id.
const PROPOSER_ROLE_SEED: &[u8] = b"PROPOSAL_ROLE";

/// Roles recognised by the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// May grant and revoke roles.
    Admin,
    /// May create proposals.
    Proposer,
}

impl Role {
    /// All roles, in a fixed order.
    pub const ALL: [Role; 2] = [Role::Admin, Role::Proposer];

    /// 32-byte role id.
    ///
    /// Admin is the all-zero default admin id; Proposer is
    /// `SHA-256("PROPOSAL_ROLE")`.
    pub fn id(&self) -> [u8; 32] {
        match self {
            Role::Admin => [0u8; 32],
            Role::Proposer => Sha256::digest(PROPOSER_ROLE_SEED).into(),
        }
    }

    /// Role id as `0x`-prefixed hex.
    pub fn id_hex(&self) -> String {
        format!("0x{}", hex::encode(self.id()))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Proposer => write!(f, "proposer"),
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "proposer" => Ok(Role::Proposer),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}
