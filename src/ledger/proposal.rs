//! Proposal names, ids and records.

use super::option::VoteOption;
use crate::identity::Identity;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

/// Width of the canonical name encoding.
pub const PROPOSAL_NAME_LEN: usize = 32;

/// Width of a proposal id. Ids are the leading bytes of the name encoding.
pub const PROPOSAL_ID_LEN: usize = 16;

/// Errors building a proposal name or parsing an id.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
    #[error("proposal name is empty")]
    Empty,

    #[error("proposal name is {len} bytes, limit is 32")]
    TooLong { len: usize },

    #[error("proposal name contains a NUL byte at offset {offset}")]
    ContainsNul { offset: usize },

    #[error("proposal id is not valid hex: {0}")]
    InvalidIdHex(String),

    #[error("proposal id must be 16 bytes, got {0}")]
    InvalidIdLength(usize),
}

/// Fixed-width, zero-padded proposal name.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProposalName([u8; PROPOSAL_NAME_LEN]);

impl ProposalName {
    /// Encode `text` into 32 zero-padded bytes.
    pub fn new(text: &str) -> Result<Self, NameError> {
        let raw = text.as_bytes();
        if raw.is_empty() {
            return Err(NameError::Empty);
        }
        if raw.len() > PROPOSAL_NAME_LEN {
            return Err(NameError::TooLong { len: raw.len() });
        }
        // NUL is the padding byte; the text must survive the round trip.
        if let Some(offset) = raw.iter().position(|b| *b == 0) {
            return Err(NameError::ContainsNul { offset });
        }

        let mut bytes = [0u8; PROPOSAL_NAME_LEN];
        bytes[..raw.len()].copy_from_slice(raw);
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; PROPOSAL_NAME_LEN] {
        &self.0
    }

    /// Name text with the zero padding stripped.
    pub fn to_text(&self) -> String {
        let end = self
            .0
            .iter()
            .rposition(|b| *b != 0)
            .map_or(0, |pos| pos + 1);
        String::from_utf8_lossy(&self.0[..end]).into_owned()
    }
}

impl fmt::Debug for ProposalName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ProposalName").field(&self.to_text()).finish()
    }
}

impl fmt::Display for ProposalName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_text())
    }
}

impl FromStr for ProposalName {
    type Err = NameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for ProposalName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_text())
    }
}

impl<'de> Deserialize<'de> for ProposalName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::new(&s).map_err(serde::de::Error::custom)
    }
}

/// Name-derived proposal identifier.
///
/// Distinct names sharing their first 16 bytes map to the same id; the
/// ledger rejects the second creation rather than overwrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProposalId([u8; PROPOSAL_ID_LEN]);

impl ProposalId {
    /// Truncate the name encoding to [`PROPOSAL_ID_LEN`] bytes.
    pub fn derive(name: &ProposalName) -> Self {
        let mut bytes = [0u8; PROPOSAL_ID_LEN];
        bytes.copy_from_slice(&name.as_bytes()[..PROPOSAL_ID_LEN]);
        let id = Self(bytes);
        debug!(%name, %id, "derived proposal id");
        id
    }

    pub const fn from_bytes(bytes: [u8; PROPOSAL_ID_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; PROPOSAL_ID_LEN] {
        &self.0
    }
}

impl fmt::Display for ProposalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for ProposalId {
    type Err = NameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.strip_prefix("0x").unwrap_or(s);
        let decoded = hex::decode(trimmed).map_err(|e| NameError::InvalidIdHex(e.to_string()))?;
        let bytes: [u8; PROPOSAL_ID_LEN] = decoded
            .as_slice()
            .try_into()
            .map_err(|_| NameError::InvalidIdLength(decoded.len()))?;
        Ok(Self(bytes))
    }
}

impl Serialize for ProposalId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ProposalId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A stored proposal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    pub id: ProposalId,
    pub name: ProposalName,
    pub creator: Identity,
    /// Counter per option. Every option is present from creation.
    tally: BTreeMap<VoteOption, u64>,
}

impl Proposal {
    /// New record with every counter at zero.
    pub(crate) fn new(name: ProposalName, creator: Identity) -> Self {
        Self {
            id: ProposalId::derive(&name),
            name,
            creator,
            tally: VoteOption::ALL.iter().map(|option| (*option, 0)).collect(),
        }
    }

    /// Add one vote for `option`.
    pub(crate) fn record_vote(&mut self, option: VoteOption) {
        *self.tally.entry(option).or_insert(0) += 1;
    }

    pub fn votes_for(&self, option: VoteOption) -> u64 {
        self.tally.get(&option).copied().unwrap_or(0)
    }

    pub fn total_votes(&self) -> u64 {
        self.tally.values().sum()
    }

    /// Option -> count, zero entries included.
    pub fn tally(&self) -> &BTreeMap<VoteOption, u64> {
        &self.tally
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_is_zero_padded() {
        let name = ProposalName::new("First Proposal").unwrap();
        assert_eq!(&name.as_bytes()[..14], b"First Proposal");
        assert!(name.as_bytes()[14..].iter().all(|b| *b == 0));
        assert_eq!(name.to_text(), "First Proposal");
    }

    #[test]
    fn test_name_limits() {
        assert_eq!(ProposalName::new(""), Err(NameError::Empty));
        assert!(ProposalName::new(&"x".repeat(PROPOSAL_NAME_LEN)).is_ok());
        assert_eq!(
            ProposalName::new(&"x".repeat(PROPOSAL_NAME_LEN + 1)),
            Err(NameError::TooLong { len: 33 })
        );
    }

    #[test]
    fn test_name_rejects_nul_bytes() {
        assert_eq!(
            ProposalName::new("\0"),
            Err(NameError::ContainsNul { offset: 0 })
        );
        assert_eq!(
            ProposalName::new("Budget\0"),
            Err(NameError::ContainsNul { offset: 6 })
        );
    }

    #[test]
    fn test_name_text_round_trips_through_json() {
        let name = ProposalName::new("Zoning vote").unwrap();
        let json = serde_json::to_string(&name).unwrap();
        assert_eq!(json, "\"Zoning vote\"");
        assert_eq!(serde_json::from_str::<ProposalName>(&json).unwrap(), name);
    }

    #[test]
    fn test_id_is_leading_sixteen_bytes() {
        let name = ProposalName::new("First Proposal").unwrap();
        let id = ProposalId::derive(&name);
        assert_eq!(id.as_bytes()[..], name.as_bytes()[..PROPOSAL_ID_LEN]);
        // "First Proposal" + two bytes of padding
        assert_eq!(id.to_string(), "0x46697273742050726f706f73616c0000");
    }

    #[test]
    fn test_id_derivation_is_deterministic() {
        let a = ProposalId::derive(&ProposalName::new("Budget 2026").unwrap());
        let b = ProposalId::derive(&ProposalName::new("Budget 2026").unwrap());
        assert_eq!(a, b);
    }

    #[test]
    fn test_names_sharing_prefix_collide() {
        let one = ProposalName::new("Proposal number one").unwrap();
        let two = ProposalName::new("Proposal number two").unwrap();
        assert_ne!(one, two);
        assert_eq!(ProposalId::derive(&one), ProposalId::derive(&two));
    }

    #[test]
    fn test_id_parse() {
        let id = ProposalId::derive(&ProposalName::new("abc").unwrap());
        assert_eq!(id.to_string().parse::<ProposalId>().unwrap(), id);
        assert_eq!(
            "0x0102".parse::<ProposalId>(),
            Err(NameError::InvalidIdLength(2))
        );
    }

    #[test]
    fn test_new_proposal_counters_start_at_zero() {
        let proposal = Proposal::new(
            ProposalName::new("Zero").unwrap(),
            Identity::from_bytes([1; 20]),
        );
        assert_eq!(proposal.tally().len(), VoteOption::ALL.len());
        assert!(proposal.tally().values().all(|count| *count == 0));
        assert_eq!(proposal.total_votes(), 0);
    }

    #[test]
    fn test_record_vote_increments_one_option() {
        let mut proposal = Proposal::new(
            ProposalName::new("Count").unwrap(),
            Identity::from_bytes([1; 20]),
        );
        proposal.record_vote(VoteOption::No);
        proposal.record_vote(VoteOption::No);
        assert_eq!(proposal.votes_for(VoteOption::No), 2);
        assert_eq!(proposal.votes_for(VoteOption::Yes), 0);
        assert_eq!(proposal.total_votes(), 2);
    }

    #[test]
    fn test_proposal_json_shape() {
        let proposal = Proposal::new(
            ProposalName::new("Json").unwrap(),
            Identity::from_bytes([1; 20]),
        );
        let value = serde_json::to_value(&proposal).unwrap();
        assert_eq!(value["name"], "Json");
        assert_eq!(value["tally"]["yes"], 0);
    }
}
