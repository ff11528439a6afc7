//! Registry event log.
//!
//! - Append-only; records are never removed or rewritten
//! - Sequence numbers start at 1 and increase by one per record
//! - Written only after the state change it describes has been applied
//! - Consumed by external auditors and indexers, never by the registry itself

use crate::access::{Role, RoleChange};
use crate::identity::Identity;
use crate::ledger::{ProposalId, ProposalName, VoteOption, VoteReceipt};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Notifications emitted by registry operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RegistryEvent {
    RoleGranted {
        role: Role,
        account: Identity,
        sender: Identity,
    },
    RoleRevoked {
        role: Role,
        account: Identity,
        sender: Identity,
    },
    ProposalCreated {
        id: ProposalId,
        name: ProposalName,
        creator: Identity,
    },
    VoteCast {
        id: ProposalId,
        voter: Identity,
        option: VoteOption,
    },
}

/// Event kinds, for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    RoleGranted,
    RoleRevoked,
    ProposalCreated,
    VoteCast,
}

impl RegistryEvent {
    pub fn granted(change: RoleChange) -> Self {
        Self::RoleGranted {
            role: change.role,
            account: change.account,
            sender: change.sender,
        }
    }

    pub fn revoked(change: RoleChange) -> Self {
        Self::RoleRevoked {
            role: change.role,
            account: change.account,
            sender: change.sender,
        }
    }

    pub fn vote_cast(receipt: VoteReceipt) -> Self {
        Self::VoteCast {
            id: receipt.id,
            voter: receipt.voter,
            option: receipt.option,
        }
    }

    pub fn kind(&self) -> EventKind {
        match self {
            Self::RoleGranted { .. } => EventKind::RoleGranted,
            Self::RoleRevoked { .. } => EventKind::RoleRevoked,
            Self::ProposalCreated { .. } => EventKind::ProposalCreated,
            Self::VoteCast { .. } => EventKind::VoteCast,
        }
    }

    /// Whether `identity` appears anywhere in the event.
    pub fn involves(&self, identity: &Identity) -> bool {
        match self {
            Self::RoleGranted {
                account, sender, ..
            }
            | Self::RoleRevoked {
                account, sender, ..
            } => account == identity || sender == identity,
            Self::ProposalCreated { creator, .. } => creator == identity,
            Self::VoteCast { voter, .. } => voter == identity,
        }
    }
}

impl fmt::Display for RegistryEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RoleGranted {
                role,
                account,
                sender,
            } => write!(f, "RoleGranted({}, {}, {})", role.id_hex(), account, sender),
            Self::RoleRevoked {
                role,
                account,
                sender,
            } => write!(f, "RoleRevoked({}, {}, {})", role.id_hex(), account, sender),
            Self::ProposalCreated { id, name, creator } => {
                write!(f, "ProposalCreated({}, \"{}\", {})", id, name, creator)
            }
            Self::VoteCast { id, voter, option } => {
                write!(f, "VoteCast({}, {}, {})", id, voter, option.code())
            }
        }
    }
}

/// A logged event with its position in the log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub sequence: u64,
    #[serde(flatten)]
    pub event: RegistryEvent,
}

/// Append-only event log.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    records: Vec<EventRecord>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event and return its sequence number.
    pub fn append(&mut self, event: RegistryEvent) -> u64 {
        let sequence = self.records.len() as u64 + 1;
        self.records.push(EventRecord { sequence, event });
        sequence
    }

    /// All records, oldest first.
    pub fn records(&self) -> &[EventRecord] {
        &self.records
    }

    /// Records with a sequence number greater than `sequence`.
    pub fn since(&self, sequence: u64) -> &[EventRecord] {
        let start = usize::try_from(sequence)
            .unwrap_or(usize::MAX)
            .min(self.records.len());
        &self.records[start..]
    }

    pub fn last_sequence(&self) -> u64 {
        self.records.len() as u64
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Query options for the event log.
#[derive(Debug, Clone)]
pub struct EventQuery {
    /// Filter by event kind.
    pub kind: Option<EventKind>,
    /// Filter by an identity involved in the event.
    pub identity: Option<Identity>,
    /// Only records after this sequence number.
    pub after_sequence: Option<u64>,
    /// Limit number of results (most recent first).
    pub limit: Option<usize>,
}

impl Default for EventQuery {
    fn default() -> Self {
        Self {
            kind: None,
            identity: None,
            after_sequence: None,
            limit: Some(50),
        }
    }
}

/// Query the log. Returns records most recent first.
pub fn query_events(log: &EventLog, query: &EventQuery) -> Vec<EventRecord> {
    let mut filtered: Vec<EventRecord> = log
        .records()
        .iter()
        .filter(|record| {
            if let Some(kind) = query.kind {
                if record.event.kind() != kind {
                    return false;
                }
            }

            if let Some(ref identity) = query.identity {
                if !record.event.involves(identity) {
                    return false;
                }
            }

            if let Some(after) = query.after_sequence {
                if record.sequence <= after {
                    return false;
                }
            }

            true
        })
        .cloned()
        .collect();

    filtered.reverse();

    if let Some(limit) = query.limit {
        filtered.truncate(limit);
    }

    filtered
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(byte: u8) -> Identity {
        Identity::from_bytes([byte; 20])
    }

    fn pid(text: &str) -> ProposalId {
        ProposalId::derive(&ProposalName::new(text).unwrap())
    }

    fn sample_log() -> EventLog {
        let mut log = EventLog::new();
        log.append(RegistryEvent::RoleGranted {
            role: Role::Proposer,
            account: id(2),
            sender: id(1),
        });
        log.append(RegistryEvent::ProposalCreated {
            id: pid("First"),
            name: ProposalName::new("First").unwrap(),
            creator: id(2),
        });
        log.append(RegistryEvent::VoteCast {
            id: pid("First"),
            voter: id(3),
            option: VoteOption::Yes,
        });
        log.append(RegistryEvent::RoleRevoked {
            role: Role::Proposer,
            account: id(2),
            sender: id(1),
        });
        log
    }

    #[test]
    fn test_sequences_increase_from_one() {
        let log = sample_log();
        let sequences: Vec<u64> = log.records().iter().map(|r| r.sequence).collect();
        assert_eq!(sequences, vec![1, 2, 3, 4]);
        assert_eq!(log.last_sequence(), 4);
    }

    #[test]
    fn test_since() {
        let log = sample_log();
        assert_eq!(log.since(0).len(), 4);
        assert_eq!(log.since(3).len(), 1);
        assert_eq!(log.since(3)[0].event.kind(), EventKind::RoleRevoked);
        assert!(log.since(10).is_empty());
    }

    #[test]
    fn test_query_by_kind() {
        let log = sample_log();
        let query = EventQuery {
            kind: Some(EventKind::VoteCast),
            ..Default::default()
        };
        let result = query_events(&log, &query);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].sequence, 3);
    }

    #[test]
    fn test_query_by_identity_matches_sender_and_account() {
        let log = sample_log();
        let query = EventQuery {
            identity: Some(id(2)),
            ..Default::default()
        };
        let result = query_events(&log, &query);
        assert_eq!(result.len(), 3);
        // Most recent first
        assert_eq!(result[0].sequence, 4);

        let query = EventQuery {
            identity: Some(id(1)),
            ..Default::default()
        };
        assert_eq!(query_events(&log, &query).len(), 2);
    }

    #[test]
    fn test_query_after_sequence_and_limit() {
        let log = sample_log();
        let query = EventQuery {
            after_sequence: Some(1),
            limit: Some(2),
            ..Default::default()
        };
        let result = query_events(&log, &query);
        let sequences: Vec<u64> = result.iter().map(|r| r.sequence).collect();
        assert_eq!(sequences, vec![4, 3]);
    }

    #[test]
    fn test_query_no_limit() {
        let mut log = EventLog::new();
        for byte in 0..100u8 {
            log.append(RegistryEvent::VoteCast {
                id: pid("Many"),
                voter: id(byte),
                option: VoteOption::Abstain,
            });
        }
        let query = EventQuery {
            limit: None,
            ..Default::default()
        };
        assert_eq!(query_events(&log, &query).len(), 100);
        assert_eq!(query_events(&log, &EventQuery::default()).len(), 50);
    }

    #[test]
    fn test_event_json_is_flat_and_tagged() {
        let log = sample_log();
        let value = serde_json::to_value(&log.records()[2]).unwrap();
        assert_eq!(value["sequence"], 3);
        assert_eq!(value["event"], "vote_cast");
        assert_eq!(value["option"], "yes");
        assert_eq!(value["voter"], id(3).to_string());

        let back: EventRecord = serde_json::from_value(value).unwrap();
        assert_eq!(back, log.records()[2]);
    }

    #[test]
    fn test_every_exported_event_reads_back() {
        let log = sample_log();
        for record in log.records() {
            let line = serde_json::to_string(record).unwrap();
            let back: EventRecord = serde_json::from_str(&line).unwrap();
            assert_eq!(&back, record);
        }
    }

    #[test]
    fn test_display_matches_event_signature() {
        let event = RegistryEvent::VoteCast {
            id: pid("First"),
            voter: id(3),
            option: VoteOption::No,
        };
        let shown = event.to_string();
        assert!(shown.starts_with("VoteCast(0x"));
        assert!(shown.ends_with(", 2)"));
    }
}
