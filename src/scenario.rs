//! Scripted registry sessions.
//!
//! A scenario is a TOML document listing registry calls in order. It plays
//! the part of the deployment script and test harness: deploy with a given
//! identity, then grant, revoke, create, vote and inspect.
//!
//! ```toml
//! deployer = "admin"
//!
//! [[step]]
//! op = "grant"
//! role = "proposer"
//! target = "proposer"
//! caller = "admin"
//!
//! [[step]]
//! op = "create"
//! name = "First Proposal"
//! caller = "proposer"
//!
//! [[step]]
//! op = "vote"
//! proposal = "First Proposal"
//! option = 1
//! caller = "voter-1"
//! expect_error = "duplicate_vote"
//! ```
//!
//! Accounts are written either as `0x`-prefixed addresses or as labels,
//! which are turned into addresses with [`Identity::from_public_key`].
//! Proposals are referenced by `0x` id or by name (the id is derived).

use crate::access::Role;
use crate::error::RegistryError;
use crate::events::EventRecord;
use crate::identity::{Identity, IdentityParseError};
use crate::ledger::{NameError, Proposal, ProposalId, ProposalName};
use crate::registry::VotingRegistry;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

/// Errors loading or preparing a scenario. Registry rejections are not
/// errors here; they are step outcomes.
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("failed to read scenario '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse scenario: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("deployer: {0}")]
    Deployer(#[source] IdentityParseError),

    #[error("step {step}: {source}")]
    Identity {
        step: usize,
        #[source]
        source: IdentityParseError,
    },

    #[error("step {step}: {source}")]
    Name {
        step: usize,
        #[source]
        source: NameError,
    },

    #[error("scenario has no deployer and none was configured")]
    MissingDeployer,
}

/// A parsed scenario file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scenario {
    /// Deploying identity. Overrides the configured deployer.
    #[serde(default)]
    pub deployer: Option<String>,

    #[serde(default, rename = "step")]
    pub steps: Vec<ScenarioStep>,
}

/// One call plus an optional expected rejection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioStep {
    #[serde(flatten)]
    pub action: Action,

    /// Error kind the step must fail with, see [`RegistryError::kind`].
    #[serde(default)]
    pub expect_error: Option<String>,
}

/// Registry calls a scenario can make.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Action {
    Grant {
        role: Role,
        target: String,
        caller: String,
    },
    Revoke {
        role: Role,
        target: String,
        caller: String,
    },
    Create {
        name: String,
        caller: String,
    },
    Vote {
        proposal: String,
        option: u8,
        caller: String,
    },
    Show {
        proposal: String,
    },
}

/// What happened when a step ran.
#[derive(Debug, Clone)]
pub struct StepOutcome {
    /// 1-based step number.
    pub step: usize,
    pub description: String,
    pub result: Result<StepValue, RegistryError>,
    pub expect_error: Option<String>,
}

/// Successful step results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepValue {
    Done,
    Created(ProposalId),
    Proposal(Box<Proposal>),
}

impl StepOutcome {
    /// Whether the outcome matches the step's expectation.
    pub fn as_expected(&self) -> bool {
        match (&self.result, &self.expect_error) {
            (Ok(_), None) => true,
            (Err(err), Some(kind)) => err.kind() == kind,
            _ => false,
        }
    }
}

impl fmt::Display for StepOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = match &self.result {
            Ok(StepValue::Done) => "ok".to_string(),
            Ok(StepValue::Created(id)) => format!("ok id={}", id),
            Ok(StepValue::Proposal(proposal)) => {
                let tally: Vec<String> = proposal
                    .tally()
                    .iter()
                    .map(|(option, count)| format!("{}:{}", option.code(), count))
                    .collect();
                format!(
                    "ok id={} creator={} tally={{{}}}",
                    proposal.id,
                    proposal.creator,
                    tally.join(", ")
                )
            }
            Err(err) => format!("error[{}] {}", err.kind(), err),
        };
        let marker = if self.as_expected() { "" } else { " (UNEXPECTED)" };
        write!(f, "#{} {}: {}{}", self.step, self.description, status, marker)
    }
}

/// Outcomes of every step plus the final event log.
#[derive(Debug, Clone)]
pub struct ScenarioReport {
    pub deployer: Identity,
    pub outcomes: Vec<StepOutcome>,
    pub events: Vec<EventRecord>,
}

impl ScenarioReport {
    /// True when every step matched its expectation.
    pub fn passed(&self) -> bool {
        self.outcomes.iter().all(StepOutcome::as_expected)
    }

    pub fn unexpected(&self) -> impl Iterator<Item = &StepOutcome> {
        self.outcomes.iter().filter(|o| !o.as_expected())
    }
}

impl Scenario {
    /// Parse a scenario from TOML text.
    pub fn from_toml(contents: &str) -> Result<Self, ScenarioError> {
        Ok(toml::from_str(contents)?)
    }

    /// Read and parse a scenario file.
    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ScenarioError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&contents)
    }

    /// Deploy a registry and play every step against it.
    ///
    /// `fallback_deployer` is used when the scenario names none.
    pub fn run(&self, fallback_deployer: Option<Identity>) -> Result<ScenarioReport, ScenarioError> {
        let deployer = match &self.deployer {
            Some(account) => parse_account(account).map_err(ScenarioError::Deployer)?,
            None => fallback_deployer.ok_or(ScenarioError::MissingDeployer)?,
        };

        let mut registry = VotingRegistry::deploy(deployer);
        let mut outcomes = Vec::with_capacity(self.steps.len());

        for (index, step) in self.steps.iter().enumerate() {
            let number = index + 1;
            let outcome = run_step(&mut registry, number, step)?;
            if outcome.as_expected() {
                info!(step = number, "{}", outcome.description);
            } else {
                warn!(step = number, "{}", outcome);
            }
            outcomes.push(outcome);
        }

        Ok(ScenarioReport {
            deployer,
            outcomes,
            events: registry.events().records().to_vec(),
        })
    }
}

fn run_step(
    registry: &mut VotingRegistry,
    step: usize,
    scenario_step: &ScenarioStep,
) -> Result<StepOutcome, ScenarioError> {
    let (description, result) = match &scenario_step.action {
        Action::Grant {
            role,
            target,
            caller,
        } => {
            let target = resolve_account(step, target)?;
            let caller = resolve_account(step, caller)?;
            (
                format!("grant {} to {} by {}", role, target, caller),
                registry
                    .grant_role(*role, target, caller)
                    .map(|_| StepValue::Done),
            )
        }
        Action::Revoke {
            role,
            target,
            caller,
        } => {
            let target = resolve_account(step, target)?;
            let caller = resolve_account(step, caller)?;
            (
                format!("revoke {} from {} by {}", role, target, caller),
                registry
                    .revoke_role(*role, target, caller)
                    .map(|_| StepValue::Done),
            )
        }
        Action::Create { name, caller } => {
            let caller = resolve_account(step, caller)?;
            let parsed =
                ProposalName::new(name).map_err(|source| ScenarioError::Name { step, source })?;
            (
                format!("create \"{}\" by {}", name, caller),
                registry
                    .create_proposal(parsed, caller)
                    .map(StepValue::Created),
            )
        }
        Action::Vote {
            proposal,
            option,
            caller,
        } => {
            let caller = resolve_account(step, caller)?;
            let id = resolve_proposal(step, proposal)?;
            (
                format!("vote {} on {} by {}", option, id, caller),
                registry
                    .vote_proposal(id, *option, caller)
                    .map(|_| StepValue::Done),
            )
        }
        Action::Show { proposal } => {
            let id = resolve_proposal(step, proposal)?;
            (
                format!("show {}", id),
                registry
                    .get_proposal(&id)
                    .map(|p| StepValue::Proposal(Box::new(p.clone()))),
            )
        }
    };

    Ok(StepOutcome {
        step,
        description,
        result,
        expect_error: scenario_step.expect_error.clone(),
    })
}

/// [`parse_account`] with the step number attached to errors.
pub fn resolve_account(step: usize, account: &str) -> Result<Identity, ScenarioError> {
    parse_account(account).map_err(|source| ScenarioError::Identity { step, source })
}

/// `0x…` parses as an address; anything else is a key label.
pub fn parse_account(account: &str) -> Result<Identity, IdentityParseError> {
    if account.starts_with("0x") {
        account.parse()
    } else {
        Ok(Identity::from_public_key(account.as_bytes()))
    }
}

/// `0x…` parses as an id; anything else is a proposal name.
pub fn resolve_proposal(step: usize, proposal: &str) -> Result<ProposalId, ScenarioError> {
    if proposal.starts_with("0x") {
        proposal
            .parse()
            .map_err(|source| ScenarioError::Name { step, source })
    } else {
        let name =
            ProposalName::new(proposal).map_err(|source| ScenarioError::Name { step, source })?;
        Ok(ProposalId::derive(&name))
    }
}
