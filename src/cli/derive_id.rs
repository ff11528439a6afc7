use voting_registry::{ProposalId, ProposalName};

/// Print the proposal id for a name
///
/// The id is derived from the name alone, so callers can compute it without
/// access to a registry.
pub fn execute(name: &str) -> Result<(), Box<dyn std::error::Error>> {
    let name = ProposalName::new(name)?;
    println!("{}", ProposalId::derive(&name));
    Ok(())
}
