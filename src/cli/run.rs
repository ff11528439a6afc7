use super::config::{default_config_path, RegistryConfig};
use super::init_logging;
use std::path::PathBuf;
use voting_registry::scenario::Scenario;

/// Deploy a registry and play a scenario against it
///
/// ## Deployer
///
/// The deploying identity (initial admin) comes from, in order of precedence:
/// 1. `deployer` in the scenario file
/// 2. `[deployment] deployer` in the config file
///
/// An explicit `--config` must exist; the default config is optional.
///
/// ## Output
///
/// One line per step on stdout, then the event log. With `--json` each event
/// is printed as a single JSON object per line.
///
/// Returns an error when any step's outcome differs from its expectation.
pub async fn execute(
    scenario_path: String,
    config_path: Option<String>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = match config_path {
        Some(path) => Some(RegistryConfig::load(&PathBuf::from(path))?),
        None => {
            let default = default_config_path();
            if default.exists() {
                Some(RegistryConfig::load(&default)?)
            } else {
                None
            }
        }
    };

    let level = config
        .as_ref()
        .map(|c| c.logging.level.clone())
        .unwrap_or_else(|| "info".to_string());
    init_logging(&level);

    let scenario = Scenario::load(&PathBuf::from(&scenario_path))?;
    let report = scenario.run(config.map(|c| c.deployment.deployer))?;

    println!("Deployer: {}", report.deployer);
    println!();
    for outcome in &report.outcomes {
        println!("{}", outcome);
    }

    println!();
    println!("Events:");
    for record in &report.events {
        if json {
            println!("{}", serde_json::to_string(record)?);
        } else {
            println!("  [{}] {}", record.sequence, record.event);
        }
    }

    let unexpected = report.unexpected().count();
    if unexpected > 0 {
        return Err(format!(
            "{} step(s) in '{}' did not match expectations",
            unexpected, scenario_path
        )
        .into());
    }

    Ok(())
}
