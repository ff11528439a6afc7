use super::config::{default_config_path, RegistryConfig};
use std::path::PathBuf;
use voting_registry::scenario::parse_account;

/// Write a default config file naming the deployer
///
/// Refuses to overwrite an existing file unless `force` is set.
pub fn execute(
    deployer: String,
    path: Option<String>,
    force: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let path = path.map(PathBuf::from).unwrap_or_else(default_config_path);

    if path.exists() && !force {
        return Err(format!(
            "Config file '{}' already exists (use --force to overwrite)",
            path.display()
        )
        .into());
    }

    let deployer = parse_account(&deployer)?;
    RegistryConfig::create_default(&path, &deployer)?;

    println!("Created: {}", path.display());
    println!("Deployer: {}", deployer);
    Ok(())
}
