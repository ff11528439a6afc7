use voting_registry::Identity;

/// Print the address derived from a key or label
pub fn execute(label: &str) {
    println!("{}", Identity::from_public_key(label.as_bytes()));
}
