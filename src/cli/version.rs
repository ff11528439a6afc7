/// Display version information
pub fn execute() {
    println!("voting-registry {}", env!("CARGO_PKG_VERSION"));
    println!("Operator CLI for the role-gated voting registry");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_execute() {
        // Version command should not panic
        execute();
    }
}
