/// Display version information
pub fn execute() {
    println!("santa {}", env!("CARGO_PKG_VERSION"));
    println!("Secret Santa assignment engine");
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
