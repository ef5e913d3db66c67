//! Version string for the writeflow CLI.

/// Package version baked in at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn version_line() -> String {
    format!("writeflow {}", VERSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_line() {
        let line = version_line();
        assert!(line.starts_with("writeflow "));
        assert!(line.ends_with(VERSION));
        assert!(VERSION.split('.').count() >= 2);
    }
}
