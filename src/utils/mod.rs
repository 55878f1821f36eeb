//! Utility functions for bytepatch

use std::env;

/// Check if an environment variable is set to a truthy value
/// Accepts: "1", "true", "on", "yes", "t" (case insensitive)
pub fn is_env_true(key: &str) -> bool {
    match env::var(key) {
        Ok(val) => is_truthy(&val),
        Err(_) => false,
    }
}

fn is_truthy(val: &str) -> bool {
    let val_lower = val.to_lowercase();
    matches!(val_lower.as_str(), "1" | "true" | "on" | "yes" | "t")
}

/// Render bytes as space-separated upper-case hex pairs, e.g. `AA BB CC`
pub fn format_bytes(bytes: &[u8]) -> String {
    bytes
        .chunks(1)
        .map(hex::encode_upper)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truthy_values() {
        for val in ["1", "true", "TRUE", "on", "Yes", "t"] {
            assert!(is_truthy(val), "{val} should be truthy");
        }
        for val in ["0", "false", "", "off", "nope"] {
            assert!(!is_truthy(val), "{val} should not be truthy");
        }
    }

    #[test]
    fn test_unset_env_is_false() {
        assert!(!is_env_true("BYTEPATCH_TEST_SURELY_UNSET_VARIABLE"));
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(&[0xAA, 0xBB, 0x0C]), "AA BB 0C");
        assert_eq!(format_bytes(&[]), "");
    }
}
