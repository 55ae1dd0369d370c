//! Environment toggles read at startup.

use crate::constants::DEBUG_ENV_VAR;

/// Interpret an environment value as a boolean switch.
///
/// `1`, `true`, `yes` and `on` (any case) enable the switch; everything else,
/// including an empty value, leaves it off.
pub fn parse_env_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// True when verbose diagnostic logging was requested through the environment.
pub fn debug_logging_requested() -> bool {
    std::env::var(DEBUG_ENV_VAR)
        .map(|v| parse_env_flag(&v))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_env_flag_truthy() {
        for value in ["1", "true", "TRUE", "yes", " on "] {
            assert!(parse_env_flag(value), "{} should enable", value);
        }
    }

    #[test]
    fn test_parse_env_flag_falsy() {
        for value in ["", "0", "false", "off", "debug"] {
            assert!(!parse_env_flag(value), "{} should not enable", value);
        }
    }
}
