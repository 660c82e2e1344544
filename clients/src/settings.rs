//! Settings file for the `multiplied` binary.
//!
//! ```toml
//! patterns = ["aaab"]
//!
//! [algorithm]
//! max_stages = 20
//! zero_operands = "replay"
//! ignore_zeros = true
//! ```
//!
//! Every key is optional.

use multiplied::AlgorithmConfig;
use serde::{Deserialize, Serialize};

/// Planning and execution settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Algorithm tunables.
    pub algorithm: AlgorithmConfig,
    /// Patterns pushed before greedy resolution, in order.
    pub patterns: Vec<String>,
}

impl Settings {
    /// Parse settings from TOML text.
    ///
    /// # Errors
    ///
    /// Returns the TOML error for malformed text or unknown keys.
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use multiplied::ZeroOperandPolicy;

    #[test]
    fn empty_text_is_default() {
        assert_eq!(Settings::from_toml_str("").unwrap(), Settings::default());
    }

    #[test]
    fn full_document() {
        let settings = Settings::from_toml_str(
            r#"
            patterns = ["aabb", "aab_"]

            [algorithm]
            max_stages = 20
            zero_operands = "replay"
            "#,
        )
        .unwrap();
        assert_eq!(settings.patterns, vec!["aabb", "aab_"]);
        assert_eq!(settings.algorithm.max_stages, 20);
        assert_eq!(settings.algorithm.zero_operands, ZeroOperandPolicy::Replay);
        assert!(settings.algorithm.ignore_zeros);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(Settings::from_toml_str("stages = 3").is_err());
        assert!(Settings::from_toml_str("[algorithm]\nlimit = 3").is_err());
    }
}
