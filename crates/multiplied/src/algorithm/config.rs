//! Tunables for stage planning and execution.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Stage ceiling applied by [`Algorithm::auto_resolve_stage`](super::Algorithm::auto_resolve_stage).
pub const DEFAULT_MAX_STAGES: usize = 50;

/// What [`Algorithm::exec`](super::Algorithm::exec) does when an operand is 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ZeroOperandPolicy {
    /// Return only the zero shape as stage 0; no stage is executed.
    #[default]
    ShortCircuit,
    /// Run every stage against the zero shape.
    Replay,
}

/// Algorithm configuration.
///
/// With the `serde` feature this deserializes from partial documents, every
/// missing field keeping its default:
///
/// ```toml
/// max_stages = 20
/// zero_operands = "replay"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct AlgorithmConfig {
    /// Most stages automatic resolution may push.
    pub max_stages: usize,
    /// Zero operand handling in `exec`.
    pub zero_operands: ZeroOperandPolicy,
    /// When deriving row maps, treat rows of only `Zero` cells as occupied.
    pub ignore_zeros: bool,
}

impl Default for AlgorithmConfig {
    fn default() -> Self {
        Self {
            max_stages: DEFAULT_MAX_STAGES,
            zero_operands: ZeroOperandPolicy::default(),
            ignore_zeros: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = AlgorithmConfig::default();
        assert_eq!(config.max_stages, 50);
        assert_eq!(config.zero_operands, ZeroOperandPolicy::ShortCircuit);
        assert!(config.ignore_zeros);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn partial_json_keeps_defaults() {
        let config: AlgorithmConfig =
            serde_json::from_str(r#"{"zero_operands": "replay"}"#).unwrap();
        assert_eq!(config.zero_operands, ZeroOperandPolicy::Replay);
        assert_eq!(config.max_stages, DEFAULT_MAX_STAGES);

        let err = serde_json::from_str::<AlgorithmConfig>(r#"{"stages": 3}"#);
        assert!(err.is_err());
    }
}
