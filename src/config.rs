//! Machine configuration.
//!
//! Limits that bound construction and reentrant transition chains. The
//! defaults suit small embedded trees; embedders can deserialize overrides
//! from any serde format.

use serde::{Deserialize, Serialize};

/// Default bound on nested `transition_to` calls within one logical transition.
pub const DEFAULT_MAX_RECURSION_DEPTH: u32 = 10;

/// Default bound on the number of states a tree may hold.
pub const DEFAULT_MAX_STATES: usize = 100;

/// Tunable limits for a state machine.
///
/// # Example
///
/// ```rust
/// use stratum::MachineConfig;
///
/// let config = MachineConfig::default().with_max_recursion_depth(4);
/// assert_eq!(config.max_recursion_depth, 4);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    /// Maximum depth of reentrant `transition_to` calls before the in-flight
    /// transition is aborted.
    pub max_recursion_depth: u32,

    /// Maximum number of states accepted by a tree builder.
    pub max_states: usize,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            max_recursion_depth: DEFAULT_MAX_RECURSION_DEPTH,
            max_states: DEFAULT_MAX_STATES,
        }
    }
}

impl MachineConfig {
    /// Set the reentrant transition limit
    pub fn with_max_recursion_depth(mut self, depth: u32) -> Self {
        self.max_recursion_depth = depth;
        self
    }

    /// Set the state capacity
    pub fn with_max_states(mut self, states: usize) -> Self {
        self.max_states = states;
        self
    }

    /// Check that the limits describe a usable machine.
    ///
    /// A recursion depth of zero would reject even the outermost transition.
    pub fn validate(&self) -> Result<(), crate::builder::BuildError> {
        if self.max_recursion_depth == 0 {
            return Err(crate::builder::BuildError::InvalidRecursionDepth);
        }
        if self.max_states == 0 {
            return Err(crate::builder::BuildError::CapacityExceeded { max: 0 });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::BuildError;

    #[test]
    fn defaults_match_embedded_limits() {
        let config = MachineConfig::default();
        assert_eq!(config.max_recursion_depth, 10);
        assert_eq!(config.max_states, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_recursion_depth_is_rejected() {
        let config = MachineConfig::default().with_max_recursion_depth(0);
        assert!(matches!(
            config.validate(),
            Err(BuildError::InvalidRecursionDepth)
        ));
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let config = MachineConfig::default().with_max_states(0);
        assert!(matches!(
            config.validate(),
            Err(BuildError::CapacityExceeded { max: 0 })
        ));
    }

    #[test]
    fn partial_json_fills_in_defaults() {
        let config: MachineConfig = serde_json::from_str(r#"{"max_recursion_depth": 3}"#).unwrap();
        assert_eq!(config.max_recursion_depth, 3);
        assert_eq!(config.max_states, DEFAULT_MAX_STATES);
    }

    #[test]
    fn config_serializes_correctly() {
        let config = MachineConfig::default().with_max_states(12);
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: MachineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }
}
