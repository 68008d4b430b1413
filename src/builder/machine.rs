//! Builder for constructing state machines.

use crate::builder::error::BuildError;
use crate::config::MachineConfig;
use crate::core::StateTree;
use crate::engine::StateMachine;

/// Builder for state machines with non-default limits.
///
/// # Example
///
/// ```rust
/// use stratum::{StateMachineBuilder, StateTreeBuilder};
///
/// let mut states = StateTreeBuilder::<(), ()>::new();
/// let only = states.declare("Only");
///
/// let mut machine = StateMachineBuilder::new(())
///     .tree(states.build().unwrap())
///     .max_recursion_depth(3)
///     .build()
///     .unwrap();
///
/// machine.initial_transition(only).unwrap();
/// assert_eq!(machine.config().max_recursion_depth, 3);
/// ```
pub struct StateMachineBuilder<Env, E> {
    tree: Option<StateTree<Env, E>>,
    env: Env,
    config: MachineConfig,
}

impl<Env, E> StateMachineBuilder<Env, E> {
    /// Create a new builder around the application environment.
    pub fn new(env: Env) -> Self {
        Self {
            tree: None,
            env,
            config: MachineConfig::default(),
        }
    }

    /// Set the state tree (required).
    pub fn tree(mut self, tree: StateTree<Env, E>) -> Self {
        self.tree = Some(tree);
        self
    }

    /// Replace all limits at once.
    pub fn config(mut self, config: MachineConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the reentrant transition limit
    pub fn max_recursion_depth(mut self, depth: u32) -> Self {
        self.config.max_recursion_depth = depth;
        self
    }

    /// Build the state machine.
    /// Returns an error if the tree is missing or the limits are unusable.
    pub fn build(self) -> Result<StateMachine<Env, E>, BuildError> {
        let tree = self.tree.ok_or(BuildError::MissingTree)?;
        self.config.validate()?;

        if tree.len() > self.config.max_states {
            return Err(BuildError::CapacityExceeded {
                max: self.config.max_states,
            });
        }

        Ok(StateMachine::with_config(tree, self.env, self.config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::StateTreeBuilder;

    fn tree(states: usize) -> StateTree<(), ()> {
        let mut builder = StateTreeBuilder::new();
        for index in 0..states {
            builder.declare(format!("S{index}"));
        }
        builder.build().unwrap()
    }

    #[test]
    fn builder_requires_tree() {
        let result = StateMachineBuilder::<(), ()>::new(()).build();
        assert!(matches!(result, Err(BuildError::MissingTree)));
    }

    #[test]
    fn builder_rejects_zero_recursion_depth() {
        let result = StateMachineBuilder::new(())
            .tree(tree(1))
            .max_recursion_depth(0)
            .build();
        assert!(matches!(result, Err(BuildError::InvalidRecursionDepth)));
    }

    #[test]
    fn builder_checks_tree_against_capacity() {
        let result = StateMachineBuilder::new(())
            .tree(tree(3))
            .config(MachineConfig::default().with_max_states(2))
            .build();
        assert!(matches!(
            result,
            Err(BuildError::CapacityExceeded { max: 2 })
        ));
    }

    #[test]
    fn fluent_api_builds_machine() {
        let machine = StateMachineBuilder::new(())
            .tree(tree(2))
            .max_recursion_depth(5)
            .build()
            .unwrap();

        assert_eq!(machine.config().max_recursion_depth, 5);
        assert_eq!(machine.current_state(), None);
        assert_eq!(machine.tree().len(), 2);
    }
}
