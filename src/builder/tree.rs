//! Builder for constructing validated state trees.

use crate::builder::error::BuildError;
use crate::config::MachineConfig;
use crate::core::{StateId, StateNode, StateTree};
use crate::engine::Context;
use std::collections::HashSet;

/// Builder for state trees.
///
/// States are declared first, which hands out their ids, and defined
/// afterwards. Callbacks can therefore capture the id of any state, even
/// one declared further down. All problems are reported by [`build`].
///
/// [`build`]: StateTreeBuilder::build
///
/// # Example
///
/// ```rust
/// use stratum::StateTreeBuilder;
///
/// #[derive(Debug)]
/// enum Signal {
///     Open,
/// }
///
/// let mut builder = StateTreeBuilder::<u32, Signal>::new();
/// let closed = builder.declare("Closed");
/// let open = builder.declare("Open");
///
/// builder.define(closed).on_event(move |ctx, signal| match signal {
///     Signal::Open => ctx.transition_to(open),
/// });
/// builder.define(open).on_entry(|ctx| *ctx.env_mut() += 1);
///
/// let tree = builder.build().unwrap();
/// assert_eq!(tree.len(), 2);
/// ```
pub struct StateTreeBuilder<Env, E> {
    nodes: Vec<StateNode<Env, E>>,
    max_states: usize,
    pending: Option<BuildError>,
}

impl<Env, E> StateTreeBuilder<Env, E> {
    /// Create a new builder with the default capacity.
    pub fn new() -> Self {
        Self::with_config(&MachineConfig::default())
    }

    /// Create a builder honouring the capacity in `config`.
    pub fn with_config(config: &MachineConfig) -> Self {
        Self {
            nodes: Vec::new(),
            max_states: config.max_states,
            pending: None,
        }
    }

    /// Override the maximum number of states.
    pub fn max_states(mut self, max: usize) -> Self {
        self.max_states = max;
        self
    }

    /// Reserve a root state named `name` and return its id.
    pub fn declare(&mut self, name: impl Into<String>) -> StateId {
        let id = StateId(self.nodes.len());
        self.nodes.push(StateNode::new(name.into()));
        if self.nodes.len() > self.max_states {
            self.defer(BuildError::CapacityExceeded {
                max: self.max_states,
            });
        }
        id
    }

    /// Reserve a state beneath `parent` and return its id.
    pub fn declare_child(&mut self, name: impl Into<String>, parent: StateId) -> StateId {
        let id = self.declare(name);
        self.define(id).parent(parent);
        id
    }

    /// Start defining the parent link and hooks of a declared state.
    pub fn define(&mut self, id: StateId) -> StateDefiner<'_, Env, E> {
        if id.0 >= self.nodes.len() {
            self.defer(BuildError::UnknownState { id });
        }
        StateDefiner { builder: self, id }
    }

    /// Validate the declarations and freeze them into a tree.
    pub fn build(self) -> Result<StateTree<Env, E>, BuildError> {
        if let Some(error) = self.pending {
            return Err(error);
        }
        if self.nodes.is_empty() {
            return Err(BuildError::EmptyTree);
        }

        let mut seen = HashSet::with_capacity(self.nodes.len());
        for node in &self.nodes {
            if !seen.insert(node.name.as_str()) {
                return Err(BuildError::DuplicateName {
                    name: node.name.clone(),
                });
            }
        }

        for (index, node) in self.nodes.iter().enumerate() {
            match node.parent {
                Some(parent) if parent.0 >= self.nodes.len() => {
                    return Err(BuildError::UnknownState { id: parent });
                }
                Some(parent) if parent.0 == index => {
                    return Err(BuildError::SelfParent {
                        name: node.name.clone(),
                    });
                }
                _ => {}
            }
        }

        if let Some(index) = find_cycle(&self.nodes) {
            return Err(BuildError::CycleDetected {
                name: self.nodes[index].name.clone(),
            });
        }

        Ok(StateTree { nodes: self.nodes })
    }

    fn defer(&mut self, error: BuildError) {
        self.pending.get_or_insert(error);
    }
}

impl<Env, E> Default for StateTreeBuilder<Env, E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Walks every parent chain; a chain longer than the node count must loop.
/// Returns the index of a state lying on the cycle.
fn find_cycle<Env, E>(nodes: &[StateNode<Env, E>]) -> Option<usize> {
    for start in 0..nodes.len() {
        let mut cursor = start;
        let mut steps = 0;
        while let Some(parent) = nodes[cursor].parent {
            cursor = parent.0;
            steps += 1;
            if steps > nodes.len() {
                return Some(cursor);
            }
        }
    }
    None
}

/// Fluent definition of one declared state.
pub struct StateDefiner<'b, Env, E> {
    builder: &'b mut StateTreeBuilder<Env, E>,
    id: StateId,
}

impl<Env, E> StateDefiner<'_, Env, E> {
    /// Set the parent state. Parents are fixed once the tree is built.
    pub fn parent(self, parent: StateId) -> Self {
        self.update(|node| node.parent = Some(parent))
    }

    /// Hook run when the state becomes active.
    pub fn on_entry<F>(self, hook: F) -> Self
    where
        F: Fn(&mut Context<'_, Env, E>) + 'static,
    {
        self.update(|node| node.entry = Some(Box::new(hook)))
    }

    /// Hook run for each event delivered to the state.
    pub fn on_event<F>(self, hook: F) -> Self
    where
        F: Fn(&mut Context<'_, Env, E>, &E) + 'static,
    {
        self.update(|node| node.event = Some(Box::new(hook)))
    }

    /// Hook run when the state becomes inactive.
    pub fn on_exit<F>(self, hook: F) -> Self
    where
        F: Fn(&mut Context<'_, Env, E>) + 'static,
    {
        self.update(|node| node.exit = Some(Box::new(hook)))
    }

    /// Id of the state being defined.
    pub fn id(&self) -> StateId {
        self.id
    }

    fn update(self, apply: impl FnOnce(&mut StateNode<Env, E>)) -> Self {
        if let Some(node) = self.builder.nodes.get_mut(self.id.0) {
            apply(node);
        }
        self
    }
}
