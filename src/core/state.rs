//! State nodes and their handles.
//!
//! A state is a named node carrying three application hooks and an optional
//! back-reference to its parent. Nodes are immutable once the tree is built.

use crate::engine::Context;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Hook invoked when a state becomes active or inactive.
pub type LifecycleHook<Env, E> = Box<dyn Fn(&mut Context<'_, Env, E>)>;

/// Hook invoked with each event delivered to a state.
pub type EventHook<Env, E> = Box<dyn Fn(&mut Context<'_, Env, E>, &E)>;

/// Handle to a state inside a [`StateTree`](super::StateTree).
///
/// Handles are plain indices: cheap to copy and capture in callbacks.
/// A handle is only meaningful for the tree (or builder) that issued it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StateId(pub(crate) usize);

impl StateId {
    /// Position of the state in declaration order.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A single state: diagnostic name, parent link, and hooks.
///
/// Hooks that were never supplied behave as no-ops.
pub struct StateNode<Env, E> {
    pub(crate) name: String,
    pub(crate) parent: Option<StateId>,
    pub(crate) entry: Option<LifecycleHook<Env, E>>,
    pub(crate) event: Option<EventHook<Env, E>>,
    pub(crate) exit: Option<LifecycleHook<Env, E>>,
}

impl<Env, E> StateNode<Env, E> {
    pub(crate) fn new(name: String) -> Self {
        Self {
            name,
            parent: None,
            entry: None,
            event: None,
            exit: None,
        }
    }

    /// Get the state's name for display/logging.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parent state, or `None` for a root.
    pub fn parent(&self) -> Option<StateId> {
        self.parent
    }

    /// Check if this state sits at the top of its tree.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub(crate) fn enter(&self, ctx: &mut Context<'_, Env, E>) {
        if let Some(hook) = &self.entry {
            hook(ctx);
        }
    }

    pub(crate) fn deliver(&self, ctx: &mut Context<'_, Env, E>, event: &E) {
        if let Some(hook) = &self.event {
            hook(ctx, event);
        }
    }

    pub(crate) fn leave(&self, ctx: &mut Context<'_, Env, E>) {
        if let Some(hook) = &self.exit {
            hook(ctx);
        }
    }
}

impl<Env, E> fmt::Debug for StateNode<Env, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateNode")
            .field("name", &self.name)
            .field("parent", &self.parent)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_node_is_a_root() {
        let node: StateNode<(), ()> = StateNode::new("Idle".to_string());
        assert_eq!(node.name(), "Idle");
        assert!(node.is_root());
        assert_eq!(node.parent(), None);
    }

    #[test]
    fn state_id_displays_its_index() {
        assert_eq!(StateId(7).to_string(), "#7");
        assert_eq!(StateId(7).index(), 7);
    }

    #[test]
    fn state_id_serializes_correctly() {
        let id = StateId(3);
        let json = serde_json::to_string(&id).unwrap();
        let deserialized: StateId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }

    #[test]
    fn debug_output_omits_hooks() {
        let mut node: StateNode<(), ()> = StateNode::new("Child".to_string());
        node.parent = Some(StateId(0));
        let rendered = format!("{node:?}");
        assert!(rendered.contains("Child"));
        assert!(rendered.contains("StateId(0)"));
    }
}
