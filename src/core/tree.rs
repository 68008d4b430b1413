//! Immutable state tree and ancestor queries.
//!
//! The tree stores parent links only; there are no child lists. Every
//! query walks the parent chain and costs O(depth) without allocating.

use super::state::{StateId, StateNode};
use std::fmt;

/// A validated forest of states.
///
/// Built once by [`StateTreeBuilder`](crate::builder::StateTreeBuilder) and
/// never mutated afterwards. Parent links are guaranteed acyclic.
///
/// # Example
///
/// ```rust
/// use stratum::StateTreeBuilder;
///
/// let mut builder = StateTreeBuilder::<(), ()>::new();
/// let door = builder.declare("Door");
/// let open = builder.declare("Open");
/// builder.define(open).parent(door);
/// let tree = builder.build().unwrap();
///
/// assert!(tree.is_ancestor_of(door, open));
/// assert!(!tree.is_ancestor_of(open, open));
/// assert_eq!(tree.depth(open), 1);
/// ```
pub struct StateTree<Env, E> {
    pub(crate) nodes: Vec<StateNode<Env, E>>,
}

impl<Env, E> StateTree<Env, E> {
    /// Number of states in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the tree holds no states.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Check if `id` falls inside this tree's id range.
    ///
    /// Ids carry no tree tag, so a handle from another builder is only
    /// rejected when its index is out of range here.
    pub fn contains(&self, id: StateId) -> bool {
        id.0 < self.nodes.len()
    }

    /// Look up a state node.
    pub fn get(&self, id: StateId) -> Option<&StateNode<Env, E>> {
        self.nodes.get(id.0)
    }

    pub(crate) fn node(&self, id: StateId) -> &StateNode<Env, E> {
        &self.nodes[id.0]
    }

    /// Name of a state, or `"?"` for a foreign handle.
    pub fn name(&self, id: StateId) -> &str {
        self.get(id).map_or("?", StateNode::name)
    }

    /// Parent of a state.
    pub fn parent(&self, id: StateId) -> Option<StateId> {
        self.get(id).and_then(StateNode::parent)
    }

    /// Find a state by name.
    pub fn find(&self, name: &str) -> Option<StateId> {
        self.nodes
            .iter()
            .position(|node| node.name == name)
            .map(StateId)
    }

    /// Iterate over every state in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (StateId, &StateNode<Env, E>)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (StateId(index), node))
    }

    /// Walk from the parent of `id` up to its root.
    ///
    /// The state itself is not yielded.
    pub fn ancestors(&self, id: StateId) -> Ancestors<'_, Env, E> {
        Ancestors {
            tree: self,
            next: self.parent(id),
        }
    }

    /// Check if `candidate` appears on the parent chain of `node`.
    ///
    /// A state is never its own ancestor.
    pub fn is_ancestor_of(&self, candidate: StateId, node: StateId) -> bool {
        self.ancestors(node).any(|ancestor| ancestor == candidate)
    }

    /// Number of ancestors above `id`; roots have depth 0.
    pub fn depth(&self, id: StateId) -> usize {
        self.ancestors(id).count()
    }

    /// Topmost ancestor of `id`, or `id` itself when it is a root.
    pub fn root_of(&self, id: StateId) -> StateId {
        self.ancestors(id).last().unwrap_or(id)
    }

    /// Slash-separated names from the root down to `id`.
    pub fn path(&self, id: StateId) -> String {
        let mut names: Vec<&str> = std::iter::once(id)
            .chain(self.ancestors(id))
            .map(|state| self.name(state))
            .collect();
        names.reverse();
        names.join("/")
    }
}

impl<Env, E> fmt::Debug for StateTree<Env, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.nodes.iter()).finish()
    }
}

/// Iterator over the ancestors of a state, innermost first.
pub struct Ancestors<'a, Env, E> {
    tree: &'a StateTree<Env, E>,
    next: Option<StateId>,
}

impl<Env, E> Iterator for Ancestors<'_, Env, E> {
    type Item = StateId;

    fn next(&mut self) -> Option<StateId> {
        let current = self.next?;
        self.next = self.tree.parent(current);
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Root
    // ├── A
    // │   └── A1
    // │       └── A1x
    // └── B
    // Other
    fn sample() -> StateTree<(), ()> {
        let mut nodes: Vec<StateNode<(), ()>> = ["Root", "A", "A1", "A1x", "B", "Other"]
            .iter()
            .map(|name| StateNode::new(name.to_string()))
            .collect();
        nodes[1].parent = Some(StateId(0));
        nodes[2].parent = Some(StateId(1));
        nodes[3].parent = Some(StateId(2));
        nodes[4].parent = Some(StateId(0));
        StateTree { nodes }
    }

    #[test]
    fn ancestors_walk_innermost_first() {
        let tree = sample();
        let chain: Vec<StateId> = tree.ancestors(StateId(3)).collect();
        assert_eq!(chain, vec![StateId(2), StateId(1), StateId(0)]);
    }

    #[test]
    fn root_has_no_ancestors() {
        let tree = sample();
        assert_eq!(tree.ancestors(StateId(0)).count(), 0);
        assert_eq!(tree.depth(StateId(0)), 0);
    }

    #[test]
    fn is_ancestor_of_excludes_self() {
        let tree = sample();
        assert!(tree.is_ancestor_of(StateId(0), StateId(3)));
        assert!(tree.is_ancestor_of(StateId(2), StateId(3)));
        assert!(!tree.is_ancestor_of(StateId(3), StateId(3)));
        assert!(!tree.is_ancestor_of(StateId(3), StateId(0)));
    }

    #[test]
    fn siblings_are_not_ancestors() {
        let tree = sample();
        assert!(!tree.is_ancestor_of(StateId(4), StateId(2)));
        assert!(!tree.is_ancestor_of(StateId(1), StateId(4)));
    }

    #[test]
    fn separate_roots_are_unrelated() {
        let tree = sample();
        assert!(!tree.is_ancestor_of(StateId(5), StateId(3)));
        assert_eq!(tree.root_of(StateId(5)), StateId(5));
        assert_eq!(tree.root_of(StateId(3)), StateId(0));
    }

    #[test]
    fn path_joins_names_from_root() {
        let tree = sample();
        assert_eq!(tree.path(StateId(3)), "Root/A/A1/A1x");
        assert_eq!(tree.path(StateId(5)), "Other");
    }

    #[test]
    fn find_looks_up_by_name() {
        let tree = sample();
        assert_eq!(tree.find("B"), Some(StateId(4)));
        assert_eq!(tree.find("Missing"), None);
    }

    #[test]
    fn foreign_handles_are_tolerated() {
        let tree = sample();
        let foreign = StateId(42);
        assert!(!tree.contains(foreign));
        assert_eq!(tree.name(foreign), "?");
        assert_eq!(tree.parent(foreign), None);
        assert_eq!(tree.ancestors(foreign).count(), 0);
    }

    #[test]
    fn contains_checks_the_index_range_only() {
        let tree = sample();
        assert!(tree.contains(StateId(5)));
        assert!(!tree.contains(StateId(6)));
    }
}
