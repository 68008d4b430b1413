//! Handle given to hooks, and the transition engine behind it.
//!
//! Hooks reach back into the machine only through [`Context`]: they may
//! request a transition, mark the current event handled, and touch the
//! application environment. `transition_to` may be called from inside an
//! entry or exit hook that is itself part of a running transition; the
//! markers and recursion counter in the runtime let the nested call take
//! over without repeating or skipping hooks.

use crate::core::{StateId, StateTree};
use crate::engine::runtime::{Fault, MarkerGuard, Runtime};
use tracing::{debug, trace, warn};

/// Access to the machine from inside a state's hooks.
///
/// # Example
///
/// ```rust
/// use stratum::{StateMachine, StateTreeBuilder};
///
/// let mut builder = StateTreeBuilder::<Vec<&'static str>, ()>::new();
/// let parent = builder.declare("Parent");
/// let child = builder.declare_child("Child", parent);
///
/// // Entering the parent always drills down into the child.
/// builder
///     .define(parent)
///     .on_entry(move |ctx| {
///         ctx.env_mut().push("enter parent");
///         ctx.transition_to(child);
///     });
/// builder
///     .define(child)
///     .on_entry(|ctx| ctx.env_mut().push("enter child"));
///
/// let mut machine = StateMachine::new(builder.build().unwrap(), Vec::new());
/// machine.initial_transition(parent).unwrap();
///
/// assert_eq!(machine.current_state(), Some(child));
/// assert_eq!(machine.env(), &vec!["enter parent", "enter child"]);
/// ```
pub struct Context<'a, Env, E> {
    tree: &'a StateTree<Env, E>,
    runtime: &'a mut Runtime,
    env: &'a mut Env,
}

impl<'a, Env, E> Context<'a, Env, E> {
    pub(crate) fn new(
        tree: &'a StateTree<Env, E>,
        runtime: &'a mut Runtime,
        env: &'a mut Env,
    ) -> Self {
        Self { tree, runtime, env }
    }

    /// Shared access to the application environment.
    pub fn env(&self) -> &Env {
        &*self.env
    }

    /// Mutable access to the application environment.
    pub fn env_mut(&mut self) -> &mut Env {
        &mut *self.env
    }

    /// The tree the machine runs on.
    ///
    /// The borrow outlives the context, so names read from it can be held
    /// across calls to [`env_mut`](Self::env_mut).
    pub fn tree(&self) -> &'a StateTree<Env, E> {
        self.tree
    }

    /// Look up a state by name.
    pub fn state(&self, name: &str) -> Option<StateId> {
        self.tree.find(name)
    }

    /// The state the engine currently considers active.
    ///
    /// Inside entry and exit hooks this reflects the transition's progress,
    /// so it may be an intermediate state.
    pub fn current_state(&self) -> Option<StateId> {
        self.runtime.current
    }

    /// Stop the current event from bubbling to further ancestors.
    ///
    /// Has no effect on the active state.
    pub fn mark_event_handled(&mut self) {
        self.runtime.event_handled = true;
    }

    /// Move the machine to `destination`, running the exit hooks of the
    /// states being left (innermost first) and the entry hooks of the states
    /// being entered (outermost first).
    ///
    /// Requesting a transition also stops the current event from bubbling.
    /// Transitioning to the active state exits and re-enters it.
    ///
    /// Problems are not returned here: a `destination` outside this tree's
    /// id range is ignored and exceeding the recursion limit abandons the
    /// transition. Both are reported by the outermost `initial_transition`
    /// or `handle_event`.
    pub fn transition_to(&mut self, destination: StateId) {
        self.runtime.transition_requested = true;

        if !self.tree.contains(destination) {
            warn!(id = %destination, "transition to unknown state ignored");
            self.runtime.record(Fault::UnknownState(destination));
            return;
        }

        self.runtime.recursion_counter += 1;
        if self.runtime.recursion_counter > self.runtime.max_recursion_depth {
            warn!(
                destination = self.tree.name(destination),
                limit = self.runtime.max_recursion_depth,
                "recursion limit reached, aborting transition"
            );
            self.runtime.record(Fault::RecursionLimit);
            return;
        }
        let depth = self.runtime.recursion_counter;

        debug!(
            destination = self.tree.name(destination),
            from = self.runtime.current.map(|state| self.tree.name(state)),
            depth,
            "transition started"
        );

        self.reconcile_markers(destination);
        self.walk_to(destination, depth);

        debug!(
            depth,
            current = self.runtime.current.map(|state| self.tree.name(state)),
            "transition finished"
        );

        if depth == 1 {
            self.runtime.recursion_counter = 0;
        }
    }

    /// A transition requested from inside an entry or exit hook starts from
    /// where the interrupted transition actually got to.
    fn reconcile_markers(&mut self, destination: StateId) {
        if let Some(entering) = self.runtime.called_entry {
            if encloses(self.tree, entering, destination) {
                // Entry already ran; do not enter it again on the way down.
                debug!(
                    state = self.tree.name(entering),
                    "treating state as entered"
                );
                self.runtime.current = Some(entering);
                self.runtime.called_entry = None;
            }
        }

        if let Some(exiting) = self.runtime.called_exit {
            if !encloses(self.tree, exiting, destination) {
                // Exit already ran; do not exit it again on the way up.
                debug!(state = self.tree.name(exiting), "treating state as exited");
                self.runtime.current = self.tree.parent(exiting);
                self.runtime.called_exit = None;
            }
        }
    }

    fn walk_to(&mut self, destination: StateId, depth: u32) {
        if self.runtime.current == Some(destination) {
            trace!(state = self.tree.name(destination), "re-entering state");
            self.invoke_exit(destination, false);
            if self.runtime.recursion_counter != depth {
                return;
            }
            self.runtime.current = self.tree.parent(destination);
        }

        while self.runtime.current != Some(destination) {
            if let Some(next) = self.next_toward(destination) {
                self.invoke_entry(next);
                if self.runtime.recursion_counter != depth {
                    break;
                }
                self.runtime.current = Some(next);
                continue;
            }

            // The active state is off the destination's branch: back out.
            let Some(leaving) = self.runtime.current else {
                break;
            };
            self.invoke_exit(leaving, true);
            if self.runtime.recursion_counter != depth {
                break;
            }
            self.runtime.current = self.tree.parent(leaving);
        }
    }

    /// The state on the destination's branch whose parent is the active
    /// state, i.e. the next state to enter on the way down.
    fn next_toward(&self, destination: StateId) -> Option<StateId> {
        let current = self.runtime.current;
        std::iter::once(destination)
            .chain(self.tree.ancestors(destination))
            .find(|&state| self.tree.parent(state) == current)
    }

    fn invoke_entry(&mut self, state: StateId) {
        let tree = self.tree;
        trace!(state = tree.name(state), "entry");
        let mut guard = MarkerGuard::entry(self.runtime, state);
        let mut ctx = Context::new(tree, &mut guard, self.env);
        tree.node(state).enter(&mut ctx);
    }

    /// Self-transitions exit without a marker: re-entry follows immediately
    /// and there is nothing for a nested transition to reconcile.
    fn invoke_exit(&mut self, state: StateId, marked: bool) {
        let tree = self.tree;
        trace!(state = tree.name(state), "exit");
        if marked {
            let mut guard = MarkerGuard::exit(self.runtime, state);
            let mut ctx = Context::new(tree, &mut guard, self.env);
            tree.node(state).leave(&mut ctx);
        } else {
            let mut ctx = Context::new(tree, self.runtime, self.env);
            tree.node(state).leave(&mut ctx);
        }
    }
}

/// `outer` is `inner` or one of its ancestors.
fn encloses<Env, E>(tree: &StateTree<Env, E>, outer: StateId, inner: StateId) -> bool {
    outer == inner || tree.is_ancestor_of(outer, inner)
}
