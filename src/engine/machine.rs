//! State machine that owns the tree and dispatches events.

use crate::config::MachineConfig;
use crate::core::{StateId, StateTree};
use crate::engine::context::Context;
use crate::engine::error::TransitionError;
use crate::engine::runtime::{Fault, Runtime};
use tracing::{debug, trace};

/// Result of dispatching one event
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dispatch {
    /// The named state requested a transition while handling the event
    Transitioned { by: StateId },

    /// The named state marked the event handled
    Handled { by: StateId },

    /// Every state up to the root ignored the event
    Unhandled,
}

impl Dispatch {
    /// Check if some state consumed the event.
    pub fn is_consumed(&self) -> bool {
        !matches!(self, Self::Unhandled)
    }

    /// The state that consumed the event, if any.
    pub fn consumed_by(&self) -> Option<StateId> {
        match self {
            Self::Transitioned { by } | Self::Handled { by } => Some(*by),
            Self::Unhandled => None,
        }
    }
}

/// Hierarchical state machine.
///
/// Owns a frozen [`StateTree`], the application environment handed to every
/// hook, and the engine's bookkeeping. Execution is synchronous: each call
/// runs every hook it triggers to completion before returning.
///
/// # Example
///
/// ```rust
/// use stratum::{Dispatch, StateMachine, StateTreeBuilder};
///
/// enum Button {
///     Press,
///     Hold,
/// }
///
/// let mut builder = StateTreeBuilder::<u32, Button>::new();
/// let powered = builder.declare("Powered");
/// let idle = builder.declare_child("Idle", powered);
/// let active = builder.declare_child("Active", powered);
///
/// // The parent handles what its children ignore.
/// builder.define(powered).on_event(|ctx, button| {
///     if let Button::Hold = button {
///         *ctx.env_mut() += 1;
///         ctx.mark_event_handled();
///     }
/// });
/// builder.define(idle).on_event(move |ctx, button| {
///     if let Button::Press = button {
///         ctx.transition_to(active);
///     }
/// });
///
/// let mut machine = StateMachine::new(builder.build().unwrap(), 0);
/// machine.initial_transition(idle).unwrap();
///
/// assert_eq!(
///     machine.handle_event(&Button::Hold).unwrap(),
///     Dispatch::Handled { by: powered }
/// );
/// assert_eq!(
///     machine.handle_event(&Button::Press).unwrap(),
///     Dispatch::Transitioned { by: idle }
/// );
/// assert_eq!(machine.current_state(), Some(active));
/// assert_eq!(*machine.env(), 1);
/// ```
pub struct StateMachine<Env, E> {
    tree: StateTree<Env, E>,
    env: Env,
    runtime: Runtime,
    config: MachineConfig,
    started: bool,
}

impl<Env, E> StateMachine<Env, E> {
    /// Create a machine with the default configuration. No state is active
    /// until [`initial_transition`](Self::initial_transition) runs.
    pub fn new(tree: StateTree<Env, E>, env: Env) -> Self {
        Self::with_config(tree, env, MachineConfig::default())
    }

    pub(crate) fn with_config(tree: StateTree<Env, E>, env: Env, config: MachineConfig) -> Self {
        Self {
            tree,
            env,
            runtime: Runtime::new(config.max_recursion_depth),
            config,
            started: false,
        }
    }

    /// Enter `initial` and every ancestor above it, outermost first.
    ///
    /// Must be called exactly once, before the first event.
    pub fn initial_transition(&mut self, initial: StateId) -> Result<(), TransitionError> {
        if self.started {
            return Err(TransitionError::AlreadyInitialized);
        }
        if !self.tree.contains(initial) {
            return Err(TransitionError::UnknownState { id: initial });
        }
        self.started = true;

        debug!(state = self.tree.name(initial), "initial transition");
        Context::new(&self.tree, &mut self.runtime, &mut self.env).transition_to(initial);
        self.settle()
    }

    /// Deliver `event` to the active state, bubbling it to each ancestor in
    /// turn until one requests a transition or marks it handled.
    ///
    /// An event nobody consumes is dropped and reported as
    /// [`Dispatch::Unhandled`].
    pub fn handle_event(&mut self, event: &E) -> Result<Dispatch, TransitionError> {
        if !self.started {
            return Err(TransitionError::NotInitialized);
        }
        self.runtime.transition_requested = false;
        self.runtime.event_handled = false;

        let mut outcome = Dispatch::Unhandled;
        let mut receiver = self.runtime.current;
        while let Some(state) = receiver {
            let node = self.tree.node(state);
            trace!(state = node.name(), "delivering event");
            node.deliver(
                &mut Context::new(&self.tree, &mut self.runtime, &mut self.env),
                event,
            );

            if self.runtime.transition_requested {
                outcome = Dispatch::Transitioned { by: state };
                break;
            }
            if self.runtime.event_handled {
                outcome = Dispatch::Handled { by: state };
                break;
            }
            receiver = node.parent();
        }

        if outcome == Dispatch::Unhandled {
            trace!("event dropped at root");
        }
        self.settle()?;
        Ok(outcome)
    }

    /// Turn a fault recorded during the call into its error.
    fn settle(&mut self) -> Result<(), TransitionError> {
        match self.runtime.fault.take() {
            None => Ok(()),
            Some(Fault::UnknownState(id)) => Err(TransitionError::UnknownState { id }),
            Some(Fault::RecursionLimit) => Err(TransitionError::RecursionLimitExceeded {
                limit: self.config.max_recursion_depth,
                stranded_in: self.current_state_name().map(str::to_string),
            }),
        }
    }

    /// The active state, or `None` before the initial transition.
    pub fn current_state(&self) -> Option<StateId> {
        self.runtime.current
    }

    /// Name of the active state.
    pub fn current_state_name(&self) -> Option<&str> {
        self.runtime.current.map(|state| self.tree.name(state))
    }

    /// Check if `state` is active, either directly or through a descendant.
    pub fn is_in(&self, state: StateId) -> bool {
        self.runtime
            .current
            .is_some_and(|current| current == state || self.tree.is_ancestor_of(state, current))
    }

    /// Check if the initial transition has run.
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// The tree this machine runs on.
    pub fn tree(&self) -> &StateTree<Env, E> {
        &self.tree
    }

    /// Shared access to the application environment.
    pub fn env(&self) -> &Env {
        &self.env
    }

    /// Mutable access to the application environment.
    pub fn env_mut(&mut self) -> &mut Env {
        &mut self.env
    }

    /// Consume the machine, returning the application environment.
    pub fn into_env(self) -> Env {
        self.env
    }

    /// Limits this machine was built with.
    pub fn config(&self) -> &MachineConfig {
        &self.config
    }
}
