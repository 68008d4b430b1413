//! Transition and dispatch errors.

use crate::core::StateId;
use thiserror::Error;

/// Errors surfaced by the outermost engine call once a dispatch completes.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransitionError {
    /// Reentrant transitions nested deeper than the configured limit. The
    /// in-flight transition was abandoned; `stranded_in` is where the
    /// machine was left, possibly a non-leaf state.
    #[error("Transition chain exceeded the recursion limit ({limit})")]
    RecursionLimitExceeded {
        limit: u32,
        stranded_in: Option<String>,
    },

    /// A hook asked for a state id outside this machine's tree. Ids from
    /// another tree that happen to be in range are not detected.
    #[error("State {id} does not belong to this machine")]
    UnknownState { id: StateId },

    #[error("No initial transition yet. Call .initial_transition(state) first")]
    NotInitialized,

    #[error("Initial transition already performed")]
    AlreadyInitialized,
}
