//! Build errors for state trees and machines.

use crate::core::StateId;
use thiserror::Error;

/// Errors that can occur when building state trees and machines.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("State tree not specified. Call .tree(tree) before .build()")]
    MissingTree,

    #[error("No states declared. Declare at least one state")]
    EmptyTree,

    #[error("Maximum recursion depth must be at least 1")]
    InvalidRecursionDepth,

    #[error("State capacity ({max}) exceeded")]
    CapacityExceeded { max: usize },

    #[error("State name '{name}' is declared more than once")]
    DuplicateName { name: String },

    #[error("State {id} was not declared by this builder")]
    UnknownState { id: StateId },

    #[error("State '{name}' cannot be its own parent")]
    SelfParent { name: String },

    #[error("Parent links form a cycle through state '{name}'")]
    CycleDetected { name: String },
}
