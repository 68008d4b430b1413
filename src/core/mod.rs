//! State tree types.
//!
//! This module contains the leaf component of the machine:
//! - State nodes and their `StateId` handles
//! - The immutable `StateTree` with ancestor-chain queries
//!
//! Nothing here mutates after construction; the engine only reads it.

mod state;
mod tree;

pub use state::{EventHook, LifecycleHook, StateId, StateNode};
pub use tree::{Ancestors, StateTree};
