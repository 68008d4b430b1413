//! Transition engine and event dispatcher.
//!
//! This module drives the state tree:
//! - `StateMachine` owns the tree, the application environment, and the
//!   active state, and bubbles events up the ancestor chain
//! - `Context` is what hooks receive; its `transition_to` computes the
//!   exit/entry sequence from parent links alone and tolerates being
//!   called again from inside the hooks it runs
//!
//! Everything is synchronous and single-threaded. The hot path does not
//! allocate.

mod context;
mod error;
mod machine;
mod runtime;

pub use context::Context;
pub use error::TransitionError;
pub use machine::{Dispatch, StateMachine};
