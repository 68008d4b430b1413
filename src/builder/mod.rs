//! Builder API for constructing state trees and machines.
//!
//! Construction is where malformed input is caught: duplicate names,
//! dangling or cyclic parent links, and unusable limits all fail here, so
//! the engine never has to check them at runtime.

pub mod error;
pub mod machine;
pub mod tree;

pub use error::BuildError;
pub use machine::StateMachineBuilder;
pub use tree::{StateDefiner, StateTreeBuilder};
