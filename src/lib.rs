//! Stratum: a hierarchical state machine engine
//!
//! States form a forest linked only by parent references. The engine keeps
//! one active state, moves between states with hierarchy-aware exit and
//! entry hooks, and bubbles events a state ignores up to its ancestors.
//! Hooks may request further transitions while a transition is in progress.
//!
//! # Core Concepts
//!
//! - **State tree**: frozen forest of named states, addressed by `StateId`
//! - **Hooks**: entry, event, and exit closures receiving a `Context`
//! - **Transitions**: `Context::transition_to` exits up to the common
//!   ancestor, then enters down to the destination
//! - **Bubbling**: `StateMachine::handle_event` offers an event to the
//!   active state, then each ancestor, until one consumes it
//!
//! # Example
//!
//! ```rust
//! use stratum::{StateMachine, StateTreeBuilder};
//!
//! #[derive(Default)]
//! struct Lamp {
//!     lit: bool,
//! }
//!
//! enum Switch {
//!     Flip,
//! }
//!
//! let mut builder = StateTreeBuilder::<Lamp, Switch>::new();
//! let off = builder.declare("Off");
//! let on = builder.declare("On");
//!
//! builder
//!     .define(off)
//!     .on_event(move |ctx, _| ctx.transition_to(on));
//! builder
//!     .define(on)
//!     .on_entry(|ctx| ctx.env_mut().lit = true)
//!     .on_event(move |ctx, _| ctx.transition_to(off))
//!     .on_exit(|ctx| ctx.env_mut().lit = false);
//!
//! let mut lamp = StateMachine::new(builder.build().unwrap(), Lamp::default());
//! lamp.initial_transition(off).unwrap();
//!
//! lamp.handle_event(&Switch::Flip).unwrap();
//! assert!(lamp.env().lit);
//!
//! lamp.handle_event(&Switch::Flip).unwrap();
//! assert!(!lamp.env().lit);
//! ```

pub mod builder;
pub mod config;
pub mod core;
pub mod engine;

// Re-export commonly used types
pub use builder::{BuildError, StateMachineBuilder, StateTreeBuilder};
pub use config::MachineConfig;
pub use crate::core::{StateId, StateTree};
pub use engine::{Context, Dispatch, StateMachine, TransitionError};
