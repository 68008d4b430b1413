//! Mutable engine bookkeeping and the scoped entry/exit markers.

use crate::core::StateId;
use std::ops::{Deref, DerefMut};

/// Problem noticed deep inside a reentrant chain, reported once the
/// outermost call returns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Fault {
    RecursionLimit,
    UnknownState(StateId),
}

/// Everything the engine mutates while the tree stays frozen.
#[derive(Debug)]
pub(crate) struct Runtime {
    pub(crate) current: Option<StateId>,
    pub(crate) transition_requested: bool,
    pub(crate) event_handled: bool,
    /// State whose entry hook is running right now.
    pub(crate) called_entry: Option<StateId>,
    /// State whose exit hook is running right now.
    pub(crate) called_exit: Option<StateId>,
    pub(crate) recursion_counter: u32,
    pub(crate) max_recursion_depth: u32,
    pub(crate) fault: Option<Fault>,
}

impl Runtime {
    pub(crate) fn new(max_recursion_depth: u32) -> Self {
        Self {
            current: None,
            transition_requested: false,
            event_handled: false,
            called_entry: None,
            called_exit: None,
            recursion_counter: 0,
            max_recursion_depth,
            fault: None,
        }
    }

    /// Keep the first fault of a dispatch; later ones are consequences.
    pub(crate) fn record(&mut self, fault: Fault) {
        self.fault.get_or_insert(fault);
    }
}

#[derive(Clone, Copy, Debug)]
enum Marker {
    Entry,
    Exit,
}

/// Holds the runtime while an entry or exit hook runs and clears the
/// matching marker when dropped, unwinding included.
pub(crate) struct MarkerGuard<'r> {
    runtime: &'r mut Runtime,
    marker: Marker,
}

impl<'r> MarkerGuard<'r> {
    pub(crate) fn entry(runtime: &'r mut Runtime, state: StateId) -> Self {
        runtime.called_entry = Some(state);
        Self {
            runtime,
            marker: Marker::Entry,
        }
    }

    pub(crate) fn exit(runtime: &'r mut Runtime, state: StateId) -> Self {
        runtime.called_exit = Some(state);
        Self {
            runtime,
            marker: Marker::Exit,
        }
    }
}

impl Deref for MarkerGuard<'_> {
    type Target = Runtime;

    fn deref(&self) -> &Runtime {
        &*self.runtime
    }
}

impl DerefMut for MarkerGuard<'_> {
    fn deref_mut(&mut self) -> &mut Runtime {
        &mut *self.runtime
    }
}

impl Drop for MarkerGuard<'_> {
    fn drop(&mut self) {
        match self.marker {
            Marker::Entry => self.runtime.called_entry = None,
            Marker::Exit => self.runtime.called_exit = None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic::{catch_unwind, AssertUnwindSafe};

    #[test]
    fn entry_marker_is_cleared_on_drop() {
        let mut runtime = Runtime::new(10);
        {
            let guard = MarkerGuard::entry(&mut runtime, StateId(2));
            assert_eq!(guard.called_entry, Some(StateId(2)));
            assert_eq!(guard.called_exit, None);
        }
        assert_eq!(runtime.called_entry, None);
    }

    #[test]
    fn exit_marker_is_cleared_on_drop() {
        let mut runtime = Runtime::new(10);
        {
            let mut guard = MarkerGuard::exit(&mut runtime, StateId(4));
            guard.current = Some(StateId(4));
            assert_eq!(guard.called_exit, Some(StateId(4)));
        }
        assert_eq!(runtime.called_exit, None);
        assert_eq!(runtime.current, Some(StateId(4)));
    }

    #[test]
    fn marker_is_cleared_when_hook_panics() {
        let mut runtime = Runtime::new(10);
        let result = catch_unwind(AssertUnwindSafe(|| {
            let _guard = MarkerGuard::entry(&mut runtime, StateId(1));
            panic!("hook failed");
        }));
        assert!(result.is_err());
        assert_eq!(runtime.called_entry, None);
    }

    #[test]
    fn first_fault_wins() {
        let mut runtime = Runtime::new(10);
        runtime.record(Fault::UnknownState(StateId(9)));
        runtime.record(Fault::RecursionLimit);
        assert_eq!(runtime.fault, Some(Fault::UnknownState(StateId(9))));
    }
}
