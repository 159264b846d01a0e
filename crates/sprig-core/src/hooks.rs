//! Call-order-indexed local state and effects.
//!
//! The store keeps one slot vector for state cells and one for effect
//! records. A cursor walks each vector from zero on every render pass, so a
//! hook call site is identified purely by its position in the pass. Keeping
//! the number and order of hook calls identical across passes is the
//! caller's contract; a slot that changes type between passes trips a debug
//! assertion and is replaced best-effort in release builds.

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use crate::runtime::{self, RuntimeHandle};

/// A deferred teardown recorded by an effect.
pub type Cleanup = Box<dyn FnOnce()>;

/// Conversion for effect return values: `()` records nothing, a closure is
/// recorded as the cleanup to run before the effect fires again (and on
/// unmount).
pub trait IntoCleanup {
    fn into_cleanup(self) -> Option<Cleanup>;
}

impl IntoCleanup for () {
    fn into_cleanup(self) -> Option<Cleanup> {
        None
    }
}

impl<F: FnOnce() + 'static> IntoCleanup for F {
    fn into_cleanup(self) -> Option<Cleanup> {
        Some(Box::new(self))
    }
}

struct StateCell<T> {
    value: RefCell<T>,
}

/// Writable half of a [`use_state`] pair.
///
/// Both operations write the always-current cell and request a render pass;
/// the new value becomes observable at the start of the following pass.
/// A handle that outlives its mount degrades to a silent no-op on the
/// scheduling side (the write still lands in the orphaned cell).
pub struct SetState<T> {
    cell: Rc<StateCell<T>>,
    runtime: RuntimeHandle,
}

impl<T> Clone for SetState<T> {
    fn clone(&self) -> Self {
        Self {
            cell: Rc::clone(&self.cell),
            runtime: self.runtime.clone(),
        }
    }
}

impl<T: 'static> SetState<T> {
    /// Replaces the stored value.
    pub fn set(&self, next: T) {
        *self.cell.value.borrow_mut() = next;
        self.runtime.request_render();
    }

    /// Applies an updater to the stored value. Successive calls before the
    /// next pass each see the previous call's result.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        f(&mut self.cell.value.borrow_mut());
        self.runtime.request_render();
    }
}

#[derive(Default)]
struct EffectSlot {
    /// Recorded dependency value; `None` marks an always-run slot.
    deps: Option<Box<dyn Any>>,
    cleanup: Option<Cleanup>,
}

impl Drop for EffectSlot {
    fn drop(&mut self) {
        if let Some(cleanup) = self.cleanup.take() {
            cleanup();
        }
    }
}

pub(crate) struct EffectDecision {
    pub(crate) index: usize,
    pub(crate) changed: bool,
    /// Previous cleanup, taken out only when the effect will re-run.
    pub(crate) prev_cleanup: Option<Cleanup>,
}

#[derive(Default)]
pub(crate) struct HookStore {
    states: Vec<Rc<dyn Any>>,
    effects: Vec<EffectSlot>,
    state_cursor: usize,
    effect_cursor: usize,
}

impl HookStore {
    pub(crate) fn begin_pass(&mut self) {
        self.state_cursor = 0;
        self.effect_cursor = 0;
    }

    /// Settles the store after a pass. Slots past the cursor belong to hook
    /// calls that vanished this pass; their state is dropped and their
    /// cleanups run.
    pub(crate) fn end_pass(&mut self) {
        debug_assert_eq!(
            self.state_cursor,
            self.states.len(),
            "use_state call count changed between render passes"
        );
        debug_assert_eq!(
            self.effect_cursor,
            self.effects.len(),
            "use_effect call count changed between render passes"
        );
        self.states.truncate(self.state_cursor);
        self.effects.truncate(self.effect_cursor);
    }

    pub(crate) fn next_state<T: Clone + 'static>(
        &mut self,
        runtime: RuntimeHandle,
        initial: T,
    ) -> (T, SetState<T>) {
        let index = self.state_cursor;
        self.state_cursor += 1;

        if index < self.states.len() {
            if let Ok(cell) = Rc::clone(&self.states[index]).downcast::<StateCell<T>>() {
                let value = cell.value.borrow().clone();
                return (value, SetState { cell, runtime });
            }
            debug_assert!(
                false,
                "use_state call order changed between render passes (slot {index} held a different type)"
            );
            log::error!("use_state slot {index} changed type between passes; resetting it");
            self.states.truncate(index);
        }

        let cell = Rc::new(StateCell {
            value: RefCell::new(initial),
        });
        let value = cell.value.borrow().clone();
        self.states.push(Rc::clone(&cell) as Rc<dyn Any>);
        (value, SetState { cell, runtime })
    }

    pub(crate) fn begin_effect<D: PartialEq + 'static>(
        &mut self,
        deps: Option<D>,
    ) -> EffectDecision {
        let index = self.effect_cursor;
        self.effect_cursor += 1;

        let changed = match (self.effects.get(index), &deps) {
            // First pass over this slot.
            (None, _) => true,
            // Absent deps fire every pass.
            (Some(_), None) => true,
            (Some(slot), Some(next)) => match &slot.deps {
                None => true,
                Some(prev) => prev.downcast_ref::<D>().map_or_else(
                    || {
                        debug_assert!(
                            false,
                            "use_effect call order changed between render passes (slot {index} held different deps)"
                        );
                        true
                    },
                    |prev| prev != next,
                ),
            },
        };

        if index == self.effects.len() {
            self.effects.push(EffectSlot::default());
        }
        let slot = &mut self.effects[index];
        slot.deps = deps.map(|d| Box::new(d) as Box<dyn Any>);
        let prev_cleanup = if changed { slot.cleanup.take() } else { None };

        EffectDecision {
            index,
            changed,
            prev_cleanup,
        }
    }

    pub(crate) fn finish_effect(&mut self, index: usize, cleanup: Option<Cleanup>) {
        if let Some(slot) = self.effects.get_mut(index) {
            slot.cleanup = cleanup;
        }
    }

    /// Drops every slot, running outstanding effect cleanups in slot order.
    pub(crate) fn unmount(&mut self) {
        self.states.clear();
        for mut slot in self.effects.drain(..) {
            if let Some(cleanup) = slot.cleanup.take() {
                cleanup();
            }
        }
        self.state_cursor = 0;
        self.effect_cursor = 0;
    }
}

/// Returns the value stored at this call site and a setter for it.
///
/// On the first pass over a slot the initial value is stored; later passes
/// return whatever the most recent [`SetState`] write left there. Must be
/// called during a render pass, in the same order every pass.
pub fn use_state<T: Clone + 'static>(initial: T) -> (T, SetState<T>) {
    let inner = runtime::current("use_state");
    let handle = runtime::handle_of(&inner);
    let result = inner.hooks().borrow_mut().next_state(handle, initial);
    result
}

/// Runs `callback` when `deps` differs from the value recorded by the
/// previous pass (an absent record counts as differing).
///
/// The callback runs synchronously, during tree construction. A cleanup
/// recorded by the previous run fires first; the new run's return value is
/// recorded as the next cleanup (see [`IntoCleanup`]).
pub fn use_effect<D, C>(deps: D, callback: impl FnOnce() -> C)
where
    D: PartialEq + 'static,
    C: IntoCleanup,
{
    run_effect(Some(deps), callback)
}

/// [`use_effect`] without a dependency value: fires on every pass.
pub fn use_effect_always<C: IntoCleanup>(callback: impl FnOnce() -> C) {
    run_effect(None::<()>, callback)
}

fn run_effect<D, C>(deps: Option<D>, callback: impl FnOnce() -> C)
where
    D: PartialEq + 'static,
    C: IntoCleanup,
{
    let inner = runtime::current("use_effect");
    let decision = inner.hooks().borrow_mut().begin_effect(deps);
    if let Some(prev) = decision.prev_cleanup {
        prev();
    }
    if decision.changed {
        let cleanup = callback().into_cleanup();
        inner.hooks().borrow_mut().finish_effect(decision.index, cleanup);
    }
}

#[cfg(test)]
#[path = "tests/hooks_tests.rs"]
mod tests;
