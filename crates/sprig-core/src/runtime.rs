//! Per-mount scheduling state and the ambient render context.
//!
//! A [`Runtime`] owns the hook store and two flags: whether a pass is in
//! progress and whether another pass has been requested. While a pass runs,
//! the runtime is installed on a thread-local stack so that zero-argument
//! hook calls resolve to the mount being rendered; independent mounts on the
//! same thread nest without interfering.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::hooks::HookStore;

pub(crate) struct RuntimeInner {
    hooks: RefCell<HookStore>,
    render_requested: Cell<bool>,
    rendering: Cell<bool>,
}

impl RuntimeInner {
    pub(crate) fn hooks(&self) -> &RefCell<HookStore> {
        &self.hooks
    }
}

thread_local! {
    static ACTIVE: RefCell<Vec<Rc<RuntimeInner>>> = RefCell::new(Vec::new());
}

/// The runtime of the innermost pass in progress on this thread.
///
/// Panics when no pass is active: hooks have no meaning outside one.
pub(crate) fn current(caller: &str) -> Rc<RuntimeInner> {
    ACTIVE
        .with(|stack| stack.borrow().last().cloned())
        .unwrap_or_else(|| {
            panic!("{caller} called outside a render pass; hooks may only be called from a root component")
        })
}

pub(crate) fn handle_of(inner: &Rc<RuntimeInner>) -> RuntimeHandle {
    RuntimeHandle(Rc::downgrade(inner))
}

/// Owner side of one mount's scheduling state.
pub struct Runtime {
    inner: Rc<RuntimeInner>,
}

impl Runtime {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RuntimeInner {
                hooks: RefCell::new(HookStore::default()),
                render_requested: Cell::new(false),
                rendering: Cell::new(false),
            }),
        }
    }

    pub fn handle(&self) -> RuntimeHandle {
        RuntimeHandle(Rc::downgrade(&self.inner))
    }

    /// Whether a render pass is currently executing.
    pub fn is_rendering(&self) -> bool {
        self.inner.rendering.get()
    }

    pub fn render_requested(&self) -> bool {
        self.inner.render_requested.get()
    }

    /// Consumes the pending render request, if any.
    pub fn take_render_request(&self) -> bool {
        self.inner.render_requested.replace(false)
    }

    /// Runs one render pass: resets the hook cursors, installs this runtime
    /// as the ambient context, invokes the producer, and settles the store.
    ///
    /// Render requests raised while `produce` runs are left pending for the
    /// caller to coalesce. Panics if a pass is already in progress; if
    /// `produce` itself panics, the flag and the context stack unwind
    /// cleanly but the hook store is left unsettled.
    pub fn render_pass<R>(&self, produce: impl FnOnce() -> R) -> R {
        assert!(
            !self.inner.rendering.get(),
            "render pass already in progress"
        );
        self.inner.rendering.set(true);
        self.inner.hooks.borrow_mut().begin_pass();

        let _guard = PassGuard {
            inner: Rc::clone(&self.inner),
        };
        ACTIVE.with(|stack| stack.borrow_mut().push(Rc::clone(&self.inner)));

        let result = produce();
        self.inner.hooks.borrow_mut().end_pass();
        result
    }

    /// Drops all hook state, running outstanding effect cleanups.
    pub fn unmount(&self) {
        self.inner.hooks.borrow_mut().unmount();
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

struct PassGuard {
    inner: Rc<RuntimeInner>,
}

impl Drop for PassGuard {
    fn drop(&mut self) {
        ACTIVE.with(|stack| {
            stack.borrow_mut().pop();
        });
        self.inner.rendering.set(false);
    }
}

/// Weak reference to a runtime, held by setters and external collaborators.
///
/// Requests against a dropped runtime are no-ops, so a stale handle can
/// never schedule work for a mount that no longer exists.
#[derive(Clone)]
pub struct RuntimeHandle(Weak<RuntimeInner>);

impl RuntimeHandle {
    /// Marks the mount dirty. During a pass this coalesces: however many
    /// requests arrive before the pass ends, exactly one follow-up pass is
    /// owed.
    pub fn request_render(&self) {
        if let Some(inner) = self.0.upgrade() {
            inner.render_requested.set(true);
        }
    }

    pub fn is_render_requested(&self) -> bool {
        self.0
            .upgrade()
            .map(|inner| inner.render_requested.get())
            .unwrap_or(false)
    }

    pub fn is_rendering(&self) -> bool {
        self.0
            .upgrade()
            .map(|inner| inner.rendering.get())
            .unwrap_or(false)
    }
}
