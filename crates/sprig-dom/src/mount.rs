//! The render loop: produce a tree, diff it against the baseline, patch.

use std::fmt;

use sprig_core::runtime::{Runtime, RuntimeHandle};
use sprig_core::vnode::VNode;
use sprig_core::Event;

use crate::build::build;
use crate::patch::patch;
use crate::tree::{DomError, DomTree, NodeId};

#[derive(Debug)]
pub enum MountError {
    /// The given container id does not exist in the tree. Fatal: the engine
    /// cannot operate without a mount target.
    MissingContainer { id: NodeId },
    /// The given container id names a text node.
    NotAContainer { id: NodeId },
    /// A render was forced before any root component was registered.
    NoRootComponent,
    Dom(DomError),
}

impl fmt::Display for MountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MountError::MissingContainer { id } => write!(f, "mount container {id} missing"),
            MountError::NotAContainer { id } => {
                write!(f, "mount container {id} is not an element")
            }
            MountError::NoRootComponent => f.write_str("no root component registered"),
            MountError::Dom(err) => write!(f, "live tree error: {err}"),
        }
    }
}

impl std::error::Error for MountError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MountError::Dom(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DomError> for MountError {
    fn from(err: DomError) -> Self {
        MountError::Dom(err)
    }
}

/// One render loop bound to a container element.
///
/// The mount owns the live tree beneath its container, the hook store (via
/// its [`Runtime`]), and the baseline tree of the previous pass. State
/// setters and external collaborators mark it dirty through
/// [`RuntimeHandle::request_render`]; the host drives it with [`Mount::pump`].
pub struct Mount {
    runtime: Runtime,
    tree: DomTree,
    container: NodeId,
    baseline: Option<VNode>,
    root: Option<Box<dyn FnMut() -> VNode>>,
}

impl Mount {
    /// Binds a mount to an existing container element.
    pub fn new(tree: DomTree, container: NodeId) -> Result<Self, MountError> {
        if !tree.contains(container) {
            return Err(MountError::MissingContainer { id: container });
        }
        if !tree.is_element(container) {
            return Err(MountError::NotAContainer { id: container });
        }
        Ok(Self {
            runtime: Runtime::new(),
            tree,
            container,
            baseline: None,
            root: None,
        })
    }

    /// Creates a mount with its own tree and a fresh container element.
    pub fn detached(container_tag: &str) -> Self {
        let mut tree = DomTree::new();
        let container = tree.create_container(container_tag);
        Self::new(tree, container).expect("freshly created container")
    }

    pub fn runtime_handle(&self) -> RuntimeHandle {
        self.runtime.handle()
    }

    pub fn container(&self) -> NodeId {
        self.container
    }

    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }

    /// The live root produced by the last pass, once mounted.
    pub fn root_id(&self) -> Option<NodeId> {
        self.tree.child_at(self.container, 0)
    }

    /// Registers the root-producing function and marks the mount dirty. The
    /// first pass runs on the next [`Mount::pump`] (or [`Mount::render_now`]).
    pub fn set_root_component(&mut self, root: impl FnMut() -> VNode + 'static) {
        self.root = Some(Box::new(root));
        self.runtime.handle().request_render();
    }

    pub fn should_render(&self) -> bool {
        self.runtime.render_requested()
    }

    /// Runs render passes until no request is pending.
    ///
    /// Requests raised while a pass runs (setter calls from effects, store
    /// notifications) coalesce into exactly one follow-up pass per drained
    /// flag, so this terminates unless the component schedules unconditionally
    /// forever.
    pub fn render_now(&mut self) -> Result<(), MountError> {
        if self.root.is_none() {
            return Err(MountError::NoRootComponent);
        }
        if self.runtime.is_rendering() {
            // Re-entrant call mid-pass: fold into the pending request.
            self.runtime.handle().request_render();
            return Ok(());
        }
        loop {
            self.runtime.take_render_request();
            let producer = self.root.as_mut().expect("root checked above");
            // The whole new tree (hooks and effects included) is produced
            // before any live mutation, so a panicking effect aborts the
            // pass with the baseline and the live tree untouched.
            let new = self.runtime.render_pass(|| producer());
            match &self.baseline {
                None => {
                    self.tree.clear_children(self.container)?;
                    let built = build(&mut self.tree, &new)?;
                    self.tree.append_child(self.container, built)?;
                }
                Some(old) => match self.tree.child_at(self.container, 0) {
                    Some(live) => patch(&mut self.tree, live, Some(&new), Some(old))?,
                    None => {
                        log::error!("mounted subtree vanished from container; rebuilding");
                        let built = build(&mut self.tree, &new)?;
                        self.tree.append_child(self.container, built)?;
                    }
                },
            }
            self.baseline = Some(new);
            if !self.runtime.take_render_request() {
                break;
            }
            log::trace!("coalesced render request; running follow-up pass");
        }
        Ok(())
    }

    /// Drains pending render requests, if any.
    pub fn pump(&mut self) -> Result<(), MountError> {
        while self.runtime.render_requested() {
            if self.root.is_none() {
                self.runtime.take_render_request();
                log::error!("render requested before a root component was registered");
                return Ok(());
            }
            self.render_now()?;
        }
        Ok(())
    }

    /// Delivers `payload` to the listener for `event` on `target`, then
    /// pumps the loop so any state written by the handler is rendered.
    pub fn dispatch(
        &mut self,
        target: NodeId,
        event: &str,
        payload: &Event,
    ) -> Result<bool, MountError> {
        let handled = self.tree.dispatch(target, event, payload)?;
        self.pump()?;
        Ok(handled)
    }

    /// Tears the mount down: runs outstanding effect cleanups, clears the
    /// container, and forgets the baseline and root component.
    pub fn unmount(&mut self) -> Result<(), MountError> {
        self.runtime.unmount();
        self.tree.clear_children(self.container)?;
        self.baseline = None;
        self.root = None;
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/mount_tests.rs"]
mod tests;
