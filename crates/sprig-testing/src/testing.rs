//! Headless harness for exercising mounts in tests.

use sprig_core::vnode::VNode;
use sprig_core::{Event, KeyCode, RuntimeHandle};
use sprig_dom::{DomOp, DomTree, Mount, MountError, NodeId};

/// Drives a [`Mount`] without a host loop.
///
/// `RenderTest` owns an in-memory tree with a fresh container, installs
/// content into it, and exposes helpers for pumping the render loop,
/// querying the live tree, and synthesizing events, mirroring what a
/// browser host would do around the engine.
pub struct RenderTest {
    mount: Mount,
}

impl RenderTest {
    /// A rule with an empty `<app>` container.
    pub fn new() -> Self {
        Self {
            mount: Mount::detached("app"),
        }
    }

    /// Installs `content` as the root component and performs the initial
    /// render.
    pub fn set_content(
        &mut self,
        content: impl FnMut() -> VNode + 'static,
    ) -> Result<(), MountError> {
        self.mount.set_root_component(content);
        self.mount.pump()
    }

    /// Drains pending render requests until the mount is idle.
    pub fn pump_until_idle(&mut self) -> Result<(), MountError> {
        self.mount.pump()
    }

    pub fn should_render(&self) -> bool {
        self.mount.should_render()
    }

    /// Handle for constructing collaborators that schedule renders.
    pub fn runtime_handle(&self) -> RuntimeHandle {
        self.mount.runtime_handle()
    }

    /// The live root produced by the current content, if mounted.
    pub fn root_id(&self) -> Option<NodeId> {
        self.mount.root_id()
    }

    pub fn tree(&self) -> &DomTree {
        self.mount.tree()
    }

    pub fn tree_mut(&mut self) -> &mut DomTree {
        self.mount.tree_mut()
    }

    /// Raw mount for advanced scenarios.
    pub fn mount(&mut self) -> &mut Mount {
        &mut self.mount
    }

    /// Mutations applied since the last call, oldest first.
    pub fn take_ops(&mut self) -> Vec<DomOp> {
        self.mount.tree_mut().take_ops()
    }

    pub fn unmount(&mut self) -> Result<(), MountError> {
        self.mount.unmount()
    }

    // --- queries ---

    /// Depth-first search below the container for an element whose class
    /// list contains `class`.
    pub fn find_by_class(&self, class: &str) -> Option<NodeId> {
        self.find(|tree, id| {
            tree.class(id)
                .map(|c| c.split_whitespace().any(|part| part == class))
                .unwrap_or(false)
        })
    }

    /// Depth-first search below the container for the first `tag` element.
    pub fn find_by_tag(&self, tag: &str) -> Option<NodeId> {
        self.find(|tree, id| tree.tag(id) == Some(tag))
    }

    /// All elements matching `tag`, in document order.
    pub fn find_all_by_tag(&self, tag: &str) -> Vec<NodeId> {
        let mut found = Vec::new();
        self.walk(self.mount.container(), &mut |tree, id| {
            if tree.tag(id) == Some(tag) {
                found.push(id);
            }
        });
        found
    }

    pub fn text_of(&self, id: NodeId) -> String {
        self.tree().text_content(id)
    }

    fn find(&self, matches: impl Fn(&DomTree, NodeId) -> bool) -> Option<NodeId> {
        let mut found = None;
        self.walk(self.mount.container(), &mut |tree, id| {
            if found.is_none() && matches(tree, id) {
                found = Some(id);
            }
        });
        found
    }

    fn walk(&self, id: NodeId, visit: &mut impl FnMut(&DomTree, NodeId)) {
        let tree = self.tree();
        visit(tree, id);
        for child in tree.children_of(id) {
            self.walk(child, visit);
        }
    }

    // --- event synthesis ---

    pub fn dispatch(
        &mut self,
        target: NodeId,
        event: &str,
        payload: &Event,
    ) -> Result<bool, MountError> {
        self.mount.dispatch(target, event, payload)
    }

    pub fn click(&mut self, target: NodeId) -> Result<bool, MountError> {
        self.dispatch(target, "click", &Event::simple())
    }

    pub fn dblclick(&mut self, target: NodeId) -> Result<bool, MountError> {
        self.dispatch(target, "dblclick", &Event::simple())
    }

    pub fn change(&mut self, target: NodeId) -> Result<bool, MountError> {
        self.dispatch(target, "change", &Event::simple())
    }

    pub fn blur(&mut self, target: NodeId, value: &str) -> Result<bool, MountError> {
        self.dispatch(target, "blur", &Event::input(value))
    }

    pub fn keydown(
        &mut self,
        target: NodeId,
        key: KeyCode,
        value: &str,
    ) -> Result<bool, MountError> {
        self.dispatch(target, "keydown", &Event::keydown(key, value))
    }
}

impl Default for RenderTest {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for tests that only need temporary access to a
/// [`RenderTest`].
pub fn run_render_test<R>(f: impl FnOnce(&mut RenderTest) -> R) -> R {
    let mut rule = RenderTest::new();
    f(&mut rule)
}

#[cfg(test)]
mod tests {
    use sprig_core::nodes;
    use sprig_core::vnode::{attr, element, text};

    use super::*;

    #[test]
    fn rule_mounts_content_and_answers_queries() {
        run_render_test(|rule| {
            rule.set_content(|| {
                element(
                    "section",
                    [attr("class", "todoapp")],
                    nodes![
                        element("h1", [], nodes![text("todos")]),
                        element("ul", [attr("class", "todo-list")], nodes![]),
                    ],
                )
            })
            .unwrap();

            assert!(rule.root_id().is_some());
            assert!(rule.find_by_class("todoapp").is_some());
            assert!(rule.find_by_class("missing").is_none());
            let h1 = rule.find_by_tag("h1").unwrap();
            assert_eq!(rule.text_of(h1), "todos");
            assert_eq!(rule.find_all_by_tag("ul").len(), 1);
        });
    }

    #[test]
    fn take_ops_drains_the_journal() {
        run_render_test(|rule| {
            rule.set_content(|| element("p", [], nodes![text("x")]))
                .unwrap();
            assert!(!rule.take_ops().is_empty());
            assert!(rule.take_ops().is_empty());
        });
    }

    #[test]
    fn class_matching_splits_the_class_list() {
        run_render_test(|rule| {
            rule.set_content(|| element("li", [attr("class", "completed editing")], nodes![]))
                .unwrap();
            assert!(rule.find_by_class("completed").is_some());
            assert!(rule.find_by_class("editing").is_some());
            assert!(rule.find_by_class("complete").is_none());
        });
    }
}
