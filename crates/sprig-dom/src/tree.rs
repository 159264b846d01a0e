//! Arena-backed live tree.
//!
//! Realized nodes live in a slot vector indexed by [`NodeId`]; removing a
//! subtree frees its slots. Every mutation is recorded in an operation
//! journal ([`DomOp`]) so callers can observe exactly what a patch touched;
//! the journal carries no payload needed for correctness, only for
//! inspection.

use std::fmt;

use hashbrown::HashMap;
use sprig_core::vnode::{EventHandler, StyleMap};
use sprig_core::Event;

pub type NodeId = usize;

/// Live element properties that are set directly rather than as attributes,
/// so later user interaction observes them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Prop {
    Checked,
    Disabled,
    Value,
}

impl fmt::Display for Prop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Prop::Checked => f.write_str("checked"),
            Prop::Disabled => f.write_str("disabled"),
            Prop::Value => f.write_str("value"),
        }
    }
}

/// One applied mutation, in application order.
#[derive(Clone, Debug, PartialEq)]
pub enum DomOp {
    CreateText { id: NodeId },
    CreateElement { id: NodeId, tag: String },
    SetText { id: NodeId, value: String },
    SetClass { id: NodeId, value: String },
    SetStyleProperty { id: NodeId, name: String, value: String },
    RemoveStyleProperty { id: NodeId, name: String },
    SetProperty { id: NodeId, prop: Prop, value: String },
    SetAttribute { id: NodeId, name: String, value: String },
    RemoveAttribute { id: NodeId, name: String },
    AddListener { id: NodeId, event: String },
    RemoveListener { id: NodeId, event: String },
    InsertChild { parent: NodeId, child: NodeId, index: usize },
    RemoveNode { id: NodeId },
    ReplaceNode { old: NodeId, new: NodeId },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomError {
    Missing { id: NodeId },
    NotAnElement { id: NodeId },
    NotText { id: NodeId },
}

impl fmt::Display for DomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomError::Missing { id } => write!(f, "node {id} missing"),
            DomError::NotAnElement { id } => write!(f, "node {id} is not an element"),
            DomError::NotText { id } => write!(f, "node {id} is not a text node"),
        }
    }
}

impl std::error::Error for DomError {}

#[derive(Default)]
pub(crate) struct LiveProps {
    pub(crate) checked: bool,
    pub(crate) disabled: bool,
    pub(crate) value: String,
}

pub(crate) struct LiveElement {
    pub(crate) tag: String,
    pub(crate) class: String,
    pub(crate) attrs: Vec<(String, String)>,
    pub(crate) style: StyleMap,
    pub(crate) props: LiveProps,
    pub(crate) listeners: HashMap<String, EventHandler>,
}

impl LiveElement {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_owned(),
            class: String::new(),
            attrs: Vec::new(),
            style: StyleMap::default(),
            props: LiveProps::default(),
            listeners: HashMap::new(),
        }
    }
}

pub(crate) enum LiveKind {
    Text(String),
    Element(LiveElement),
}

pub(crate) struct LiveNode {
    pub(crate) parent: Option<NodeId>,
    pub(crate) kind: LiveKind,
    pub(crate) children: Vec<NodeId>,
}

/// The realized document tree for one or more mounts.
#[derive(Default)]
pub struct DomTree {
    nodes: Vec<Option<LiveNode>>,
    ops: Vec<DomOp>,
}

impl DomTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a detached element suitable as a mount target. Not journaled:
    /// containers belong to the host, not to a render pass.
    pub fn create_container(&mut self, tag: &str) -> NodeId {
        self.alloc(LiveNode {
            parent: None,
            kind: LiveKind::Element(LiveElement::new(tag)),
            children: Vec::new(),
        })
    }

    fn alloc(&mut self, node: LiveNode) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Some(node));
        id
    }

    fn node(&self, id: NodeId) -> Result<&LiveNode, DomError> {
        self.nodes
            .get(id)
            .and_then(|slot| slot.as_ref())
            .ok_or(DomError::Missing { id })
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut LiveNode, DomError> {
        self.nodes
            .get_mut(id)
            .and_then(|slot| slot.as_mut())
            .ok_or(DomError::Missing { id })
    }

    fn element_mut(&mut self, id: NodeId) -> Result<&mut LiveElement, DomError> {
        match &mut self.node_mut(id)?.kind {
            LiveKind::Element(el) => Ok(el),
            LiveKind::Text(_) => Err(DomError::NotAnElement { id }),
        }
    }

    fn element(&self, id: NodeId) -> Result<&LiveElement, DomError> {
        match &self.node(id)?.kind {
            LiveKind::Element(el) => Ok(el),
            LiveKind::Text(_) => Err(DomError::NotAnElement { id }),
        }
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_ok()
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        self.element(id).is_ok()
    }

    /// Count of live (non-freed) nodes.
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // --- creation ---

    pub fn create_text(&mut self, value: &str) -> NodeId {
        let id = self.alloc(LiveNode {
            parent: None,
            kind: LiveKind::Text(value.to_owned()),
            children: Vec::new(),
        });
        self.ops.push(DomOp::CreateText { id });
        id
    }

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        let id = self.alloc(LiveNode {
            parent: None,
            kind: LiveKind::Element(LiveElement::new(tag)),
            children: Vec::new(),
        });
        self.ops.push(DomOp::CreateElement {
            id,
            tag: tag.to_owned(),
        });
        id
    }

    // --- mutation ---

    pub fn set_text(&mut self, id: NodeId, value: &str) -> Result<(), DomError> {
        match &mut self.node_mut(id)?.kind {
            LiveKind::Text(current) => {
                *current = value.to_owned();
                self.ops.push(DomOp::SetText {
                    id,
                    value: value.to_owned(),
                });
                Ok(())
            }
            LiveKind::Element(_) => Err(DomError::NotText { id }),
        }
    }

    pub fn set_class(&mut self, id: NodeId, value: &str) -> Result<(), DomError> {
        self.element_mut(id)?.class = value.to_owned();
        self.ops.push(DomOp::SetClass {
            id,
            value: value.to_owned(),
        });
        Ok(())
    }

    pub fn set_style_property(
        &mut self,
        id: NodeId,
        name: &str,
        value: &str,
    ) -> Result<(), DomError> {
        self.element_mut(id)?
            .style
            .insert(name.to_owned(), value.to_owned());
        self.ops.push(DomOp::SetStyleProperty {
            id,
            name: name.to_owned(),
            value: value.to_owned(),
        });
        Ok(())
    }

    pub fn remove_style_property(&mut self, id: NodeId, name: &str) -> Result<(), DomError> {
        self.element_mut(id)?.style.shift_remove(name);
        self.ops.push(DomOp::RemoveStyleProperty {
            id,
            name: name.to_owned(),
        });
        Ok(())
    }

    pub fn set_checked(&mut self, id: NodeId, value: bool) -> Result<(), DomError> {
        self.element_mut(id)?.props.checked = value;
        self.ops.push(DomOp::SetProperty {
            id,
            prop: Prop::Checked,
            value: value.to_string(),
        });
        Ok(())
    }

    pub fn set_disabled(&mut self, id: NodeId, value: bool) -> Result<(), DomError> {
        self.element_mut(id)?.props.disabled = value;
        self.ops.push(DomOp::SetProperty {
            id,
            prop: Prop::Disabled,
            value: value.to_string(),
        });
        Ok(())
    }

    pub fn set_value(&mut self, id: NodeId, value: &str) -> Result<(), DomError> {
        self.element_mut(id)?.props.value = value.to_owned();
        self.ops.push(DomOp::SetProperty {
            id,
            prop: Prop::Value,
            value: value.to_owned(),
        });
        Ok(())
    }

    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> Result<(), DomError> {
        let el = self.element_mut(id)?;
        match el.attrs.iter_mut().find(|(n, _)| n == name) {
            Some((_, v)) => *v = value.to_owned(),
            None => el.attrs.push((name.to_owned(), value.to_owned())),
        }
        self.ops.push(DomOp::SetAttribute {
            id,
            name: name.to_owned(),
            value: value.to_owned(),
        });
        Ok(())
    }

    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> Result<(), DomError> {
        self.element_mut(id)?.attrs.retain(|(n, _)| n != name);
        self.ops.push(DomOp::RemoveAttribute {
            id,
            name: name.to_owned(),
        });
        Ok(())
    }

    pub fn add_listener(
        &mut self,
        id: NodeId,
        event: &str,
        handler: EventHandler,
    ) -> Result<(), DomError> {
        self.element_mut(id)?.listeners.insert(event.to_owned(), handler);
        self.ops.push(DomOp::AddListener {
            id,
            event: event.to_owned(),
        });
        Ok(())
    }

    pub fn remove_listener(&mut self, id: NodeId, event: &str) -> Result<(), DomError> {
        self.element_mut(id)?.listeners.remove(event);
        self.ops.push(DomOp::RemoveListener {
            id,
            event: event.to_owned(),
        });
        Ok(())
    }

    // --- structure ---

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        let index = self.node(parent)?.children.len();
        self.insert_child(parent, index, child)
    }

    pub fn insert_child(
        &mut self,
        parent: NodeId,
        index: usize,
        child: NodeId,
    ) -> Result<(), DomError> {
        self.node(child)?;
        let parent_node = self.node_mut(parent)?;
        let index = index.min(parent_node.children.len());
        parent_node.children.insert(index, child);
        self.node_mut(child)?.parent = Some(parent);
        self.ops.push(DomOp::InsertChild {
            parent,
            child,
            index,
        });
        Ok(())
    }

    /// Removes a node and frees its whole subtree. One journal entry covers
    /// the subtree root.
    pub fn remove_subtree(&mut self, id: NodeId) -> Result<(), DomError> {
        let parent = self.node(id)?.parent;
        if let Some(parent) = parent {
            if let Ok(parent_node) = self.node_mut(parent) {
                parent_node.children.retain(|&c| c != id);
            }
        }
        self.free(id);
        self.ops.push(DomOp::RemoveNode { id });
        Ok(())
    }

    fn free(&mut self, id: NodeId) {
        if let Some(Some(node)) = self.nodes.get_mut(id).map(Option::take) {
            for child in node.children {
                self.free(child);
            }
        }
    }

    /// Puts `new` where `old` sits in its parent's child list and frees the
    /// old subtree. `new` must be detached.
    pub fn replace_node(&mut self, old: NodeId, new: NodeId) -> Result<(), DomError> {
        let parent = self.node(old)?.parent.ok_or(DomError::Missing { id: old })?;
        self.node(new)?;
        let parent_node = self.node_mut(parent)?;
        match parent_node.children.iter().position(|&c| c == old) {
            Some(index) => parent_node.children[index] = new,
            None => return Err(DomError::Missing { id: old }),
        }
        self.node_mut(new)?.parent = Some(parent);
        self.free(old);
        self.ops.push(DomOp::ReplaceNode { old, new });
        Ok(())
    }

    /// Removes every child of `parent`, freeing their subtrees.
    pub fn clear_children(&mut self, parent: NodeId) -> Result<(), DomError> {
        let children = self.node(parent)?.children.clone();
        for child in children {
            self.remove_subtree(child)?;
        }
        Ok(())
    }

    // --- events ---

    /// Invokes the listener registered for `event` on `id`, if any.
    pub fn dispatch(&self, id: NodeId, event: &str, payload: &Event) -> Result<bool, DomError> {
        let handler = self.element(id)?.listeners.get(event).cloned();
        match handler {
            Some(handler) => {
                handler.call(payload);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    // --- journal ---

    pub fn ops(&self) -> &[DomOp] {
        &self.ops
    }

    pub fn take_ops(&mut self) -> Vec<DomOp> {
        std::mem::take(&mut self.ops)
    }

    pub fn clear_ops(&mut self) {
        self.ops.clear();
    }

    // --- queries ---

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).ok().and_then(|node| node.parent)
    }

    pub fn children_of(&self, id: NodeId) -> Vec<NodeId> {
        self.node(id)
            .map(|node| node.children.clone())
            .unwrap_or_default()
    }

    pub fn child_at(&self, id: NodeId, index: usize) -> Option<NodeId> {
        self.node(id).ok()?.children.get(index).copied()
    }

    pub fn child_count(&self, id: NodeId) -> usize {
        self.node(id).map(|node| node.children.len()).unwrap_or(0)
    }

    pub fn tag(&self, id: NodeId) -> Option<&str> {
        match &self.node(id).ok()?.kind {
            LiveKind::Element(el) => Some(&el.tag),
            LiveKind::Text(_) => None,
        }
    }

    pub fn text_value(&self, id: NodeId) -> Option<&str> {
        match &self.node(id).ok()?.kind {
            LiveKind::Text(value) => Some(value),
            LiveKind::Element(_) => None,
        }
    }

    pub fn class(&self, id: NodeId) -> Option<&str> {
        self.element(id).ok().map(|el| el.class.as_str())
    }

    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)
            .ok()?
            .attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn style_property(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id).ok()?.style.get(name).map(String::as_str)
    }

    pub fn checked(&self, id: NodeId) -> bool {
        self.element(id).map(|el| el.props.checked).unwrap_or(false)
    }

    pub fn disabled(&self, id: NodeId) -> bool {
        self.element(id).map(|el| el.props.disabled).unwrap_or(false)
    }

    pub fn value(&self, id: NodeId) -> Option<&str> {
        self.element(id).ok().map(|el| el.props.value.as_str())
    }

    pub fn has_listener(&self, id: NodeId, event: &str) -> bool {
        self.element(id)
            .map(|el| el.listeners.contains_key(event))
            .unwrap_or(false)
    }

    /// Concatenated text of `id` and its descendants.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        if let Ok(node) = self.node(id) {
            match &node.kind {
                LiveKind::Text(value) => out.push_str(value),
                LiveKind::Element(_) => {
                    for &child in &node.children {
                        self.collect_text(child, out);
                    }
                }
            }
        }
    }

    /// Indented dump of a subtree, for logs and failing tests.
    pub fn dump(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.dump_node(&mut out, id, 0);
        out
    }

    fn dump_node(&self, out: &mut String, id: NodeId, depth: usize) {
        let indent = "  ".repeat(depth);
        match self.node(id) {
            Err(_) => out.push_str(&format!("{indent}[{id}] (missing)\n")),
            Ok(node) => match &node.kind {
                LiveKind::Text(value) => {
                    out.push_str(&format!("{indent}[{id}] {value:?}\n"));
                }
                LiveKind::Element(el) => {
                    let class = if el.class.is_empty() {
                        String::new()
                    } else {
                        format!(" class={:?}", el.class)
                    };
                    out.push_str(&format!("{indent}[{id}] <{}>{class}\n", el.tag));
                    for &child in &node.children {
                        self.dump_node(out, child, depth + 1);
                    }
                }
            },
        }
    }
}

#[cfg(test)]
#[path = "tests/tree_tests.rs"]
mod tests;
