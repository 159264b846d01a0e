//! Value-typed description of the desired UI tree.
//!
//! A [`VNode`] tree is produced fresh on every render pass and never mutated
//! afterwards; the reconciler compares trees by value. Attribute maps keep
//! insertion order so diffs and tree dumps stay deterministic.

use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::event::Event;

/// Ordered attribute storage for one element.
pub type AttrMap = IndexMap<String, AttrValue, ahash::RandomState>;

/// Ordered style-property storage (`property -> value`).
pub type StyleMap = IndexMap<String, String, ahash::RandomState>;

/// A listener attached to an element attribute such as `onclick`.
///
/// Handlers are compared by identity: two handlers are equal only when they
/// share the same allocation. A component that rebuilds its closures every
/// pass will therefore re-bind them on every patch, which is exactly what
/// keeps stale captures from surviving.
#[derive(Clone)]
pub struct EventHandler(Rc<dyn Fn(&Event)>);

impl EventHandler {
    pub fn new(f: impl Fn(&Event) + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub fn call(&self, event: &Event) {
        (self.0)(event)
    }
}

impl PartialEq for EventHandler {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for EventHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EventHandler")
    }
}

/// One attribute value.
#[derive(Clone, Debug, PartialEq)]
pub enum AttrValue {
    Text(String),
    Number(f64),
    Bool(bool),
    Handler(EventHandler),
    Style(StyleMap),
}

impl AttrValue {
    /// `false` marks an attribute as absent, so conditional attributes can
    /// be written as `attr("checked", done)` without branching.
    pub fn is_absent(&self) -> bool {
        matches!(self, AttrValue::Bool(false))
    }

    /// Rendering of the value as a plain attribute string.
    ///
    /// Handlers have no string form; style maps serialize to CSS text as the
    /// fallback for a `style` value that ended up on a non-`style` key.
    pub fn as_plain(&self) -> Option<String> {
        match self {
            AttrValue::Text(s) => Some(s.clone()),
            AttrValue::Number(n) => Some(format_number(*n)),
            AttrValue::Bool(true) => Some("true".into()),
            AttrValue::Bool(false) => None,
            AttrValue::Handler(_) => None,
            AttrValue::Style(style) => {
                let mut out = String::new();
                for (name, value) in style {
                    if !out.is_empty() {
                        out.push_str("; ");
                    }
                    out.push_str(name);
                    out.push_str(": ");
                    out.push_str(value);
                }
                Some(out)
            }
        }
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Text(value.to_owned())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::Text(value)
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        AttrValue::Bool(value)
    }
}

impl From<f64> for AttrValue {
    fn from(value: f64) -> Self {
        AttrValue::Number(value)
    }
}

impl From<i32> for AttrValue {
    fn from(value: i32) -> Self {
        AttrValue::Number(value as f64)
    }
}

impl From<usize> for AttrValue {
    fn from(value: usize) -> Self {
        AttrValue::Number(value as f64)
    }
}

impl From<EventHandler> for AttrValue {
    fn from(value: EventHandler) -> Self {
        AttrValue::Handler(value)
    }
}

/// A named attribute, ready to be collected into an element.
#[derive(Clone, Debug, PartialEq)]
pub struct Attr {
    pub name: String,
    pub value: AttrValue,
}

/// Builds one attribute: `attr("class", "todoapp")`, `attr("checked", done)`.
pub fn attr(name: impl Into<String>, value: impl Into<AttrValue>) -> Attr {
    Attr {
        name: name.into(),
        value: value.into(),
    }
}

/// Wraps a listener closure as an attribute value: `attr("onclick", on(..))`.
pub fn on(f: impl Fn(&Event) + 'static) -> AttrValue {
    AttrValue::Handler(EventHandler::new(f))
}

/// Builds a style mapping value from `(property, value)` pairs.
pub fn style<N, V>(props: impl IntoIterator<Item = (N, V)>) -> AttrValue
where
    N: Into<String>,
    V: Into<String>,
{
    let mut map = StyleMap::default();
    for (name, value) in props {
        map.insert(name.into(), value.into());
    }
    AttrValue::Style(map)
}

/// One node of the desired tree.
#[derive(Clone, Debug, PartialEq)]
pub enum VNode {
    Text(String),
    Element(VElement),
}

/// An element node: tag, ordered attributes, ordered children.
#[derive(Clone, Debug, PartialEq)]
pub struct VElement {
    pub tag: String,
    pub attrs: AttrMap,
    pub children: Vec<VNode>,
}

impl VNode {
    pub fn is_text(&self) -> bool {
        matches!(self, VNode::Text(_))
    }

    /// Tag name for elements, `None` for text leaves.
    pub fn tag(&self) -> Option<&str> {
        match self {
            VNode::Text(_) => None,
            VNode::Element(el) => Some(&el.tag),
        }
    }
}

/// A child entry accepted by [`element`]; collections flatten and empty
/// entries drop out, so conditional children read as
/// `done.then(|| element(..))`.
#[derive(Clone, Debug)]
pub enum Child {
    Empty,
    Node(VNode),
    Nodes(Vec<VNode>),
}

impl From<VNode> for Child {
    fn from(node: VNode) -> Self {
        Child::Node(node)
    }
}

impl From<Option<VNode>> for Child {
    fn from(node: Option<VNode>) -> Self {
        match node {
            Some(node) => Child::Node(node),
            None => Child::Empty,
        }
    }
}

impl From<Vec<VNode>> for Child {
    fn from(nodes: Vec<VNode>) -> Self {
        Child::Nodes(nodes)
    }
}

impl From<&str> for Child {
    fn from(value: &str) -> Self {
        Child::Node(text(value))
    }
}

impl From<String> for Child {
    fn from(value: String) -> Self {
        Child::Node(VNode::Text(value))
    }
}

/// Builds a text leaf from anything displayable (strings, counts, ...).
pub fn text(value: impl fmt::Display) -> VNode {
    VNode::Text(value.to_string())
}

/// Builds an element node.
///
/// Attributes keep their given order. Children are flattened from nested
/// sequences with empty entries dropped; no validation of `tag` is
/// performed.
pub fn element(
    tag: impl Into<String>,
    attrs: impl IntoIterator<Item = Attr>,
    children: impl IntoIterator<Item = Child>,
) -> VNode {
    let mut attr_map = AttrMap::default();
    for Attr { name, value } in attrs {
        attr_map.insert(name, value);
    }
    let mut flat = Vec::new();
    for child in children {
        match child {
            Child::Empty => {}
            Child::Node(node) => flat.push(node),
            Child::Nodes(nodes) => flat.extend(nodes),
        }
    }
    VNode::Element(VElement {
        tag: tag.into(),
        attrs: attr_map,
        children: flat,
    })
}

/// Collects heterogeneous children into a `Vec<Child>`:
/// `nodes![view, editing.then(|| input)]`.
#[macro_export]
macro_rules! nodes {
    () => {
        ::std::vec::Vec::<$crate::vnode::Child>::new()
    };
    ($($child:expr),+ $(,)?) => {
        ::std::vec![$($crate::vnode::Child::from($child)),+]
    };
}

#[cfg(test)]
#[path = "tests/vnode_tests.rs"]
mod tests;
