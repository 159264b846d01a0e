//! Materializes a [`VNode`] tree into the live arena.

use sprig_core::vnode::{AttrValue, StyleMap, VNode};

use crate::tree::{DomError, DomTree, NodeId, Prop};

/// Where an attribute lands on a live element. Classification is the single
/// source of truth shared by build and patch, applied in priority order:
/// listener, class, style, live property, plain attribute.
#[derive(Debug)]
pub(crate) enum AttrTarget<'a> {
    Listener(String),
    Class,
    Style(&'a StyleMap),
    Property(Prop),
    Plain,
    Skip,
}

impl AttrTarget<'_> {
    /// Discriminant-level comparison, used to notice a key whose value moved
    /// to a different target kind between passes.
    pub(crate) fn same_kind(&self, other: &AttrTarget<'_>) -> bool {
        use AttrTarget::*;
        matches!(
            (self, other),
            (Listener(_), Listener(_))
                | (Class, Class)
                | (Style(_), Style(_))
                | (Property(_), Property(_))
                | (Plain, Plain)
                | (Skip, Skip)
        )
    }
}

pub(crate) fn classify<'a>(name: &str, value: &'a AttrValue) -> AttrTarget<'a> {
    if let AttrValue::Handler(_) = value {
        // An ASCII "on" prefix guarantees byte 2 is a char boundary.
        if name.len() > 2 && name.as_bytes()[..2].eq_ignore_ascii_case(b"on") {
            return AttrTarget::Listener(name[2..].to_ascii_lowercase());
        }
        log::warn!("listener bound to {name:?} without the event-name prefix; ignored");
        return AttrTarget::Skip;
    }
    match name {
        "class" | "className" => AttrTarget::Class,
        "style" => match value {
            AttrValue::Style(map) => AttrTarget::Style(map),
            // A non-mapping style value falls back to a plain attribute.
            _ => AttrTarget::Plain,
        },
        "checked" => AttrTarget::Property(Prop::Checked),
        "disabled" => AttrTarget::Property(Prop::Disabled),
        "value" => AttrTarget::Property(Prop::Value),
        _ if value.is_absent() => AttrTarget::Skip,
        _ => AttrTarget::Plain,
    }
}

/// Applies one attribute to a live element.
pub(crate) fn apply_attr(
    tree: &mut DomTree,
    id: NodeId,
    name: &str,
    value: &AttrValue,
) -> Result<(), DomError> {
    match classify(name, value) {
        AttrTarget::Listener(event) => {
            let AttrValue::Handler(handler) = value else {
                unreachable!("classified as listener");
            };
            tree.add_listener(id, &event, handler.clone())
        }
        AttrTarget::Class => {
            tree.set_class(id, &value.as_plain().unwrap_or_default())
        }
        AttrTarget::Style(style) => apply_style(tree, id, None, style),
        AttrTarget::Property(prop) => apply_property(tree, id, prop, value),
        AttrTarget::Plain => match value.as_plain() {
            Some(plain) => tree.set_attribute(id, name, &plain),
            None => Ok(()),
        },
        AttrTarget::Skip => Ok(()),
    }
}

/// Undoes one attribute, given the value that was applied for it.
pub(crate) fn remove_attr(
    tree: &mut DomTree,
    id: NodeId,
    name: &str,
    old_value: &AttrValue,
) -> Result<(), DomError> {
    match classify(name, old_value) {
        AttrTarget::Listener(event) => tree.remove_listener(id, &event),
        AttrTarget::Class => tree.set_class(id, ""),
        AttrTarget::Style(style) => {
            for name in style.keys() {
                tree.remove_style_property(id, name)?;
            }
            Ok(())
        }
        AttrTarget::Property(Prop::Checked) => tree.set_checked(id, false),
        AttrTarget::Property(Prop::Disabled) => tree.set_disabled(id, false),
        AttrTarget::Property(Prop::Value) => tree.set_value(id, ""),
        AttrTarget::Plain => tree.remove_attribute(id, name),
        AttrTarget::Skip => Ok(()),
    }
}

/// Merges style properties, removing ones the old mapping had that the new
/// one lacks and writing only the ones that differ.
pub(crate) fn apply_style(
    tree: &mut DomTree,
    id: NodeId,
    old: Option<&StyleMap>,
    new: &StyleMap,
) -> Result<(), DomError> {
    if let Some(old) = old {
        for name in old.keys() {
            if !new.contains_key(name) {
                tree.remove_style_property(id, name)?;
            }
        }
    }
    for (name, value) in new {
        if old.and_then(|old| old.get(name)) != Some(value) {
            tree.set_style_property(id, name, value)?;
        }
    }
    Ok(())
}

fn apply_property(
    tree: &mut DomTree,
    id: NodeId,
    prop: Prop,
    value: &AttrValue,
) -> Result<(), DomError> {
    match prop {
        Prop::Checked => tree.set_checked(id, truthy(value)),
        Prop::Disabled => tree.set_disabled(id, truthy(value)),
        Prop::Value => tree.set_value(id, &value.as_plain().unwrap_or_default()),
    }
}

fn truthy(value: &AttrValue) -> bool {
    match value {
        AttrValue::Bool(b) => *b,
        AttrValue::Text(s) => !s.is_empty(),
        AttrValue::Number(n) => *n != 0.0,
        AttrValue::Handler(_) | AttrValue::Style(_) => false,
    }
}

/// Recursively realizes `vnode`, returning the root of the new live
/// subtree. The new subtree is detached; the caller attaches it.
pub fn build(tree: &mut DomTree, vnode: &VNode) -> Result<NodeId, DomError> {
    match vnode {
        VNode::Text(value) => Ok(tree.create_text(value)),
        VNode::Element(el) => {
            let id = tree.create_element(&el.tag);
            for (name, value) in &el.attrs {
                apply_attr(tree, id, name, value)?;
            }
            for child in &el.children {
                let built = build(tree, child)?;
                tree.append_child(id, built)?;
            }
            Ok(id)
        }
    }
}

#[cfg(test)]
#[path = "tests/build_tests.rs"]
mod tests;
