//! Positional reconciliation of a new tree against the previous one.
//!
//! Children are matched purely by index: an insertion or deletion in the
//! middle of a list re-diffs every following sibling against its shifted
//! counterpart. That trade keeps the algorithm linear and simple; callers
//! that need stable identity re-key their lists so positions align.

use sprig_core::vnode::{AttrMap, VNode};

use crate::build::{apply_attr, apply_style, build, classify, remove_attr, AttrTarget};
use crate::tree::{DomError, DomTree, NodeId};

/// Applies the difference between `old` and `new` to the live node `live`.
///
/// An absent `old` replaces `live` with a freshly built subtree; an absent
/// `new` removes `live`. Both absent is a no-op.
pub fn patch(
    tree: &mut DomTree,
    live: NodeId,
    new: Option<&VNode>,
    old: Option<&VNode>,
) -> Result<(), DomError> {
    match (new, old) {
        (None, None) => Ok(()),
        (Some(new), None) => {
            let built = build(tree, new)?;
            tree.replace_node(live, built)
        }
        (None, Some(_)) => tree.remove_subtree(live),
        (Some(new), Some(old)) => patch_existing(tree, live, new, old),
    }
}

fn patch_existing(
    tree: &mut DomTree,
    live: NodeId,
    new: &VNode,
    old: &VNode,
) -> Result<(), DomError> {
    match (new, old) {
        // Text-to-text never replaces the node, only its content.
        (VNode::Text(new_text), VNode::Text(old_text)) => {
            if new_text != old_text {
                tree.set_text(live, new_text)?;
            }
            Ok(())
        }
        (VNode::Element(new_el), VNode::Element(old_el)) if new_el.tag == old_el.tag => {
            patch_attributes(tree, live, &new_el.attrs, &old_el.attrs)?;
            patch_children(tree, live, &new_el.children, &old_el.children)
        }
        // Structurally incompatible (tag change, or text on one side only):
        // no reuse across the boundary, rebuild the whole subtree.
        _ => {
            log::debug!(
                "replacing live node {live}: {:?} -> {:?}",
                old.tag().unwrap_or("#text"),
                new.tag().unwrap_or("#text"),
            );
            let built = build(tree, new)?;
            tree.replace_node(live, built)
        }
    }
}

/// Reconciles the symmetric difference of the two attribute maps. Listeners
/// are removed and re-added rather than patched in place, so no stale
/// closure can stay bound.
fn patch_attributes(
    tree: &mut DomTree,
    id: NodeId,
    new: &AttrMap,
    old: &AttrMap,
) -> Result<(), DomError> {
    for (name, old_value) in old {
        if !new.contains_key(name) {
            remove_attr(tree, id, name, old_value)?;
        }
    }
    for (name, new_value) in new {
        match old.get(name) {
            Some(old_value) if old_value == new_value => {}
            Some(old_value) => {
                let old_target = classify(name, old_value);
                let new_target = classify(name, new_value);
                match (&old_target, &new_target) {
                    // Style-to-style merges property-wise.
                    (AttrTarget::Style(old_style), AttrTarget::Style(new_style)) => {
                        apply_style(tree, id, Some(*old_style), *new_style)?;
                    }
                    _ => {
                        // A listener swap, or a key whose value moved to a
                        // different target kind, is undone before re-apply.
                        if matches!(&old_target, AttrTarget::Listener(_))
                            || !old_target.same_kind(&new_target)
                        {
                            remove_attr(tree, id, name, old_value)?;
                        }
                        apply_attr(tree, id, name, new_value)?;
                    }
                }
            }
            None => apply_attr(tree, id, name, new_value)?,
        }
    }
    Ok(())
}

/// Positional child walk over `0..max(new.len, old.len)` with placeholder
/// creation for positions the live tree does not have yet.
fn patch_children(
    tree: &mut DomTree,
    parent: NodeId,
    new_children: &[VNode],
    old_children: &[VNode],
) -> Result<(), DomError> {
    // Snapshot before mutating: removals must not shift later positions.
    let existing = tree.children_of(parent);
    let max = new_children.len().max(old_children.len());
    for i in 0..max {
        let live = match existing.get(i) {
            Some(&id) => id,
            None if new_children.get(i).is_none() => continue,
            None => {
                let placeholder = tree.create_text("");
                tree.append_child(parent, placeholder)?;
                placeholder
            }
        };
        patch(tree, live, new_children.get(i), old_children.get(i))?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/patch_tests.rs"]
mod tests;
