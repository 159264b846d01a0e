use std::cell::Cell;
use std::rc::Rc;

use sprig_core::vnode::EventHandler;
use sprig_core::Event;

use super::*;

#[test]
fn create_and_query_nodes() {
    let mut tree = DomTree::new();
    let ul = tree.create_element("ul");
    let li = tree.create_element("li");
    let label = tree.create_text("buy milk");
    tree.append_child(ul, li).unwrap();
    tree.append_child(li, label).unwrap();

    assert_eq!(tree.tag(ul), Some("ul"));
    assert_eq!(tree.tag(label), None);
    assert_eq!(tree.text_value(label), Some("buy milk"));
    assert_eq!(tree.parent(li), Some(ul));
    assert_eq!(tree.child_at(ul, 0), Some(li));
    assert_eq!(tree.text_content(ul), "buy milk");
    assert_eq!(tree.len(), 3);
}

#[test]
fn mutations_are_journaled_in_order() {
    let mut tree = DomTree::new();
    let li = tree.create_element("li");
    tree.clear_ops();

    tree.set_class(li, "completed").unwrap();
    tree.set_attribute(li, "data-id", "7").unwrap();
    tree.remove_attribute(li, "data-id").unwrap();

    assert_eq!(
        tree.ops(),
        &[
            DomOp::SetClass {
                id: li,
                value: "completed".into()
            },
            DomOp::SetAttribute {
                id: li,
                name: "data-id".into(),
                value: "7".into()
            },
            DomOp::RemoveAttribute {
                id: li,
                name: "data-id".into()
            },
        ]
    );
    assert!(!tree.take_ops().is_empty());
    assert!(tree.ops().is_empty());
}

#[test]
fn remove_subtree_frees_descendants() {
    let mut tree = DomTree::new();
    let ul = tree.create_element("ul");
    let li = tree.create_element("li");
    let label = tree.create_text("x");
    tree.append_child(ul, li).unwrap();
    tree.append_child(li, label).unwrap();
    tree.clear_ops();

    tree.remove_subtree(li).unwrap();

    assert!(!tree.contains(li));
    assert!(!tree.contains(label));
    assert!(tree.contains(ul));
    assert_eq!(tree.child_count(ul), 0);
    assert_eq!(tree.ops(), &[DomOp::RemoveNode { id: li }]);
}

#[test]
fn replace_node_takes_over_the_position() {
    let mut tree = DomTree::new();
    let parent = tree.create_element("div");
    let first = tree.create_element("span");
    let second = tree.create_element("span");
    tree.append_child(parent, first).unwrap();
    tree.append_child(parent, second).unwrap();

    let replacement = tree.create_element("button");
    tree.replace_node(first, replacement).unwrap();

    assert_eq!(tree.child_at(parent, 0), Some(replacement));
    assert_eq!(tree.child_at(parent, 1), Some(second));
    assert!(!tree.contains(first));
    assert_eq!(tree.parent(replacement), Some(parent));
}

#[test]
fn replace_of_detached_node_is_an_error() {
    let mut tree = DomTree::new();
    let orphan = tree.create_element("div");
    let replacement = tree.create_element("div");
    assert_eq!(
        tree.replace_node(orphan, replacement),
        Err(DomError::Missing { id: orphan })
    );
}

#[test]
fn dispatch_invokes_the_registered_listener() {
    let mut tree = DomTree::new();
    let button = tree.create_element("button");
    let clicks = Rc::new(Cell::new(0));
    let handler = {
        let clicks = Rc::clone(&clicks);
        EventHandler::new(move |_| clicks.set(clicks.get() + 1))
    };
    tree.add_listener(button, "click", handler).unwrap();

    assert!(tree.dispatch(button, "click", &Event::simple()).unwrap());
    assert!(!tree.dispatch(button, "dblclick", &Event::simple()).unwrap());
    assert_eq!(clicks.get(), 1);
}

#[test]
fn lookups_on_freed_ids_fail() {
    let mut tree = DomTree::new();
    let node = tree.create_element("p");
    tree.remove_subtree(node).unwrap();
    assert_eq!(
        tree.set_class(node, "x"),
        Err(DomError::Missing { id: node })
    );
    assert_eq!(tree.set_text(node, "x"), Err(DomError::Missing { id: node }));
}

#[test]
fn set_text_on_an_element_is_a_type_error() {
    let mut tree = DomTree::new();
    let div = tree.create_element("div");
    assert_eq!(tree.set_text(div, "x"), Err(DomError::NotText { id: div }));
}

#[test]
fn dump_shows_structure() {
    let mut tree = DomTree::new();
    let ul = tree.create_element("ul");
    let li = tree.create_element("li");
    tree.set_class(li, "completed").unwrap();
    let label = tree.create_text("done");
    tree.append_child(ul, li).unwrap();
    tree.append_child(li, label).unwrap();

    let dump = tree.dump(ul);
    assert!(dump.contains("<ul>"));
    assert!(dump.contains("class=\"completed\""));
    assert!(dump.contains("\"done\""));
}
