//! End-to-end flows driven through the live tree, the way a browser host
//! would: synthesized events on rendered elements, assertions on what the
//! next pass produced.

use std::rc::Rc;

use sprig_core::KeyCode;
use sprig_dom::NodeId;
use sprig_testing::RenderTest;
use todomvc::model::{Filter, Todo};
use todomvc::router::Router;
use todomvc::store::{MemoryStorage, Storage, Store};
use todomvc::view::todo_app;

struct App {
    rule: RenderTest,
    store: Rc<Store>,
    router: Rc<Router>,
    storage: Rc<MemoryStorage>,
}

fn app() -> App {
    app_with_storage(Rc::new(MemoryStorage::new()))
}

fn app_with_storage(storage: Rc<MemoryStorage>) -> App {
    let store = Rc::new(Store::new(
        Rc::clone(&storage) as Rc<dyn Storage>,
        Filter::All,
    ));
    let router = Router::new(Rc::clone(&store), "");
    let mut rule = RenderTest::new();
    store.subscribe({
        let handle = rule.runtime_handle();
        move || handle.request_render()
    });
    rule.set_content({
        let store = Rc::clone(&store);
        let router = Rc::clone(&router);
        move || todo_app(&store, &router)
    })
    .unwrap();
    App {
        rule,
        store,
        router,
        storage,
    }
}

impl App {
    fn add(&mut self, text: &str) {
        let input = self.rule.find_by_class("new-todo").unwrap();
        self.rule.keydown(input, KeyCode::Enter, text).unwrap();
    }

    fn list_items(&self) -> Vec<NodeId> {
        match self.rule.find_by_class("todo-list") {
            Some(list) => self.rule.tree().children_of(list),
            None => Vec::new(),
        }
    }

    fn item_labels(&self) -> Vec<String> {
        self.list_items()
            .iter()
            .map(|&li| {
                let div = self.rule.tree().child_at(li, 0).unwrap();
                let label = self.rule.tree().child_at(div, 1).unwrap();
                self.rule.text_of(label)
            })
            .collect()
    }

    fn filter_link(&self, label: &str) -> NodeId {
        self.rule
            .find_all_by_tag("a")
            .into_iter()
            .find(|&a| self.rule.text_of(a) == label)
            .unwrap()
    }

    fn count_text(&self) -> String {
        let span = self.rule.find_by_class("todo-count").unwrap();
        self.rule.text_of(span)
    }
}

#[test]
fn empty_list_renders_only_the_header() {
    let app = app();
    assert!(app.rule.find_by_class("header").is_some());
    assert!(app.rule.find_by_class("new-todo").is_some());
    assert!(app.rule.find_by_class("main").is_none());
    assert!(app.rule.find_by_class("footer").is_none());
}

#[test]
fn enter_adds_a_trimmed_todo() {
    let mut app = app();
    app.add("  buy milk  ");
    assert_eq!(app.item_labels(), ["buy milk"]);
    assert!(app.rule.find_by_class("footer").is_some());
    assert_eq!(app.count_text(), "1 item left");
}

#[test]
fn blank_entry_is_ignored() {
    let mut app = app();
    app.add("   ");
    assert!(app.list_items().is_empty());
    assert!(app.rule.find_by_class("main").is_none());
}

#[test]
fn count_pluralizes() {
    let mut app = app();
    app.add("a");
    assert_eq!(app.count_text(), "1 item left");
    app.add("b");
    assert_eq!(app.count_text(), "2 items left");
}

#[test]
fn toggling_marks_the_item_completed() {
    let mut app = app();
    app.add("a");
    let li = app.list_items()[0];
    let toggle = app.rule.tree().child_at(li, 0).and_then(|div| {
        app.rule.tree().child_at(div, 0)
    });
    let toggle = toggle.unwrap();
    app.rule.change(toggle).unwrap();

    let li = app.list_items()[0];
    assert_eq!(app.rule.tree().class(li), Some("completed"));
    let toggle = app
        .rule
        .tree()
        .child_at(li, 0)
        .and_then(|div| app.rule.tree().child_at(div, 0))
        .unwrap();
    assert!(app.rule.tree().checked(toggle));
    assert_eq!(app.count_text(), "0 items left");
}

#[test]
fn destroy_removes_the_item() {
    let mut app = app();
    app.add("a");
    app.add("b");
    let li = app.list_items()[0];
    let destroy = app
        .rule
        .tree()
        .child_at(li, 0)
        .and_then(|div| app.rule.tree().child_at(div, 2))
        .unwrap();
    app.rule.click(destroy).unwrap();

    assert_eq!(app.item_labels(), ["b"]);
}

#[test]
fn double_click_enters_editing_and_escape_cancels() {
    let mut app = app();
    app.add("draft");
    let li = app.list_items()[0];
    let label = app
        .rule
        .tree()
        .child_at(li, 0)
        .and_then(|div| app.rule.tree().child_at(div, 1))
        .unwrap();

    app.rule.dblclick(label).unwrap();
    assert!(app.rule.find_by_class("editing").is_some());
    let edit = app.rule.find_by_class("edit").unwrap();
    assert_eq!(app.rule.tree().value(edit), Some("draft"));

    app.rule.keydown(edit, KeyCode::Escape, "ignored").unwrap();
    assert!(app.rule.find_by_class("editing").is_none());
    assert_eq!(app.item_labels(), ["draft"]);
}

#[test]
fn enter_saves_an_edit() {
    let mut app = app();
    app.add("draft");
    let li = app.list_items()[0];
    let label = app
        .rule
        .tree()
        .child_at(li, 0)
        .and_then(|div| app.rule.tree().child_at(div, 1))
        .unwrap();

    app.rule.dblclick(label).unwrap();
    let edit = app.rule.find_by_class("edit").unwrap();
    app.rule.keydown(edit, KeyCode::Enter, "final").unwrap();

    assert!(app.rule.find_by_class("editing").is_none());
    assert_eq!(app.item_labels(), ["final"]);
}

#[test]
fn blur_saves_an_edit() {
    let mut app = app();
    app.add("draft");
    let li = app.list_items()[0];
    let label = app
        .rule
        .tree()
        .child_at(li, 0)
        .and_then(|div| app.rule.tree().child_at(div, 1))
        .unwrap();

    app.rule.dblclick(label).unwrap();
    let edit = app.rule.find_by_class("edit").unwrap();
    app.rule.blur(edit, "from blur").unwrap();

    assert_eq!(app.item_labels(), ["from blur"]);
}

#[test]
fn filter_links_narrow_the_list() {
    let mut app = app();
    app.add("open");
    app.add("done");
    let li = app.list_items()[1];
    let toggle = app
        .rule
        .tree()
        .child_at(li, 0)
        .and_then(|div| app.rule.tree().child_at(div, 0))
        .unwrap();
    app.rule.change(toggle).unwrap();

    let active = app.filter_link("Active");
    app.rule.click(active).unwrap();
    assert_eq!(app.item_labels(), ["open"]);
    assert_eq!(app.store.snapshot().filter, Filter::Active);
    assert_eq!(app.router.route(), "#/active");

    let completed = app.filter_link("Completed");
    app.rule.click(completed).unwrap();
    assert_eq!(app.item_labels(), ["done"]);

    let all = app.filter_link("All");
    app.rule.click(all).unwrap();
    assert_eq!(app.item_labels(), ["open", "done"]);
}

#[test]
fn selected_filter_link_is_highlighted() {
    let mut app = app();
    app.add("a");
    let active = app.filter_link("Active");
    app.rule.click(active).unwrap();
    let active = app.filter_link("Active");
    assert_eq!(app.rule.tree().class(active), Some("selected"));
    let all = app.filter_link("All");
    assert_eq!(app.rule.tree().class(all), Some(""));
}

#[test]
fn toggle_all_and_clear_completed_empty_the_list() {
    let mut app = app();
    app.add("a");
    app.add("b");
    let toggle_all = app.rule.find_by_class("toggle-all").unwrap();
    app.rule.click(toggle_all).unwrap();
    assert_eq!(app.count_text(), "0 items left");

    let clear = app.rule.find_by_class("clear-completed").unwrap();
    app.rule.click(clear).unwrap();

    assert!(app.rule.find_by_class("main").is_none());
    assert!(app.rule.find_by_class("footer").is_none());
}

#[test]
fn mutations_persist_to_storage() {
    let mut app = app();
    app.add("a");
    app.add("b");
    assert_eq!(app.storage.load().len(), 2);
}

#[test]
fn seeded_storage_renders_on_first_pass() {
    let storage = Rc::new(MemoryStorage::seeded(vec![
        Todo {
            id: 1,
            text: "restored".into(),
            completed: false,
        },
        Todo {
            id: 2,
            text: "finished".into(),
            completed: true,
        },
    ]));
    let app = app_with_storage(storage);
    assert_eq!(app.item_labels(), ["restored", "finished"]);
    assert_eq!(app.count_text(), "1 item left");
}
