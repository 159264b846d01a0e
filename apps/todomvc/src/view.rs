//! The root component: the whole TodoMVC tree as a function of store state.
//!
//! Handlers close over the store and dispatch actions; the store notifies
//! the mount, which re-renders. All list rendering is positional, so the
//! item list is emitted in a stable order.

use std::rc::Rc;

use sprig_core::nodes;
use sprig_core::vnode::{attr, element, on, text, Child, VNode};
use sprig_core::{use_effect, use_state, KeyCode, SetState};

use crate::model::{Filter, Todo};
use crate::router::Router;
use crate::store::{Store, TodoAction};

pub fn todo_app(store: &Rc<Store>, router: &Rc<Router>) -> VNode {
    let state = store.snapshot();
    let active_count = state.todos.iter().filter(|t| !t.completed).count();
    let completed_count = state.todos.len() - active_count;

    let (draft, set_draft) = use_state(String::new());
    use_effect(active_count, move || {
        log::debug!("{active_count} active item(s)");
    });

    let header = element(
        "header",
        [attr("class", "header")],
        nodes![
            element("h1", [], nodes![text("todos")]),
            new_todo_input(store, &draft, &set_draft),
        ],
    );

    let main = (!state.todos.is_empty()).then(|| {
        let items: Vec<Child> = state
            .todos
            .iter()
            .filter(|todo| state.filter.matches(todo))
            .map(|todo| Child::from(todo_item(store, todo, state.editing)))
            .collect();
        element(
            "section",
            [attr("class", "main")],
            nodes![
                toggle_all(store, active_count),
                element(
                    "label",
                    [attr("for", "toggle-all")],
                    nodes![text("Mark all as complete")],
                ),
                element("ul", [attr("class", "todo-list")], items),
            ],
        )
    });

    let footer = (!state.todos.is_empty()).then(|| {
        element(
            "footer",
            [attr("class", "footer")],
            nodes![
                element(
                    "span",
                    [attr("class", "todo-count")],
                    nodes![
                        element("strong", [], nodes![text(active_count)]),
                        text(format!(
                            " item{} left",
                            if active_count != 1 { "s" } else { "" }
                        )),
                    ],
                ),
                filter_links(router, state.filter),
                (completed_count > 0).then(|| {
                    element(
                        "button",
                        [
                            attr("class", "clear-completed"),
                            attr(
                                "onclick",
                                on({
                                    let store = Rc::clone(store);
                                    move |_| store.dispatch(TodoAction::ClearCompleted)
                                }),
                            ),
                        ],
                        nodes![text("Clear completed")],
                    )
                }),
            ],
        )
    });

    element("section", [attr("class", "todoapp")], nodes![header, main, footer])
}

fn new_todo_input(store: &Rc<Store>, draft: &str, set_draft: &SetState<String>) -> VNode {
    let on_input = {
        let set_draft = set_draft.clone();
        on(move |e| set_draft.set(e.value().to_owned()))
    };
    let on_keydown = {
        let store = Rc::clone(store);
        let set_draft = set_draft.clone();
        on(move |e| {
            if e.is_key(&KeyCode::Enter) {
                store.dispatch(TodoAction::Add {
                    text: e.value().to_owned(),
                });
                set_draft.set(String::new());
            }
        })
    };
    element(
        "input",
        [
            attr("class", "new-todo"),
            attr("placeholder", "What needs to be done?"),
            attr("autofocus", true),
            attr("value", draft),
            attr("oninput", on_input),
            attr("onkeydown", on_keydown),
        ],
        [],
    )
}

fn toggle_all(store: &Rc<Store>, active_count: usize) -> VNode {
    element(
        "input",
        [
            attr("id", "toggle-all"),
            attr("class", "toggle-all"),
            attr("type", "checkbox"),
            attr("checked", active_count == 0),
            attr(
                "onclick",
                on({
                    let store = Rc::clone(store);
                    move |_| store.dispatch(TodoAction::ToggleAll)
                }),
            ),
        ],
        [],
    )
}

fn todo_item(store: &Rc<Store>, todo: &Todo, editing: Option<u64>) -> VNode {
    let id = todo.id;
    let is_editing = editing == Some(id);
    let mut classes = Vec::new();
    if todo.completed {
        classes.push("completed");
    }
    if is_editing {
        classes.push("editing");
    }

    let view = element(
        "div",
        [attr("class", "view")],
        nodes![
            element(
                "input",
                [
                    attr("class", "toggle"),
                    attr("type", "checkbox"),
                    attr("checked", todo.completed),
                    attr(
                        "onchange",
                        on({
                            let store = Rc::clone(store);
                            move |_| store.dispatch(TodoAction::Toggle { id })
                        }),
                    ),
                ],
                [],
            ),
            element(
                "label",
                [attr(
                    "ondblclick",
                    on({
                        let store = Rc::clone(store);
                        move |_| store.dispatch(TodoAction::Edit { id })
                    }),
                )],
                nodes![text(&todo.text)],
            ),
            element(
                "button",
                [
                    attr("class", "destroy"),
                    attr(
                        "onclick",
                        on({
                            let store = Rc::clone(store);
                            move |_| store.dispatch(TodoAction::Delete { id })
                        }),
                    ),
                ],
                [],
            ),
        ],
    );

    let edit = is_editing.then(|| {
        element(
            "input",
            [
                attr("class", "edit"),
                attr("value", todo.text.as_str()),
                attr("autofocus", true),
                attr(
                    "onblur",
                    on({
                        let store = Rc::clone(store);
                        move |e| {
                            store.dispatch(TodoAction::Save {
                                id,
                                text: e.value().to_owned(),
                            })
                        }
                    }),
                ),
                attr(
                    "onkeydown",
                    on({
                        let store = Rc::clone(store);
                        move |e| {
                            if e.is_key(&KeyCode::Enter) {
                                store.dispatch(TodoAction::Save {
                                    id,
                                    text: e.value().to_owned(),
                                });
                            }
                            if e.is_key(&KeyCode::Escape) {
                                store.dispatch(TodoAction::CancelEdit);
                            }
                        }
                    }),
                ),
            ],
            [],
        )
    });

    element("li", [attr("class", classes.join(" "))], nodes![view, edit])
}

fn filter_links(router: &Rc<Router>, current: Filter) -> VNode {
    let links: Vec<Child> = Filter::ALL
        .iter()
        .map(|&filter| {
            let link = element(
                "a",
                [
                    attr("href", filter.route()),
                    attr("class", if filter == current { "selected" } else { "" }),
                    attr(
                        "onclick",
                        on({
                            let router = Rc::clone(router);
                            move |_| router.navigate(filter.route())
                        }),
                    ),
                ],
                nodes![text(filter.label())],
            );
            Child::from(element("li", [], nodes![link]))
        })
        .collect();
    element("ul", [attr("class", "filters")], links)
}
