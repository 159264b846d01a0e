//! The application store: single owner of todo state, mutated through
//! dispatched actions, persisted after every mutation, observed through
//! subscriber callbacks. Collaborators (the view, the router, the host)
//! never touch the state directly.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::model::{Filter, Todo};

/// Persistence boundary. The browser original wrote JSON to local storage;
/// hosts plug in whatever medium they have.
pub trait Storage {
    fn load(&self) -> Vec<Todo>;
    fn save(&self, todos: &[Todo]);
}

/// In-memory [`Storage`], the default for tests and the headless demo.
#[derive(Default)]
pub struct MemoryStorage {
    todos: RefCell<Vec<Todo>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seeds the backing store, as if a previous session had saved.
    pub fn seeded(todos: Vec<Todo>) -> Self {
        Self {
            todos: RefCell::new(todos),
        }
    }
}

impl Storage for MemoryStorage {
    fn load(&self) -> Vec<Todo> {
        self.todos.borrow().clone()
    }

    fn save(&self, todos: &[Todo]) {
        *self.todos.borrow_mut() = todos.to_vec();
    }
}

/// Everything a render pass needs to know.
#[derive(Clone, Debug, Default)]
pub struct AppState {
    pub todos: Vec<Todo>,
    pub filter: Filter,
    pub editing: Option<u64>,
}

#[derive(Clone, Debug)]
pub enum TodoAction {
    Add { text: String },
    Toggle { id: u64 },
    Delete { id: u64 },
    Edit { id: u64 },
    Save { id: u64, text: String },
    CancelEdit,
    ToggleAll,
    ClearCompleted,
    SetFilter { filter: Filter },
}

pub struct Store {
    state: RefCell<AppState>,
    storage: Rc<dyn Storage>,
    next_id: Cell<u64>,
    listeners: RefCell<Vec<Rc<dyn Fn()>>>,
}

impl Store {
    pub fn new(storage: Rc<dyn Storage>, filter: Filter) -> Self {
        let todos = storage.load();
        let next_id = todos.iter().map(|t| t.id).max().map_or(1, |id| id + 1);
        Self {
            state: RefCell::new(AppState {
                todos,
                filter,
                editing: None,
            }),
            storage,
            next_id: Cell::new(next_id),
            listeners: RefCell::new(Vec::new()),
        }
    }

    /// Copy of the current state for one render pass.
    pub fn snapshot(&self) -> AppState {
        self.state.borrow().clone()
    }

    /// Registers a callback fired after every applied action. The render
    /// loop subscribes its `request_render` here.
    pub fn subscribe(&self, listener: impl Fn() + 'static) {
        self.listeners.borrow_mut().push(Rc::new(listener));
    }

    pub fn dispatch(&self, action: TodoAction) {
        log::debug!("dispatch {action:?}");
        {
            let mut state = self.state.borrow_mut();
            match action {
                TodoAction::Add { text } => {
                    let text = text.trim();
                    if text.is_empty() {
                        return;
                    }
                    let id = self.next_id.get();
                    self.next_id.set(id + 1);
                    state.todos.push(Todo {
                        id,
                        text: text.to_owned(),
                        completed: false,
                    });
                }
                TodoAction::Toggle { id } => {
                    if let Some(todo) = state.todos.iter_mut().find(|t| t.id == id) {
                        todo.completed = !todo.completed;
                    }
                }
                TodoAction::Delete { id } => {
                    state.todos.retain(|t| t.id != id);
                }
                TodoAction::Edit { id } => {
                    state.editing = Some(id);
                }
                TodoAction::Save { id, text } => {
                    if let Some(todo) = state.todos.iter_mut().find(|t| t.id == id) {
                        let text = text.trim();
                        // An emptied edit keeps the entry with a blank text
                        // rather than deleting it.
                        todo.text = if text.is_empty() {
                            " ".to_owned()
                        } else {
                            text.to_owned()
                        };
                    }
                    state.editing = None;
                }
                TodoAction::CancelEdit => {
                    state.editing = None;
                }
                TodoAction::ToggleAll => {
                    let all_done = state.todos.iter().all(|t| t.completed);
                    for todo in &mut state.todos {
                        todo.completed = !all_done;
                    }
                }
                TodoAction::ClearCompleted => {
                    state.todos.retain(|t| !t.completed);
                }
                TodoAction::SetFilter { filter } => {
                    state.filter = filter;
                }
            }
            self.storage.save(&state.todos);
        }
        self.notify();
    }

    fn notify(&self) {
        // Snapshot first: a listener must be free to call back into the
        // store (dispatch, subscribe) while it runs.
        let listeners: Vec<Rc<dyn Fn()>> = self.listeners.borrow().clone();
        for listener in listeners {
            listener();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> Store {
        Store::new(Rc::new(MemoryStorage::new()), Filter::All)
    }

    #[test]
    fn add_trims_and_ignores_empty_text() {
        let store = store();
        store.dispatch(TodoAction::Add {
            text: "  buy milk  ".into(),
        });
        store.dispatch(TodoAction::Add { text: "   ".into() });
        let state = store.snapshot();
        assert_eq!(state.todos.len(), 1);
        assert_eq!(state.todos[0].text, "buy milk");
    }

    #[test]
    fn ids_are_unique_and_monotonic() {
        let store = store();
        store.dispatch(TodoAction::Add { text: "a".into() });
        store.dispatch(TodoAction::Add { text: "b".into() });
        let state = store.snapshot();
        assert!(state.todos[0].id < state.todos[1].id);
    }

    #[test]
    fn toggle_all_flips_against_all_done() {
        let store = store();
        store.dispatch(TodoAction::Add { text: "a".into() });
        store.dispatch(TodoAction::Add { text: "b".into() });
        store.dispatch(TodoAction::Toggle {
            id: store.snapshot().todos[0].id,
        });

        store.dispatch(TodoAction::ToggleAll);
        assert!(store.snapshot().todos.iter().all(|t| t.completed));

        store.dispatch(TodoAction::ToggleAll);
        assert!(store.snapshot().todos.iter().all(|t| !t.completed));
    }

    #[test]
    fn save_falls_back_to_a_blank_text() {
        let store = store();
        store.dispatch(TodoAction::Add { text: "a".into() });
        let id = store.snapshot().todos[0].id;
        store.dispatch(TodoAction::Edit { id });
        assert_eq!(store.snapshot().editing, Some(id));
        store.dispatch(TodoAction::Save {
            id,
            text: "   ".into(),
        });
        let state = store.snapshot();
        assert_eq!(state.todos[0].text, " ");
        assert_eq!(state.editing, None);
    }

    #[test]
    fn clear_completed_keeps_open_entries() {
        let store = store();
        store.dispatch(TodoAction::Add { text: "a".into() });
        store.dispatch(TodoAction::Add { text: "b".into() });
        let id = store.snapshot().todos[1].id;
        store.dispatch(TodoAction::Toggle { id });
        store.dispatch(TodoAction::ClearCompleted);
        let state = store.snapshot();
        assert_eq!(state.todos.len(), 1);
        assert_eq!(state.todos[0].text, "a");
    }

    #[test]
    fn every_mutation_persists() {
        let storage = Rc::new(MemoryStorage::new());
        let store = Store::new(Rc::clone(&storage) as Rc<dyn Storage>, Filter::All);
        store.dispatch(TodoAction::Add { text: "a".into() });
        assert_eq!(storage.load().len(), 1);
        store.dispatch(TodoAction::ClearCompleted);
        assert_eq!(storage.load().len(), 1);
    }

    #[test]
    fn seeded_storage_restores_and_continues_ids() {
        let storage = Rc::new(MemoryStorage::seeded(vec![Todo {
            id: 7,
            text: "old".into(),
            completed: true,
        }]));
        let store = Store::new(storage as Rc<dyn Storage>, Filter::All);
        store.dispatch(TodoAction::Add { text: "new".into() });
        let state = store.snapshot();
        assert_eq!(state.todos.len(), 2);
        assert!(state.todos[1].id > 7);
    }

    #[test]
    fn listeners_fire_after_every_applied_action() {
        use std::cell::Cell;
        let store = store();
        let fired = Rc::new(Cell::new(0));
        store.subscribe({
            let fired = Rc::clone(&fired);
            move || fired.set(fired.get() + 1)
        });
        store.dispatch(TodoAction::Add { text: "a".into() });
        store.dispatch(TodoAction::Add { text: "  ".into() });
        assert_eq!(fired.get(), 1, "rejected adds do not notify");
    }
}
