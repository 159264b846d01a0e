//! Headless TodoMVC demo: scripts a short session against the engine and
//! prints the live tree after each step.

use std::rc::Rc;

use sprig_dom::Mount;
use todomvc::model::Filter;
use todomvc::router::Router;
use todomvc::store::{MemoryStorage, Storage, Store, TodoAction};
use todomvc::view::todo_app;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let storage = Rc::new(MemoryStorage::new());
    let store = Rc::new(Store::new(
        Rc::clone(&storage) as Rc<dyn Storage>,
        Filter::All,
    ));
    let router = Router::new(Rc::clone(&store), "#/");

    let mut mount = Mount::detached("app");
    store.subscribe({
        let handle = mount.runtime_handle();
        move || handle.request_render()
    });
    mount.set_root_component({
        let store = Rc::clone(&store);
        let router = Rc::clone(&router);
        move || todo_app(&store, &router)
    });
    mount.pump()?;

    println!("== fresh mount ==");
    println!("{}", mount.tree().dump(mount.container()));

    store.dispatch(TodoAction::Add {
        text: "learn positional diffing".into(),
    });
    store.dispatch(TodoAction::Add {
        text: "write a demo".into(),
    });
    mount.pump()?;

    println!("== two items ==");
    println!("{}", mount.tree().dump(mount.container()));

    let first = store.snapshot().todos[0].id;
    store.dispatch(TodoAction::Toggle { id: first });
    router.navigate("#/active");
    mount.pump()?;

    println!("== active view after completing the first item ==");
    println!("{}", mount.tree().dump(mount.container()));

    store.dispatch(TodoAction::ClearCompleted);
    router.navigate("#/all");
    mount.pump()?;

    println!("== after clearing completed ==");
    println!("{}", mount.tree().dump(mount.container()));
    println!("persisted items: {}", storage.load().len());

    Ok(())
}
