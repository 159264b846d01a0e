//! Hash-style routing for the filter links.
//!
//! `"#/active"`-style fragments map onto [`Filter`] values. The host feeds
//! route changes in through [`Router::navigate`]; unknown fragments are
//! ignored, as the original did.

use std::cell::RefCell;
use std::rc::Rc;

use crate::model::Filter;
use crate::store::{Store, TodoAction};

pub struct Router {
    store: Rc<Store>,
    route: RefCell<String>,
}

impl Router {
    pub fn new(store: Rc<Store>, initial_route: &str) -> Rc<Self> {
        let router = Rc::new(Self {
            store,
            route: RefCell::new(String::new()),
        });
        router.navigate(initial_route);
        router
    }

    /// Applies a route fragment: records it and dispatches the matching
    /// filter. Unrecognized fragments change nothing.
    pub fn navigate(&self, route: &str) {
        match Filter::from_route(route) {
            Some(filter) => {
                *self.route.borrow_mut() = filter.route().to_owned();
                self.store.dispatch(TodoAction::SetFilter { filter });
            }
            None => log::warn!("ignoring unknown route {route:?}"),
        }
    }

    pub fn route(&self) -> String {
        self.route.borrow().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStorage;

    fn router() -> (Rc<Store>, Rc<Router>) {
        let store = Rc::new(Store::new(Rc::new(MemoryStorage::new()), Filter::All));
        let router = Router::new(Rc::clone(&store), "");
        (store, router)
    }

    #[test]
    fn navigation_sets_the_filter() {
        let (store, router) = router();
        router.navigate("#/completed");
        assert_eq!(store.snapshot().filter, Filter::Completed);
        assert_eq!(router.route(), "#/completed");
    }

    #[test]
    fn unknown_routes_are_ignored() {
        let (store, router) = router();
        router.navigate("#/active");
        router.navigate("#/archived");
        assert_eq!(store.snapshot().filter, Filter::Active);
        assert_eq!(router.route(), "#/active");
    }

    #[test]
    fn empty_initial_route_means_all() {
        let (store, router) = router();
        assert_eq!(store.snapshot().filter, Filter::All);
        assert_eq!(router.route(), "#/all");
    }
}
