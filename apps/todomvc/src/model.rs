//! Domain types for the todo list.

/// One todo entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Todo {
    pub id: u64,
    pub text: String,
    pub completed: bool,
}

/// Which slice of the list the UI shows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Filter {
    #[default]
    All,
    Active,
    Completed,
}

impl Filter {
    pub const ALL: [Filter; 3] = [Filter::All, Filter::Active, Filter::Completed];

    pub fn matches(&self, todo: &Todo) -> bool {
        match self {
            Filter::All => true,
            Filter::Active => !todo.completed,
            Filter::Completed => todo.completed,
        }
    }

    /// Route fragment for this filter, `"#/active"` style.
    pub fn route(&self) -> &'static str {
        match self {
            Filter::All => "#/all",
            Filter::Active => "#/active",
            Filter::Completed => "#/completed",
        }
    }

    /// Parses a route fragment; an empty fragment means [`Filter::All`],
    /// anything unrecognized is rejected.
    pub fn from_route(route: &str) -> Option<Filter> {
        let name = route.strip_prefix("#/").unwrap_or(route);
        match name {
            "" | "all" => Some(Filter::All),
            "active" => Some(Filter::Active),
            "completed" => Some(Filter::Completed),
            _ => None,
        }
    }

    /// Capitalized link label, `"Active"` style.
    pub fn label(&self) -> &'static str {
        match self {
            Filter::All => "All",
            Filter::Active => "Active",
            Filter::Completed => "Completed",
        }
    }
}
