//! REST action resolution and per-controller action tables.
//!
//! The action name is derived from the HTTP method and the shape of the
//! path remainder:
//!
//! ```text
//! GET    /pages          → Index
//! POST   /pages          → Create
//! GET    /pages/10       → Show
//! POST   /pages/10       → Update      (PUT too)
//! DELETE /pages/10       → Destroy
//! GET    /pages/10/edit  → GETEdit
//! POST   /pages/recent   → POSTRecent  (only if the controller has it)
//! ```

use std::collections::{HashMap, HashSet};
use std::fmt;

use axum::http::Method;

use crate::controller::RequestContext;

/// Resolved name of the controller method to run.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Action {
    Index,
    Show,
    Create,
    Update,
    Destroy,
    /// `<METHOD><Word>`, e.g. `GETEdit`.
    Custom(String),
    /// No REST verb fits the method and path shape.
    Wrong,
}

impl Action {
    /// Resolve the action for `method` and the remainder tokens.
    ///
    /// `extra_actions` is the set of custom names the controller answers
    /// to; it lets `/pages/recent` reach `GETRecent` instead of `Show`.
    pub fn resolve(method: &Method, id: &str, action: &str, extra_actions: &HashSet<String>) -> Self {
        if id.is_empty() {
            return match *method {
                Method::GET => Action::Index,
                Method::POST => Action::Create,
                _ => Action::Wrong,
            };
        }

        if !action.is_empty() {
            return Action::custom(method, action);
        }

        let candidate = custom_name(method, id);
        if extra_actions.contains(&candidate) {
            return Action::Custom(candidate);
        }

        match *method {
            Method::GET => Action::Show,
            Method::POST | Method::PUT => Action::Update,
            Method::DELETE => Action::Destroy,
            _ => Action::Wrong,
        }
    }

    /// The custom action `method` + capitalized `word`.
    pub fn custom(method: &Method, word: &str) -> Self {
        Action::Custom(custom_name(method, word))
    }

    /// Name used to look the action up in an [`ActionTable`].
    pub fn name(&self) -> &str {
        match self {
            Action::Index => "Index",
            Action::Show => "Show",
            Action::Create => "Create",
            Action::Update => "Update",
            Action::Destroy => "Destroy",
            Action::Custom(name) => name,
            Action::Wrong => "WrongAction",
        }
    }

    fn is_canonical_name(name: &str) -> bool {
        matches!(name, "Index" | "Show" | "Create" | "Update" | "Destroy")
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Uppercases the first character of `s`.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn custom_name(method: &Method, word: &str) -> String {
    format!("{}{}", method.as_str(), capitalize(word))
}

/// An action method: runs against the controller and renders through the
/// request context.
pub type ActionFn<C> = fn(&mut C, &mut RequestContext);

/// Maps action names to controller methods. Built once per route at
/// registration time.
pub struct ActionTable<C> {
    actions: HashMap<String, ActionFn<C>>,
}

impl<C> ActionTable<C> {
    pub fn new() -> Self {
        Self {
            actions: HashMap::new(),
        }
    }

    pub fn index(&mut self, action: ActionFn<C>) -> &mut Self {
        self.on(Action::Index.name(), action)
    }

    pub fn show(&mut self, action: ActionFn<C>) -> &mut Self {
        self.on(Action::Show.name(), action)
    }

    pub fn create(&mut self, action: ActionFn<C>) -> &mut Self {
        self.on(Action::Create.name(), action)
    }

    pub fn update(&mut self, action: ActionFn<C>) -> &mut Self {
        self.on(Action::Update.name(), action)
    }

    pub fn destroy(&mut self, action: ActionFn<C>) -> &mut Self {
        self.on(Action::Destroy.name(), action)
    }

    /// Register `method` + capitalized `word`, e.g. `(GET, "edit")` → `GETEdit`.
    pub fn custom(&mut self, method: Method, word: &str, action: ActionFn<C>) -> &mut Self {
        self.on(custom_name(&method, word), action)
    }

    /// Register an action under an explicit name.
    pub fn on(&mut self, name: impl Into<String>, action: ActionFn<C>) -> &mut Self {
        self.actions.insert(name.into(), action);
        self
    }

    pub fn get(&self, name: &str) -> Option<ActionFn<C>> {
        self.actions.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.actions.contains_key(name)
    }

    /// Names registered beyond the five canonical REST actions.
    pub fn extra_actions(&self) -> HashSet<String> {
        self.actions
            .keys()
            .filter(|name| !Action::is_canonical_name(name))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl<C> Default for ActionTable<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for ActionTable<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.actions.keys().collect();
        names.sort();
        f.debug_struct("ActionTable").field("actions", &names).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(method: Method, id: &str, action: &str) -> String {
        Action::resolve(&method, id, action, &HashSet::new()).to_string()
    }

    #[test]
    fn test_collection_actions() {
        assert_eq!(resolve(Method::GET, "", ""), "Index");
        assert_eq!(resolve(Method::POST, "", ""), "Create");
        assert_eq!(resolve(Method::PUT, "", ""), "WrongAction");
        assert_eq!(resolve(Method::DELETE, "", ""), "WrongAction");
    }

    #[test]
    fn test_member_actions() {
        assert_eq!(resolve(Method::GET, "10", ""), "Show");
        assert_eq!(resolve(Method::POST, "10", ""), "Update");
        assert_eq!(resolve(Method::PUT, "10", ""), "Update");
        assert_eq!(resolve(Method::DELETE, "10", ""), "Destroy");
        assert_eq!(resolve(Method::PATCH, "10", ""), "WrongAction");
    }

    #[test]
    fn test_action_token_always_wins() {
        assert_eq!(resolve(Method::GET, "10", "edit"), "GETEdit");
        assert_eq!(resolve(Method::POST, "10", "edit"), "POSTEdit");
        assert_eq!(resolve(Method::PUT, "10", "edit"), "PUTEdit");
        assert_eq!(resolve(Method::DELETE, "10", "edit"), "DELETEEdit");
    }

    #[test]
    fn test_non_numeric_id_is_still_an_id() {
        assert_eq!(resolve(Method::GET, "abc", ""), "Show");
        assert_eq!(resolve(Method::DELETE, "abc", ""), "Destroy");
    }

    #[test]
    fn test_known_extra_action_in_id_position() {
        let extras: HashSet<String> = ["POSTActivate".to_string(), "GETRecent".to_string()].into();

        let action = Action::resolve(&Method::POST, "activate", "", &extras);
        assert_eq!(action, Action::Custom("POSTActivate".into()));

        let action = Action::resolve(&Method::GET, "recent", "", &extras);
        assert_eq!(action.name(), "GETRecent");

        // Method must match too.
        let action = Action::resolve(&Method::GET, "activate", "", &extras);
        assert_eq!(action, Action::Show);
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize(""), "");
        assert_eq!(capitalize("edit"), "Edit");
        assert_eq!(capitalize("Edit"), "Edit");
        assert_eq!(capitalize("élan"), "Élan");
    }

    struct Dummy;

    fn noop(_: &mut Dummy, _: &mut RequestContext) {}

    #[test]
    fn test_action_table_extras() {
        let mut table = ActionTable::<Dummy>::new();
        table
            .index(noop)
            .show(noop)
            .custom(Method::GET, "edit", noop)
            .on("POSTActivate", noop);

        assert_eq!(table.len(), 4);
        assert!(table.contains("GETEdit"));
        assert!(table.get("Index").is_some());
        assert!(table.get("Destroy").is_none());

        let extras = table.extra_actions();
        assert_eq!(extras.len(), 2);
        assert!(extras.contains("GETEdit"));
        assert!(extras.contains("POSTActivate"));
    }
}
