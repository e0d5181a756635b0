//! Request-scoped parameter store.
//!
//! Middleware uses this to hand values to the action it guards, e.g. the
//! authenticated client. Values are opaque to the router; only the
//! middleware and controller that agree on a key know its type.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;

/// Typed values set by middleware for the action to read.
#[derive(Default)]
pub struct Params {
    values: HashMap<String, Box<dyn Any + Send + Sync>>,
}

impl Params {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` under `key`, replacing any previous value.
    pub fn insert<T>(&mut self, key: impl Into<String>, value: T)
    where
        T: Any + Send + Sync,
    {
        self.values.insert(key.into(), Box::new(value));
    }

    /// The value under `key`, if present and of type `T`.
    pub fn get<T: Any>(&self, key: &str) -> Option<&T> {
        self.values.get(key).and_then(|value| value.downcast_ref::<T>())
    }

    pub fn get_mut<T: Any>(&mut self, key: &str) -> Option<&mut T> {
        self.values
            .get_mut(key)
            .and_then(|value| value.downcast_mut::<T>())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> bool {
        self.values.remove(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Debug for Params {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&String> = self.values.keys().collect();
        keys.sort();
        f.debug_struct("Params").field("keys", &keys).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct User {
        name: String,
    }

    #[test]
    fn test_typed_lookup() {
        let mut params = Params::new();
        params.insert("user", User { name: "ann".into() });
        params.insert("count", 3u32);

        assert_eq!(params.get::<User>("user").map(|u| u.name.as_str()), Some("ann"));
        assert_eq!(params.get::<u32>("count"), Some(&3));
        // Wrong type reads as absent.
        assert_eq!(params.get::<u64>("count"), None);
        assert_eq!(params.get::<u32>("missing"), None);
    }

    #[test]
    fn test_replace_and_remove() {
        let mut params = Params::new();
        params.insert("k", 1i32);
        params.insert("k", "two");
        assert_eq!(params.len(), 1);
        assert_eq!(params.get::<&str>("k"), Some(&"two"));

        if let Some(value) = params.get_mut::<&str>("k") {
            *value = "three";
        }
        assert_eq!(params.get::<&str>("k"), Some(&"three"));

        assert!(params.remove("k"));
        assert!(!params.remove("k"));
        assert!(params.is_empty());
    }
}
