//! # Wishlist Set
//!
//! A simple product-id set mirroring the cart store pattern: pure mutations
//! here, guarded operations (sign-in checks, backend sync, notices) in the
//! client facade.
//!
//! No ordering guarantee, no duplicates.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Set of wishlisted product ids.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct WishlistSet {
    ids: HashSet<String>,
}

impl WishlistSet {
    /// Creates an empty wishlist.
    pub fn new() -> Self {
        WishlistSet::default()
    }

    /// Adds a product id. Adding an id twice is a no-op.
    ///
    /// Returns `true` if the set changed.
    pub fn add(&mut self, id: impl Into<String>) -> bool {
        self.ids.insert(id.into())
    }

    /// Removes a product id. Returns `true` if it was present.
    pub fn remove(&mut self, id: &str) -> bool {
        self.ids.remove(id)
    }

    /// Toggles a product id. Returns `true` if the id is now present.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.to_string());
            true
        }
    }

    /// Checks membership.
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Replaces the whole set (backend rehydration after sign-in).
    pub fn replace(&mut self, ids: impl IntoIterator<Item = String>) {
        self.ids = ids.into_iter().collect();
    }

    /// Clears the set (sign-out).
    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Number of wishlisted products.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Checks if the wishlist is empty.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Snapshot of the ids for a backend write.
    pub fn to_vec(&self) -> Vec<String> {
        self.ids.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_duplicates() {
        let mut wl = WishlistSet::new();
        assert!(wl.add("p-1"));
        assert!(!wl.add("p-1"));
        assert_eq!(wl.len(), 1);
    }

    #[test]
    fn test_toggle() {
        let mut wl = WishlistSet::new();
        assert!(wl.toggle("p-1"));
        assert!(wl.contains("p-1"));
        assert!(!wl.toggle("p-1"));
        assert!(wl.is_empty());
    }

    #[test]
    fn test_replace_and_clear() {
        let mut wl = WishlistSet::new();
        wl.add("old");
        wl.replace(vec!["a".to_string(), "b".to_string(), "a".to_string()]);
        assert_eq!(wl.len(), 2);
        assert!(!wl.contains("old"));

        wl.clear();
        assert!(wl.is_empty());
    }
}
