//! # Wishlist State
//!
//! Holds the signed-in user's wishlist as a local id set, mirrored to the
//! user document after every change.

use std::sync::Mutex;

use techmart_core::WishlistSet;

/// Shared wishlist store.
#[derive(Debug, Default)]
pub struct WishlistState {
    set: Mutex<WishlistSet>,
}

impl WishlistState {
    /// Creates a new empty wishlist state.
    pub fn new() -> Self {
        WishlistState {
            set: Mutex::new(WishlistSet::default()),
        }
    }

    /// Executes a function with read access to the set.
    pub fn with_set<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&WishlistSet) -> R,
    {
        let set = self.set.lock().expect("wishlist mutex poisoned");
        f(&set)
    }

    /// Executes a function with write access to the set.
    pub fn with_set_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut WishlistSet) -> R,
    {
        let mut set = self.set.lock().expect("wishlist mutex poisoned");
        f(&mut set)
    }

    /// Replaces the whole set (login restores the stored wishlist).
    pub fn replace(&self, ids: Vec<String>) {
        self.with_set_mut(|set| set.replace(ids));
    }

    /// Empties the set (logout).
    pub fn clear(&self) {
        self.with_set_mut(WishlistSet::clear);
    }

    /// Checks membership.
    pub fn contains(&self, id: &str) -> bool {
        self.with_set(|set| set.contains(id))
    }

    /// The ids as a vector (for persistence and backend writes).
    pub fn ids(&self) -> Vec<String> {
        self.with_set(WishlistSet::to_vec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_and_clear() {
        let state = WishlistState::new();
        state.replace(vec!["a".to_string(), "b".to_string()]);

        assert!(state.contains("a"));
        assert_eq!(state.ids().len(), 2);

        state.clear();
        assert!(!state.contains("a"));
        assert!(state.ids().is_empty());
    }
}
