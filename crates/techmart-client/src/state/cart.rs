//! # Cart State
//!
//! Holds the current shopping cart.
//!
//! ## Thread Safety
//! The cart is wrapped in `Mutex` because:
//! 1. Multiple facade calls may access/modify the cart
//! 2. Only one call should modify the cart at a time
//! 3. The session mirror task runs concurrently with facade calls
//!
//! The store itself is shared as `Arc<CartState>`.

use std::sync::Mutex;

use techmart_core::{Cart, CartTotals};

/// Shared cart store.
///
/// ## Why Not RwLock?
/// Cart operations are quick and most of them modify state. A RwLock
/// would add complexity with minimal benefit.
#[derive(Debug, Default)]
pub struct CartState {
    cart: Mutex<Cart>,
}

impl CartState {
    /// Creates a new empty cart state.
    pub fn new() -> Self {
        CartState {
            cart: Mutex::new(Cart::new()),
        }
    }

    /// Creates a cart state from a restored snapshot.
    pub fn from_cart(cart: Cart) -> Self {
        CartState {
            cart: Mutex::new(cart),
        }
    }

    /// Executes a function with read access to the cart.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let totals = cart_state.with_cart(|cart| cart.totals);
    /// ```
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        let cart = self.cart.lock().expect("cart mutex poisoned");
        f(&cart)
    }

    /// Executes a function with write access to the cart.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// cart_state.with_cart_mut(|cart| cart.add(&product));
    /// ```
    pub fn with_cart_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Cart) -> R,
    {
        let mut cart = self.cart.lock().expect("cart mutex poisoned");
        f(&mut cart)
    }

    /// A full clone of the cart (for snapshots and persistence).
    pub fn snapshot(&self) -> Cart {
        self.with_cart(Cart::clone)
    }

    /// The current derived totals.
    pub fn totals(&self) -> CartTotals {
        self.with_cart(|cart| cart.totals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use techmart_core::{Category, Money, Product};

    fn product(id: &str, price: i64, stock: i64) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Product {}", id),
            description: None,
            brand: None,
            category: Category::Laptop,
            price: Money::from_minor(price),
            discount_price: None,
            images: vec![],
            stock,
            rating: 0.0,
            sale_count: 0,
            featured: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_closure_accessors() {
        let state = CartState::new();
        let p = product("P", 100_000, 3);

        state.with_cart_mut(|cart| {
            cart.add(&p);
            cart.add(&p);
        });

        assert_eq!(state.totals().subtotal.minor(), 200_000);
        assert_eq!(state.with_cart(|c| c.quantity_of("P")), 2);
    }

    #[test]
    fn test_snapshot_is_detached() {
        let state = CartState::new();
        state.with_cart_mut(|cart| cart.add(&product("P", 1000, 3)));

        let snapshot = state.snapshot();
        state.with_cart_mut(|cart| cart.clear());

        assert!(!snapshot.is_empty());
        assert!(state.with_cart(|c| c.is_empty()));
    }
}
