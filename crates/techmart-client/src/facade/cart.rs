//! # Cart Facade
//!
//! Guarded cart operations with stock checks and localized notices.
//!
//! ## Guard Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    add_to_cart(product_id)                              │
//! │                                                                         │
//! │  1. Fetch product (live stock read)                                    │
//! │       │                                                                 │
//! │       ├── not found ──────────────► Err(NOT_FOUND)                     │
//! │       ├── stock ≤ 0 ──────────────► Ok(error notice "Бүтээгдэхүүн      │
//! │       │                              дууссан байна"), NO mutation      │
//! │       ▼                                                                 │
//! │  2. Already at stock cap? ────────► Ok(error notice, max quantity),    │
//! │       │                              NO mutation                        │
//! │       ▼                                                                 │
//! │  3. cart.add(&product) ───────────► Ok(success notice "Сагсанд         │
//! │                                      нэмэгдлээ")                        │
//! │                                                                         │
//! │  The guard reads and the mutation run in one lock acquisition, so a    │
//! │  concurrent call can't slip a quantity past the cap.                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use tracing::debug;

use crate::error::ApiError;
use crate::notice::Notice;
use crate::state::CartState;
use techmart_core::locale::messages;
use techmart_core::{Cart, CartTotals};
use techmart_db::Database;

/// Guarded cart operations.
#[derive(Clone)]
pub struct CartFacade {
    db: Database,
    cart: Arc<CartState>,
}

impl CartFacade {
    pub(crate) fn new(db: Database, cart: Arc<CartState>) -> Self {
        CartFacade { db, cart }
    }

    /// Adds a product to the cart by id.
    ///
    /// Sold-out products and at-cap lines produce an error notice without
    /// mutating the cart; a missing product is a hard error.
    pub async fn add_to_cart(&self, product_id: &str) -> Result<Notice, ApiError> {
        debug!(product_id = %product_id, "add_to_cart");

        let product = self
            .db
            .products()
            .get_by_id(product_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Product", product_id))?;

        let notice = self.cart.with_cart_mut(|cart| {
            if !product.in_stock() {
                return Notice::error(messages::OUT_OF_STOCK);
            }
            if cart.quantity_of(&product.id) >= product.stock {
                return Notice::error(messages::MAX_QUANTITY);
            }
            cart.add(&product);
            Notice::success(messages::CART_ADDED)
        });

        Ok(notice)
    }

    /// Increments a line's quantity by one.
    ///
    /// At the stock cap this refuses with a notice instead of mutating.
    pub fn increase_quantity(&self, product_id: &str) -> Result<Notice, ApiError> {
        self.cart.with_cart_mut(|cart| {
            let line = cart
                .line(product_id)
                .ok_or_else(|| ApiError::not_found("Cart line", product_id))?;

            if line.quantity >= line.stock_cap {
                return Ok(Notice::error(messages::MAX_QUANTITY));
            }

            cart.increment_qty(product_id);
            Ok(Notice::success(messages::CART_ADDED))
        })
    }

    /// Decrements a line's quantity by one, refusing to go below 1.
    pub fn decrease_quantity(&self, product_id: &str) -> Result<Notice, ApiError> {
        self.cart.with_cart_mut(|cart| {
            let line = cart
                .line(product_id)
                .ok_or_else(|| ApiError::not_found("Cart line", product_id))?;

            if line.quantity <= 1 {
                return Ok(Notice::error(messages::MIN_QUANTITY));
            }

            cart.decrement_qty(product_id);
            Ok(Notice::success(messages::CART_REMOVED))
        })
    }

    /// Sets a line's quantity exactly.
    ///
    /// Out-of-range values are refused with a notice; the store never sees
    /// them, so nothing is silently clamped on this path.
    pub fn change_quantity(&self, product_id: &str, quantity: i64) -> Result<Notice, ApiError> {
        self.cart.with_cart_mut(|cart| {
            let line = cart
                .line(product_id)
                .ok_or_else(|| ApiError::not_found("Cart line", product_id))?;

            if quantity < 1 {
                return Ok(Notice::error(messages::MIN_QUANTITY));
            }
            if quantity > line.stock_cap {
                return Ok(Notice::error(messages::MAX_QUANTITY));
            }

            cart.set_qty(product_id, quantity);
            Ok(Notice::success(messages::CART_ADDED))
        })
    }

    /// Removes a line.
    pub fn remove_from_cart(&self, product_id: &str) -> Notice {
        self.cart.with_cart_mut(|cart| cart.remove(product_id));
        Notice::success(messages::CART_REMOVED)
    }

    /// Empties the cart.
    pub fn clear_cart(&self) -> Notice {
        self.cart.with_cart_mut(Cart::clear);
        Notice::success(messages::CART_CLEARED)
    }

    /// Refreshes every line's stock cap and price from the catalog.
    ///
    /// Lines whose product sold out (or was deleted) are dropped by the
    /// store's own sync rule; a deleted product is treated as sold out.
    pub async fn sync_with_catalog(&self) -> Result<(), ApiError> {
        let ids: Vec<String> = self
            .cart
            .with_cart(|cart| cart.lines.iter().map(|l| l.id.clone()).collect());

        for id in ids {
            match self.db.products().get_by_id(&id).await? {
                Some(product) => self.cart.with_cart_mut(|cart| {
                    cart.sync_stock(&id, product.stock);
                    cart.sync_price(&id, product.effective_price(), product.price);
                }),
                None => self.cart.with_cart_mut(|cart| cart.sync_stock(&id, 0)),
            }
        }

        Ok(())
    }

    /// Checks if a product is in the cart.
    pub fn is_in_cart(&self, product_id: &str) -> bool {
        self.cart.with_cart(|cart| cart.contains(product_id))
    }

    /// Quantity of a product in the cart, 0 if absent.
    pub fn quantity_of(&self, product_id: &str) -> i64 {
        self.cart.with_cart(|cart| cart.quantity_of(product_id))
    }

    /// The current derived totals.
    pub fn totals(&self) -> CartTotals {
        self.cart.totals()
    }

    /// A full clone of the cart.
    pub fn snapshot(&self) -> Cart {
        self.cart.snapshot()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
