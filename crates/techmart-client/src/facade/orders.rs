//! # Order Facade
//!
//! Checkout and order history over the transactional order repository.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    place_order(shipping, payment)                       │
//! │                                                                         │
//! │  signed in? ──no──► Err(login required)                                 │
//! │       │                                                                 │
//! │  cart empty? ─yes─► Err(validation)                                     │
//! │       │                                                                 │
//! │  shipping valid? ─no─► Err("Мэдээллээ бүрэн бөглөнө үү")                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  snapshot cart ──► OrderDraft ──► repository transaction                │
//! │       │                               │                                 │
//! │       │                  fail ────────┤ (stock untouched, cart intact)  │
//! │       ▼                               ▼                                 │
//! │  clear cart ◄──────────────── commit ok                                 │
//! │                                                                         │
//! │  The cart is cleared strictly after the commit, so a failed placement  │
//! │  leaves the buyer exactly where they were.                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use tracing::info;

use crate::error::ApiError;
use crate::notice::Notice;
use crate::state::{AuthState, CartState};
use techmart_core::locale::messages;
use techmart_core::validation::validate_shipping;
use techmart_core::{Order, OrderItem, OrderStatus, PaymentInfo, ShippingInfo};
use techmart_db::{Database, OrderDraft};

/// Guarded checkout and order history operations.
#[derive(Clone)]
pub struct OrderFacade {
    db: Database,
    auth: Arc<AuthState>,
    cart: Arc<CartState>,
}

impl OrderFacade {
    pub(crate) fn new(db: Database, auth: Arc<AuthState>, cart: Arc<CartState>) -> Self {
        OrderFacade { db, auth, cart }
    }

    /// Places an order from the current cart.
    ///
    /// Stock reservation and the order insert are one transaction; the cart
    /// is cleared only after the commit succeeds.
    pub async fn place_order(
        &self,
        shipping: ShippingInfo,
        payment: PaymentInfo,
    ) -> Result<(Order, Notice), ApiError> {
        let user = self.auth.current_user().ok_or_else(ApiError::login_required)?;

        let (items, totals) = self.cart.with_cart(|cart| {
            let items: Vec<OrderItem> = cart
                .lines
                .iter()
                .map(|line| OrderItem {
                    product_id: line.id.clone(),
                    name: line.name.clone(),
                    price: line.unit_price,
                    quantity: line.quantity,
                    image: line.image.clone(),
                })
                .collect();
            (items, cart.totals)
        });

        if items.is_empty() {
            return Err(ApiError::validation(messages::FORM_INCOMPLETE));
        }
        validate_shipping(&shipping)
            .map_err(|_| ApiError::validation(messages::FORM_INCOMPLETE))?;

        let draft = OrderDraft {
            user_id: user.uid.clone(),
            user_email: user.email.clone(),
            shipping,
            items,
            subtotal: totals.subtotal,
            tax: totals.tax,
            total: totals.total,
            payment,
        };

        let order = self.db.orders().place(draft).await?;

        // Commit succeeded; now the cart may go
        self.cart.with_cart_mut(|cart| cart.clear());

        info!(order_number = %order.order_number, uid = %user.uid, "Checkout complete");
        Ok((order, Notice::success(messages::ORDER_PLACED)))
    }

    /// The signed-in user's orders, newest first.
    pub async fn my_orders(&self) -> Result<Vec<Order>, ApiError> {
        let user = self.auth.current_user().ok_or_else(ApiError::login_required)?;
        Ok(self.db.orders().list_by_user(&user.uid).await?)
    }

    /// One order by id, visible to its owner or an admin.
    pub async fn order_detail(&self, order_id: &str) -> Result<Order, ApiError> {
        let user = self.auth.current_user().ok_or_else(ApiError::login_required)?;

        let order = self
            .db
            .orders()
            .get_by_id(order_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Order", order_id))?;

        if order.user_id != user.uid && !user.is_admin() {
            // Don't reveal that the order exists
            return Err(ApiError::not_found("Order", order_id));
        }

        Ok(order)
    }

    /// All orders, newest first (admin back-office).
    pub async fn all_orders(&self) -> Result<Vec<Order>, ApiError> {
        self.require_admin()?;
        Ok(self.db.orders().list_all().await?)
    }

    /// Updates an order's fulfilment status (admin).
    pub async fn update_status(
        &self,
        order_id: &str,
        status: OrderStatus,
    ) -> Result<(), ApiError> {
        self.require_admin()?;
        Ok(self.db.orders().update_status(order_id, status).await?)
    }

    fn require_admin(&self) -> Result<(), ApiError> {
        if !self.auth.is_admin() {
            return Err(ApiError::admin_only());
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
