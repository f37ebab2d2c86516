//! # Cart Store
//!
//! The shopping cart: line items plus derived monetary totals.
//!
//! ## Reducer Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Store Operations                                │
//! │                                                                         │
//! │  UI Action                 Store Action             State Change        │
//! │  ─────────                 ────────────             ────────────        │
//! │                                                                         │
//! │  Click "Add" ────────────► add(product) ──────────► new line / qty+1    │
//! │  Click "+" ──────────────► increment_qty(id) ─────► qty+1 (≤ cap)       │
//! │  Click "-" ──────────────► decrement_qty(id) ─────► qty-1 (≥ 1)         │
//! │  Type quantity ──────────► set_qty(id, n) ────────► clamp [1, cap]      │
//! │  Click remove ───────────► remove(id) ────────────► line deleted        │
//! │  Order confirmed ────────► clear() ───────────────► empty, zero totals  │
//! │  Live stock update ──────► sync_stock(id, cap) ───► cap + clamp qty     │
//! │  Live price update ──────► sync_price(id, …) ─────► price snapshot      │
//! │                                                                         │
//! │  EVERY mutation ends with a totals recompute, so CartTotals always      │
//! │  equals the fold of the lines. This layer never calls the backend.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - Lines are unique by product id
//! - For every line: 1 ≤ quantity ≤ stock_cap
//! - `totals` is never stale relative to the last committed mutation

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{Product, TaxRate};

// =============================================================================
// Cart Line
// =============================================================================

/// One product entry in the cart with its own quantity and price snapshot.
///
/// ## Design Notes
/// - Price and image are frozen at add time (snapshot pattern), then only
///   changed by explicit `sync_price` from a live backend read.
/// - `stock_cap` mirrors backend inventory at add/sync time and bounds the
///   quantity from above.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Product id this line refers to.
    pub id: String,

    /// Product name at time of adding (frozen).
    pub name: String,

    /// Price the buyer pays: discounted price if one was running at add time.
    pub unit_price: Money,

    /// Regular price at add time, kept for strike-through display.
    pub original_unit_price: Money,

    /// Thumbnail image reference, if the product had one.
    pub image: Option<String>,

    /// Maximum purchasable quantity (backend stock mirror).
    pub stock_cap: i64,

    /// Quantity in cart. Always within [1, stock_cap].
    pub quantity: i64,
}

impl CartLine {
    /// Creates a line from a product snapshot with quantity 1.
    fn from_product(product: &Product) -> Self {
        CartLine {
            id: product.id.clone(),
            name: product.name.clone(),
            unit_price: product.effective_price(),
            original_unit_price: product.price,
            image: product.thumbnail().map(str::to_string),
            stock_cap: product.stock,
            quantity: 1,
        }
    }

    /// Line total (unit price × quantity).
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }

    /// Whether this line is discounted relative to the regular price.
    #[inline]
    pub fn is_discounted(&self) -> bool {
        self.unit_price < self.original_unit_price
    }
}

// =============================================================================
// Cart Totals
// =============================================================================

/// Derived monetary totals. Recomputed as a pure function of the lines after
/// every mutation; not independently settable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    /// Number of distinct lines.
    pub line_count: usize,

    /// Total quantity across all lines.
    pub total_quantity: i64,

    /// Sum of line totals.
    pub subtotal: Money,

    /// VAT on the subtotal (10%), rounded to the minor unit.
    pub tax: Money,

    /// subtotal + tax.
    pub total: Money,
}

impl CartTotals {
    /// Folds the lines into totals.
    fn compute(lines: &[CartLine], rate: TaxRate) -> Self {
        let subtotal: Money = lines.iter().map(CartLine::line_total).sum();
        let tax = subtotal.tax_for(rate);
        CartTotals {
            line_count: lines.len(),
            total_quantity: lines.iter().map(|l| l.quantity).sum(),
            subtotal,
            tax,
            total: subtotal + tax,
        }
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The cart store: lines plus always-fresh derived totals.
///
/// ## No Side Effects
/// Every action here is a pure state mutation. Stock checks with user
/// feedback live in the cart facade; backend writes never originate here.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    /// Items in the cart, unique by product id.
    pub lines: Vec<CartLine>,

    /// Derived totals; equals `fold(lines)` at all times.
    pub totals: CartTotals,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart::default()
    }

    /// Adds a product to the cart.
    ///
    /// ## Behavior
    /// - Existing line: quantity +1, only while below the stock cap (else no-op)
    /// - New line: quantity 1 with a fresh price/discount/stock snapshot
    /// - Sold-out products (`stock ≤ 0`) never produce a line
    pub fn add(&mut self, product: &Product) {
        if let Some(line) = self.find_mut(&product.id) {
            if line.quantity < line.stock_cap {
                line.quantity += 1;
                self.recompute();
            }
            return;
        }

        if product.stock <= 0 {
            return;
        }

        self.lines.push(CartLine::from_product(product));
        self.recompute();
    }

    /// Increments a line's quantity, clamped at the stock cap.
    pub fn increment_qty(&mut self, id: &str) {
        if let Some(line) = self.find_mut(id) {
            if line.quantity < line.stock_cap {
                line.quantity += 1;
                self.recompute();
            }
        }
    }

    /// Decrements a line's quantity, floored at 1.
    ///
    /// Going below 1 is a no-op: removal is a separate explicit action.
    pub fn decrement_qty(&mut self, id: &str) {
        if let Some(line) = self.find_mut(id) {
            if line.quantity > 1 {
                line.quantity -= 1;
                self.recompute();
            }
        }
    }

    /// Sets a line's quantity, clamped into [1, stock_cap].
    pub fn set_qty(&mut self, id: &str, quantity: i64) {
        if let Some(line) = self.find_mut(id) {
            line.quantity = quantity.clamp(1, line.stock_cap.max(1));
            self.recompute();
        }
    }

    /// Removes a line by product id.
    pub fn remove(&mut self, id: &str) {
        let before = self.lines.len();
        self.lines.retain(|l| l.id != id);
        if self.lines.len() != before {
            self.recompute();
        }
    }

    /// Clears all lines and zeroes the totals.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.totals = CartTotals::default();
    }

    /// Updates a line's stock cap from a live backend read.
    ///
    /// If the current quantity exceeds the new cap, the quantity is clamped
    /// down and totals recomputed. A cap of zero means the product sold out
    /// under us; the line is dropped, since no quantity could satisfy
    /// `1 ≤ quantity ≤ stock_cap`.
    pub fn sync_stock(&mut self, id: &str, new_cap: i64) {
        if new_cap <= 0 {
            self.remove(id);
            return;
        }
        if let Some(line) = self.find_mut(id) {
            line.stock_cap = new_cap;
            if line.quantity > new_cap {
                line.quantity = new_cap;
                self.recompute();
            }
        }
    }

    /// Updates a line's price snapshot from a live backend read.
    pub fn sync_price(&mut self, id: &str, price: Money, original_price: Money) {
        if let Some(line) = self.find_mut(id) {
            line.unit_price = price;
            line.original_unit_price = original_price;
            self.recompute();
        }
    }

    // -------------------------------------------------------------------------
    // Read helpers
    // -------------------------------------------------------------------------

    /// Checks if a product is in the cart.
    pub fn contains(&self, id: &str) -> bool {
        self.lines.iter().any(|l| l.id == id)
    }

    /// Quantity of a product in the cart, 0 if absent.
    pub fn quantity_of(&self, id: &str) -> i64 {
        self.lines
            .iter()
            .find(|l| l.id == id)
            .map_or(0, |l| l.quantity)
    }

    /// Looks up a line by product id.
    pub fn line(&self, id: &str) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.id == id)
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    fn find_mut(&mut self, id: &str) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|l| l.id == id)
    }

    fn recompute(&mut self) {
        self.totals = CartTotals::compute(&self.lines, TaxRate::default());
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Category;
    use chrono::Utc;

    fn product(id: &str, price: i64, stock: i64) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Product {}", id),
            description: None,
            brand: None,
            category: Category::Laptop,
            price: Money::from_minor(price),
            discount_price: None,
            images: vec!["img-0.jpg".to_string()],
            stock,
            rating: 0.0,
            sale_count: 0,
            featured: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_add_twice_matches_totals_example() {
        // add P(price=100000, cap=3) twice → qty 2, 200000 / 20000 / 220000
        let mut cart = Cart::new();
        let p = product("P", 100_000, 3);

        cart.add(&p);
        cart.add(&p);

        assert_eq!(cart.quantity_of("P"), 2);
        assert_eq!(cart.totals.subtotal.minor(), 200_000);
        assert_eq!(cart.totals.tax.minor(), 20_000);
        assert_eq!(cart.totals.total.minor(), 220_000);
    }

    #[test]
    fn test_add_at_cap_is_noop() {
        let mut cart = Cart::new();
        let p = product("P", 1000, 2);

        cart.add(&p);
        cart.add(&p);
        cart.add(&p); // at cap, no-op

        assert_eq!(cart.quantity_of("P"), 2);
        assert_eq!(cart.totals.subtotal.minor(), 2000);
    }

    #[test]
    fn test_add_sold_out_never_creates_line() {
        let mut cart = Cart::new();
        let p = product("P", 1000, 0);

        cart.add(&p);

        assert!(cart.is_empty());
        assert_eq!(cart.totals, CartTotals::default());
    }

    #[test]
    fn test_add_snapshots_discount_price() {
        let mut cart = Cart::new();
        let mut p = product("P", 100_000, 5);
        p.discount_price = Some(Money::from_minor(90_000));

        cart.add(&p);

        let line = cart.line("P").unwrap();
        assert_eq!(line.unit_price.minor(), 90_000);
        assert_eq!(line.original_unit_price.minor(), 100_000);
        assert!(line.is_discounted());
        assert_eq!(line.image.as_deref(), Some("img-0.jpg"));
    }

    #[test]
    fn test_increment_decrement_clamping() {
        let mut cart = Cart::new();
        let p = product("P", 1000, 2);
        cart.add(&p);

        cart.increment_qty("P");
        cart.increment_qty("P"); // clamped at cap 2
        assert_eq!(cart.quantity_of("P"), 2);

        cart.decrement_qty("P");
        cart.decrement_qty("P"); // floored at 1, removal is explicit
        assert_eq!(cart.quantity_of("P"), 1);
    }

    #[test]
    fn test_set_qty_clamps_into_range() {
        let mut cart = Cart::new();
        let p = product("P", 1000, 5);
        cart.add(&p);

        cart.set_qty("P", 99);
        assert_eq!(cart.quantity_of("P"), 5);

        cart.set_qty("P", 0);
        assert_eq!(cart.quantity_of("P"), 1);

        cart.set_qty("P", 3);
        assert_eq!(cart.quantity_of("P"), 3);
        assert_eq!(cart.totals.subtotal.minor(), 3000);
    }

    #[test]
    fn test_remove_and_clear_zero_totals() {
        let mut cart = Cart::new();
        cart.add(&product("A", 1000, 5));
        cart.add(&product("B", 2000, 5));

        cart.remove("A");
        assert!(!cart.contains("A"));
        assert_eq!(cart.totals.subtotal.minor(), 2000);

        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.totals.subtotal, Money::zero());
        assert_eq!(cart.totals.tax, Money::zero());
        assert_eq!(cart.totals.total, Money::zero());
    }

    #[test]
    fn test_sync_stock_clamps_quantity_down() {
        let mut cart = Cart::new();
        let p = product("P", 1000, 5);
        cart.add(&p);
        cart.set_qty("P", 5);

        cart.sync_stock("P", 2);

        let line = cart.line("P").unwrap();
        assert_eq!(line.stock_cap, 2);
        assert_eq!(line.quantity, 2);
        assert_eq!(cart.totals.subtotal.minor(), 2000);

        // Sold out under us: the line cannot satisfy the quantity invariant
        cart.sync_stock("P", 0);
        assert!(!cart.contains("P"));
        assert_eq!(cart.totals.subtotal, Money::zero());
    }

    #[test]
    fn test_sync_price_recomputes_totals() {
        let mut cart = Cart::new();
        cart.add(&product("P", 1000, 5));
        cart.set_qty("P", 2);

        cart.sync_price("P", Money::from_minor(1500), Money::from_minor(2000));

        assert_eq!(cart.totals.subtotal.minor(), 3000);
        let line = cart.line("P").unwrap();
        assert!(line.is_discounted());
    }

    #[test]
    fn test_invariant_under_action_sequences() {
        // Arbitrary-ish sequence of actions must keep 1 ≤ qty ≤ cap everywhere.
        let mut cart = Cart::new();
        let a = product("A", 1000, 3);
        let b = product("B", 2500, 1);

        cart.add(&a);
        cart.add(&b);
        cart.increment_qty("A");
        cart.increment_qty("B"); // cap 1, no-op
        cart.set_qty("A", 100);
        cart.decrement_qty("B"); // floor 1, no-op
        cart.sync_stock("A", 2);
        cart.add(&a); // at new cap, no-op
        cart.set_qty("B", -4);

        for line in &cart.lines {
            assert!(line.quantity >= 1, "{} below 1", line.id);
            assert!(line.quantity <= line.stock_cap, "{} above cap", line.id);
        }

        // Totals law: total = subtotal + 10% tax, exactly
        let expected: Money = cart.lines.iter().map(CartLine::line_total).sum();
        assert_eq!(cart.totals.subtotal, expected);
        assert_eq!(
            cart.totals.total,
            cart.totals.subtotal + cart.totals.tax
        );
    }
}
