//! # Order Repository
//!
//! Transactional order placement and order history reads.
//!
//! ## Placement Transaction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Order Placement                                      │
//! │                                                                         │
//! │  BEGIN TRANSACTION                                                     │
//! │       │                                                                 │
//! │       ▼  for each line item                                             │
//! │  UPDATE products                                                       │
//! │    SET stock = stock - qty, sale_count = sale_count + qty              │
//! │    WHERE id = ? AND stock >= qty                                       │
//! │       │                                                                 │
//! │       ├── 0 rows? → InsufficientStock / NotFound → ROLLBACK            │
//! │       ▼                                                                 │
//! │  INSERT INTO orders (...)                                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  COMMIT                                                                │
//! │                                                                         │
//! │  Either every line is reserved and the order exists, or nothing        │
//! │  happened. The caller clears the cart only after a successful commit.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use techmart_core::{
    Money, Order, OrderItem, OrderStatus, PaymentInfo, PaymentStatus, ShippingInfo,
};

// =============================================================================
// Drafts & Rows
// =============================================================================

/// Everything the caller supplies for a new order. The repository fills in
/// the id, order number, statuses and timestamps.
#[derive(Debug, Clone)]
pub struct OrderDraft {
    pub user_id: String,
    pub user_email: String,
    pub shipping: ShippingInfo,
    pub items: Vec<OrderItem>,
    pub subtotal: Money,
    pub tax: Money,
    pub total: Money,
    pub payment: PaymentInfo,
}

/// Raw order row as stored. JSON and enum columns are decoded in
/// [`OrderRow::into_order`].
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: String,
    order_number: String,
    user_id: String,
    user_email: String,
    shipping: String,
    items: String,
    subtotal: i64,
    tax: i64,
    total: i64,
    payment: String,
    status: String,
    payment_status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl OrderRow {
    fn into_order(self) -> DbResult<Order> {
        let corrupt = |reason: String| DbError::corrupt("Order", &self.id, reason);

        let shipping: ShippingInfo =
            serde_json::from_str(&self.shipping).map_err(|e| corrupt(e.to_string()))?;
        let items: Vec<OrderItem> =
            serde_json::from_str(&self.items).map_err(|e| corrupt(e.to_string()))?;
        let payment: PaymentInfo =
            serde_json::from_str(&self.payment).map_err(|e| corrupt(e.to_string()))?;

        let status = OrderStatus::parse(&self.status)
            .ok_or_else(|| corrupt("unknown status".to_string()))?;
        let payment_status = PaymentStatus::parse(&self.payment_status)
            .ok_or_else(|| corrupt("unknown payment status".to_string()))?;

        Ok(Order {
            id: self.id,
            order_number: self.order_number,
            user_id: self.user_id,
            user_email: self.user_email,
            shipping,
            items,
            subtotal: Money::from_minor(self.subtotal),
            tax: Money::from_minor(self.tax),
            total: Money::from_minor(self.total),
            payment,
            status,
            payment_status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

const ORDER_COLUMNS: &str = "id, order_number, user_id, user_email, shipping, items, \
     subtotal, tax, total, payment, status, payment_status, created_at, updated_at";

/// Generates a human-readable order number: `ORD-YYYYMMDD-XXXXXX`.
///
/// The suffix comes from a fresh UUID, so numbers are unique without a
/// counter table.
pub fn generate_order_number(now: DateTime<Utc>) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!(
        "ORD-{}-{}",
        now.format("%Y%m%d"),
        suffix[..6].to_uppercase()
    )
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for order operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Places an order: reserves stock for every line and inserts the
    /// order document in one transaction.
    ///
    /// ## Atomicity
    /// Each line runs a conditional decrement (`WHERE stock >= qty`).
    /// If any line cannot be reserved the transaction rolls back, leaving
    /// both stock and the orders collection untouched. Sale counts are
    /// bumped in the same statement so the "popular" ordering can never
    /// disagree with stock history.
    ///
    /// ## Returns
    /// * `Ok(Order)` - The stored order with generated fields
    /// * `Err(DbError::InsufficientStock)` - A line exceeded remaining stock
    /// * `Err(DbError::NotFound)` - A line referenced a deleted product
    pub async fn place(&self, draft: OrderDraft) -> DbResult<Order> {
        let now = Utc::now();
        let id = Uuid::new_v4().to_string();
        let order_number = generate_order_number(now);

        debug!(
            order_number = %order_number,
            user_id = %draft.user_id,
            lines = draft.items.len(),
            "Placing order"
        );

        let mut tx = self.pool.begin().await?;

        for item in &draft.items {
            reserve_stock(&mut tx, &item.product_id, item.quantity).await?;
        }

        let shipping = serde_json::to_string(&draft.shipping)
            .map_err(|e| DbError::Internal(e.to_string()))?;
        let items = serde_json::to_string(&draft.items)
            .map_err(|e| DbError::Internal(e.to_string()))?;
        let payment = serde_json::to_string(&draft.payment)
            .map_err(|e| DbError::Internal(e.to_string()))?;

        let order = Order {
            id: id.clone(),
            order_number,
            user_id: draft.user_id,
            user_email: draft.user_email,
            shipping: draft.shipping,
            items: draft.items,
            subtotal: draft.subtotal,
            tax: draft.tax,
            total: draft.total,
            payment: draft.payment,
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Completed,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO orders (
                id, order_number, user_id, user_email, shipping, items,
                subtotal, tax, total, payment, status, payment_status,
                created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6,
                ?7, ?8, ?9, ?10, ?11, ?12,
                ?13, ?14
            )
            "#,
        )
        .bind(&order.id)
        .bind(&order.order_number)
        .bind(&order.user_id)
        .bind(&order.user_email)
        .bind(shipping)
        .bind(items)
        .bind(order.subtotal.minor())
        .bind(order.tax.minor())
        .bind(order.total.minor())
        .bind(payment)
        .bind(order.status.as_str())
        .bind(order.payment_status.as_str())
        .bind(order.created_at)
        .bind(order.updated_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(order_number = %order.order_number, total = %order.total, "Order placed");
        Ok(order)
    }

    /// Gets an order by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Order>> {
        let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?1");

        let row: Option<OrderRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(OrderRow::into_order).transpose()
    }

    /// Lists one user's orders, newest first.
    pub async fn list_by_user(&self, user_id: &str) -> DbResult<Vec<Order>> {
        let sql = format!(
            "SELECT {ORDER_COLUMNS} FROM orders \
             WHERE user_id = ?1 ORDER BY created_at DESC"
        );

        let rows: Vec<OrderRow> = sqlx::query_as(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(OrderRow::into_order).collect()
    }

    /// Lists all orders, newest first (admin back-office).
    pub async fn list_all(&self) -> DbResult<Vec<Order>> {
        let sql = format!("SELECT {ORDER_COLUMNS} FROM orders ORDER BY created_at DESC");

        let rows: Vec<OrderRow> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;

        rows.into_iter().map(OrderRow::into_order).collect()
    }

    /// Updates the fulfilment status of an order.
    pub async fn update_status(&self, id: &str, status: OrderStatus) -> DbResult<()> {
        debug!(id = %id, status = %status.as_str(), "Updating order status");

        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE orders SET status = ?2, updated_at = ?3 WHERE id = ?1",
        )
        .bind(id)
        .bind(status.as_str())
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Order", id));
        }

        Ok(())
    }

    /// Counts total orders (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Conditional stock reservation for one line, inside the placement
/// transaction.
///
/// The `stock >= qty` guard makes over-selling impossible even under
/// concurrent placements: the second transaction's decrement simply
/// matches no row.
async fn reserve_stock(
    tx: &mut Transaction<'_, Sqlite>,
    product_id: &str,
    quantity: i64,
) -> DbResult<()> {
    let now = Utc::now();

    let result = sqlx::query(
        r#"
        UPDATE products
        SET stock = stock - ?2,
            sale_count = sale_count + ?2,
            updated_at = ?3
        WHERE id = ?1 AND stock >= ?2
        "#,
    )
    .bind(product_id)
    .bind(quantity)
    .bind(now)
    .execute(&mut **tx)
    .await?;

    if result.rows_affected() == 0 {
        // Distinguish a missing product from an out-of-stock one
        let available: Option<i64> =
            sqlx::query_scalar("SELECT stock FROM products WHERE id = ?1")
                .bind(product_id)
                .fetch_optional(&mut **tx)
                .await?;

        return match available {
            Some(available) => Err(DbError::InsufficientStock {
                product_id: product_id.to_string(),
                available,
                requested: quantity,
            }),
            None => Err(DbError::not_found("Product", product_id)),
        };
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use techmart_core::{Category, PaymentMethod, Product};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn seed_product(id: &str, price: i64, stock: i64) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Product {id}"),
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

    fn shipping() -> ShippingInfo {
        ShippingInfo {
            name: "Бат".to_string(),
            email: "bat@example.mn".to_string(),
            phone: "99112233".to_string(),
            address: "Peace Avenue 17".to_string(),
            city: "Ulaanbaatar".to_string(),
            district: "Sükhbaatar".to_string(),
            apartment: None,
        }
    }

    fn draft(user: &str, items: Vec<OrderItem>) -> OrderDraft {
        let subtotal: Money = items.iter().map(OrderItem::line_total).sum();
        let tax = subtotal.tax_for(Default::default());
        OrderDraft {
            user_id: user.to_string(),
            user_email: "bat@example.mn".to_string(),
            shipping: shipping(),
            items,
            subtotal,
            tax,
            total: subtotal + tax,
            payment: PaymentInfo {
                method: PaymentMethod::Card,
                card_last4: "4242".to_string(),
            },
        }
    }

    fn item(product_id: &str, price: i64, qty: i64) -> OrderItem {
        OrderItem {
            product_id: product_id.to_string(),
            name: format!("Product {product_id}"),
            price: Money::from_minor(price),
            quantity: qty,
            image: None,
        }
    }

    async fn seed_user(db: &Database, uid: &str) {
        sqlx::query(
            "INSERT INTO users (uid, email, password_hash, name, created_at, updated_at) \
             VALUES (?1, ?2, 'x', 'Бат', ?3, ?3)",
        )
        .bind(uid)
        .bind(format!("{uid}@example.mn"))
        .bind(Utc::now())
        .execute(db.pool())
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_place_decrements_stock_and_bumps_sales() {
        let db = test_db().await;
        seed_user(&db, "u-1").await;
        db.products().insert(&seed_product("p-1", 100_000, 3)).await.unwrap();

        let order = db
            .orders()
            .place(draft("u-1", vec![item("p-1", 100_000, 2)]))
            .await
            .unwrap();

        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.subtotal.minor(), 200_000);
        assert_eq!(order.tax.minor(), 20_000);
        assert_eq!(order.total.minor(), 220_000);
        assert!(order.order_number.starts_with("ORD-"));

        let p = db.products().get_by_id("p-1").await.unwrap().unwrap();
        assert_eq!(p.stock, 1);
        assert_eq!(p.sale_count, 2);
    }

    #[tokio::test]
    async fn test_place_rolls_back_on_insufficient_stock() {
        let db = test_db().await;
        seed_user(&db, "u-1").await;
        db.products().insert(&seed_product("p-1", 100_000, 5)).await.unwrap();
        db.products().insert(&seed_product("p-2", 50_000, 1)).await.unwrap();

        let err = db
            .orders()
            .place(draft(
                "u-1",
                vec![item("p-1", 100_000, 2), item("p-2", 50_000, 3)],
            ))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DbError::InsufficientStock { ref product_id, available: 1, requested: 3 }
                if product_id == "p-2"
        ));

        // The first line's decrement must have been rolled back
        let p1 = db.products().get_by_id("p-1").await.unwrap().unwrap();
        assert_eq!(p1.stock, 5);
        assert_eq!(p1.sale_count, 0);
        assert_eq!(db.orders().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_place_missing_product_is_not_found() {
        let db = test_db().await;
        seed_user(&db, "u-1").await;

        let err = db
            .orders()
            .place(draft("u-1", vec![item("ghost", 100, 1)]))
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_history_newest_first_and_detail() {
        let db = test_db().await;
        seed_user(&db, "u-1").await;
        seed_user(&db, "u-2").await;
        db.products().insert(&seed_product("p-1", 100, 50)).await.unwrap();

        let first = db
            .orders()
            .place(draft("u-1", vec![item("p-1", 100, 1)]))
            .await
            .unwrap();
        let second = db
            .orders()
            .place(draft("u-1", vec![item("p-1", 100, 2)]))
            .await
            .unwrap();
        db.orders()
            .place(draft("u-2", vec![item("p-1", 100, 1)]))
            .await
            .unwrap();

        let mine = db.orders().list_by_user("u-1").await.unwrap();
        assert_eq!(mine.len(), 2);
        assert!(mine[0].created_at >= mine[1].created_at);

        let detail = db.orders().get_by_id(&first.id).await.unwrap().unwrap();
        assert_eq!(detail.order_number, first.order_number);
        assert_eq!(detail.items.len(), 1);

        assert_eq!(db.orders().list_all().await.unwrap().len(), 3);

        db.orders()
            .update_status(&second.id, OrderStatus::Shipped)
            .await
            .unwrap();
        let shipped = db.orders().get_by_id(&second.id).await.unwrap().unwrap();
        assert_eq!(shipped.status, OrderStatus::Shipped);
    }
}
