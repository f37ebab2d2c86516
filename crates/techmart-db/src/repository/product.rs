//! # Product Repository
//!
//! Collection access for catalog products.
//!
//! ## Query Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                 What the Store Does vs the Client                       │
//! │                                                                         │
//! │  STORE (this repository)              CLIENT (techmart-core::query)     │
//! │  ───────────────────────              ──────────────────────────────    │
//! │  WHERE category = ?                   substring search across           │
//! │  ORDER BY <single field>              name/description/brand            │
//! │  LIMIT ?                              offset pagination                 │
//! │                                                                         │
//! │  The split mirrors a managed document backend: the store only offers   │
//! │  equality filters and one ordering field per read.                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use techmart_core::{Category, Money, Product, SortKey};

// =============================================================================
// Row Mapping
// =============================================================================

/// Raw product row as stored. JSON and enum columns are decoded in
/// [`ProductRow::into_product`].
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ProductRow {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub brand: Option<String>,
    pub category: String,
    pub price: i64,
    pub discount_price: Option<i64>,
    pub images: String,
    pub stock: i64,
    pub rating: f64,
    pub sale_count: i64,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProductRow {
    pub(crate) fn into_product(self) -> DbResult<Product> {
        let category = Category::parse(&self.category)
            .ok_or_else(|| DbError::corrupt("Product", &self.id, "unknown category"))?;

        let images: Vec<String> = serde_json::from_str(&self.images)
            .map_err(|e| DbError::corrupt("Product", &self.id, e.to_string()))?;

        Ok(Product {
            id: self.id,
            name: self.name,
            description: self.description,
            brand: self.brand,
            category,
            price: Money::from_minor(self.price),
            discount_price: self.discount_price.map(Money::from_minor),
            images,
            stock: self.stock,
            rating: self.rating,
            sale_count: self.sale_count,
            featured: self.featured,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

const PRODUCT_COLUMNS: &str = "id, name, description, brand, category, price, discount_price, \
     images, stock, rating, sale_count, featured, created_at, updated_at";

// =============================================================================
// Repository
// =============================================================================

/// Repository for catalog product operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// let laptops = repo.list(Some(Category::Laptop), SortKey::PriceAsc).await?;
/// let product = repo.get_by_id("uuid-here").await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists products with an optional category filter and a single
    /// ordering field.
    ///
    /// The ORDER BY column comes from [`SortKey::order_field`], a fixed
    /// table of column names; no caller input reaches the SQL text.
    pub async fn list(
        &self,
        category: Option<Category>,
        sort: SortKey,
    ) -> DbResult<Vec<Product>> {
        debug!(category = ?category, sort = %sort.as_str(), "Listing products");

        let (field, ascending) = sort.order_field();
        let direction = if ascending { "ASC" } else { "DESC" };

        let rows: Vec<ProductRow> = match category {
            Some(category) => {
                let sql = format!(
                    "SELECT {PRODUCT_COLUMNS} FROM products \
                     WHERE category = ?1 ORDER BY {field} {direction}"
                );
                sqlx::query_as(&sql)
                    .bind(category.as_str())
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let sql = format!(
                    "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY {field} {direction}"
                );
                sqlx::query_as(&sql).fetch_all(&self.pool).await?
            }
        };

        debug!(count = rows.len(), "Product list read");
        rows.into_iter().map(ProductRow::into_product).collect()
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1");

        let row: Option<ProductRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(ProductRow::into_product).transpose()
    }

    /// Lists featured products, newest first.
    ///
    /// Backs the home page strip; `limit` is the display count.
    pub async fn featured(&self, limit: u32) -> DbResult<Vec<Product>> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE featured = 1 ORDER BY created_at DESC LIMIT ?1"
        );

        let rows: Vec<ProductRow> = sqlx::query_as(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(ProductRow::into_product).collect()
    }

    /// Inserts a new product.
    ///
    /// ## Arguments
    /// * `product` - Product to insert (id should be generated beforehand)
    pub async fn insert(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, name = %product.name, "Inserting product");

        let images = serde_json::to_string(&product.images)
            .map_err(|e| DbError::Internal(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO products (
                id, name, description, brand, category,
                price, discount_price, images, stock,
                rating, sale_count, featured, created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5,
                ?6, ?7, ?8, ?9,
                ?10, ?11, ?12, ?13, ?14
            )
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(&product.brand)
        .bind(product.category.as_str())
        .bind(product.price.minor())
        .bind(product.discount_price.map(|m| m.minor()))
        .bind(images)
        .bind(product.stock)
        .bind(product.rating)
        .bind(product.sale_count)
        .bind(product.featured)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Updates an existing product.
    ///
    /// ## Returns
    /// * `Ok(())` - Update successful
    /// * `Err(DbError::NotFound)` - Product doesn't exist
    pub async fn update(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, "Updating product");

        let images = serde_json::to_string(&product.images)
            .map_err(|e| DbError::Internal(e.to_string()))?;
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE products SET
                name = ?2,
                description = ?3,
                brand = ?4,
                category = ?5,
                price = ?6,
                discount_price = ?7,
                images = ?8,
                stock = ?9,
                rating = ?10,
                sale_count = ?11,
                featured = ?12,
                updated_at = ?13
            WHERE id = ?1
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(&product.brand)
        .bind(product.category.as_str())
        .bind(product.price.minor())
        .bind(product.discount_price.map(|m| m.minor()))
        .bind(images)
        .bind(product.stock)
        .bind(product.rating)
        .bind(product.sale_count)
        .bind(product.featured)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", &product.id));
        }

        Ok(())
    }

    /// Deletes a product.
    ///
    /// Orders keep their own snapshots of line items, so history survives
    /// the delete.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Sets the absolute stock level (admin restock).
    pub async fn set_stock(&self, id: &str, stock: i64) -> DbResult<()> {
        debug!(id = %id, stock = %stock, "Setting stock");

        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE products SET stock = ?2, updated_at = ?3 WHERE id = ?1",
        )
        .bind(id)
        .bind(stock)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Counts total products (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Helper to generate a new product ID.
pub fn generate_product_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    fn product(id: &str, name: &str, category: Category, price: i64, stock: i64) -> Product {
        Product {
            id: id.to_string(),
            name: name.to_string(),
            description: None,
            brand: None,
            category,
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

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = test_db().await;
        let repo = db.products();

        let p = product("p-1", "MacBook Pro", Category::Laptop, 5_000_000, 3);
        repo.insert(&p).await.unwrap();

        let read = repo.get_by_id("p-1").await.unwrap().unwrap();
        assert_eq!(read.name, "MacBook Pro");
        assert_eq!(read.price.minor(), 5_000_000);
        assert_eq!(read.category, Category::Laptop);
        assert_eq!(read.stock, 3);
    }

    #[tokio::test]
    async fn test_get_missing_is_none() {
        let db = test_db().await;
        assert!(db.products().get_by_id("ghost").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_category_filter_and_order() {
        let db = test_db().await;
        let repo = db.products();

        repo.insert(&product("a", "A", Category::Laptop, 300, 1))
            .await
            .unwrap();
        repo.insert(&product("b", "B", Category::Laptop, 100, 1))
            .await
            .unwrap();
        repo.insert(&product("c", "C", Category::Mouse, 200, 1))
            .await
            .unwrap();

        let laptops = repo
            .list(Some(Category::Laptop), SortKey::PriceAsc)
            .await
            .unwrap();
        assert_eq!(laptops.len(), 2);
        assert_eq!(laptops[0].id, "b");
        assert_eq!(laptops[1].id, "a");

        let all = repo.list(None, SortKey::PriceDesc).await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].id, "a");
    }

    #[tokio::test]
    async fn test_featured_limit() {
        let db = test_db().await;
        let repo = db.products();

        for i in 0..5 {
            let mut p = product(&format!("p-{i}"), "P", Category::Gpu, 100, 1);
            p.featured = i % 2 == 0;
            repo.insert(&p).await.unwrap();
        }

        let featured = repo.featured(2).await.unwrap();
        assert_eq!(featured.len(), 2);
        assert!(featured.iter().all(|p| p.featured));
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let db = test_db().await;
        let repo = db.products();

        let mut p = product("p-1", "Old name", Category::Ram, 100, 1);
        repo.insert(&p).await.unwrap();

        p.name = "New name".to_string();
        p.discount_price = Some(Money::from_minor(80));
        repo.update(&p).await.unwrap();

        let read = repo.get_by_id("p-1").await.unwrap().unwrap();
        assert_eq!(read.name, "New name");
        assert_eq!(read.discount_price, Some(Money::from_minor(80)));

        repo.delete("p-1").await.unwrap();
        assert!(repo.get_by_id("p-1").await.unwrap().is_none());

        let err = repo.delete("p-1").await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
