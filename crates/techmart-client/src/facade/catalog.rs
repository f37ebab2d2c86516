//! # Catalog Facade
//!
//! Product reads for the storefront plus the admin catalog surface.
//!
//! ## Request Generation Guard
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Stale Response Handling                              │
//! │                                                                         │
//! │  Every fetch_page call takes a ticket from a shared counter.           │
//! │                                                                         │
//! │  fetch A  ── ticket 1 ──► backend (slow) ──► counter is 2 ──► stale    │
//! │  fetch B  ── ticket 2 ──► backend        ──► counter is 2 ──► fresh    │
//! │                                                                         │
//! │  A stale result is reported as PageFetch::Superseded so the caller     │
//! │  drops it instead of overwriting the newer page. Whatever order the    │
//! │  backend answers in, only the latest request's page is Fresh.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ApiError;
use crate::state::AuthState;
use techmart_core::query::{apply_search, paginate, ProductPage, ProductQuery};
use techmart_core::{Category, Money, Product, FEATURED_LIMIT};
use techmart_db::repository::product::generate_product_id;
use techmart_db::Database;

/// Outcome of a page fetch under the generation guard.
#[derive(Debug, Clone)]
pub enum PageFetch {
    /// This was the latest request when the backend answered.
    Fresh(ProductPage),

    /// A newer fetch was issued while this one was in flight. Discard.
    Superseded,
}

impl PageFetch {
    /// The page, if this fetch was not superseded.
    pub fn into_page(self) -> Option<ProductPage> {
        match self {
            PageFetch::Fresh(page) => Some(page),
            PageFetch::Superseded => None,
        }
    }
}

/// Input for creating a catalog product (admin).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    pub name: String,
    pub description: Option<String>,
    pub brand: Option<String>,
    pub category: Category,
    pub price: Money,
    pub discount_price: Option<Money>,
    pub images: Vec<String>,
    pub stock: i64,
    pub featured: bool,
}

/// Catalog reads and the admin product surface.
#[derive(Clone)]
pub struct CatalogFacade {
    db: Database,
    auth: Arc<AuthState>,
    generation: Arc<AtomicU64>,
}

impl CatalogFacade {
    pub(crate) fn new(db: Database, auth: Arc<AuthState>, generation: Arc<AtomicU64>) -> Self {
        CatalogFacade {
            db,
            auth,
            generation,
        }
    }

    // =========================================================================
    // Storefront reads
    // =========================================================================

    /// Fetches one catalog page: backend category/sort read, then search
    /// and pagination on top.
    ///
    /// Returns [`PageFetch::Superseded`] when a newer fetch started while
    /// this one was waiting on the backend.
    pub async fn fetch_page(&self, query: &ProductQuery) -> Result<PageFetch, ApiError> {
        let ticket = self.next_ticket();
        self.fetch_with_ticket(query, ticket).await
    }

    pub(crate) fn next_ticket(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub(crate) async fn fetch_with_ticket(
        &self,
        query: &ProductQuery,
        ticket: u64,
    ) -> Result<PageFetch, ApiError> {
        debug!(ticket, page = query.effective_page(), "fetch_page");

        let products = self.db.products().list(query.category, query.sort).await?;

        let products = match query.search.as_deref() {
            Some(term) => apply_search(products, term),
            None => products,
        };
        let page = paginate(products, query.effective_page(), query.effective_page_size());

        if self.generation.load(Ordering::SeqCst) != ticket {
            debug!(ticket, "Page fetch superseded, dropping result");
            return Ok(PageFetch::Superseded);
        }

        Ok(PageFetch::Fresh(page))
    }

    /// Fetches a single product, erroring when it does not exist.
    pub async fn get_product(&self, id: &str) -> Result<Product, ApiError> {
        self.db
            .products()
            .get_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found("Product", id))
    }

    /// Featured products for the home strip, newest first.
    pub async fn featured(&self) -> Result<Vec<Product>, ApiError> {
        Ok(self.db.products().featured(FEATURED_LIMIT).await?)
    }

    // =========================================================================
    // Admin surface
    // =========================================================================

    fn require_admin(&self) -> Result<(), ApiError> {
        if !self.auth.is_admin() {
            return Err(ApiError::admin_only());
        }
        Ok(())
    }

    /// Creates a product (admin only). The id and timestamps are assigned
    /// here; the returned product is the stored document.
    pub async fn create_product(&self, draft: ProductDraft) -> Result<Product, ApiError> {
        self.require_admin()?;

        let now = Utc::now();
        let product = Product {
            id: generate_product_id(),
            name: draft.name,
            description: draft.description,
            brand: draft.brand,
            category: draft.category,
            price: draft.price,
            discount_price: draft.discount_price,
            images: draft.images,
            stock: draft.stock,
            rating: 0.0,
            sale_count: 0,
            featured: draft.featured,
            created_at: now,
            updated_at: now,
        };

        self.db.products().insert(&product).await?;
        Ok(product)
    }

    /// Replaces a product document (admin only).
    pub async fn update_product(&self, product: &Product) -> Result<(), ApiError> {
        self.require_admin()?;
        Ok(self.db.products().update(product).await?)
    }

    /// Deletes a product (admin only). Order history keeps its own line
    /// snapshots and is unaffected.
    pub async fn delete_product(&self, id: &str) -> Result<(), ApiError> {
        self.require_admin()?;
        Ok(self.db.products().delete(id).await?)
    }

    /// Sets an absolute stock level (admin restock).
    pub async fn set_stock(&self, id: &str, stock: i64) -> Result<(), ApiError> {
        self.require_admin()?;
        if stock < 0 {
            return Err(ApiError::validation("stock cannot be negative"));
        }
        Ok(self.db.products().set_stock(id, stock).await?)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::state::AuthStage;
    use techmart_core::{SortKey, UserProfile, UserRole};
    use techmart_db::DbConfig;

    fn product(id: &str, name: &str, category: Category, price: i64) -> Product {
        Product {
            id: id.to_string(),
            name: name.to_string(),
            description: None,
            brand: None,
            category,
            price: Money::from_minor(price),
            discount_price: None,
            images: vec![],
            stock: 10,
            rating: 0.0,
            sale_count: 0,
            featured: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn admin_profile() -> UserProfile {
        UserProfile {
            uid: "admin-1".to_string(),
            email: "admin@techmart.mn".to_string(),
            name: "Админ".to_string(),
            role: UserRole::Admin,
            avatar: None,
            phone: None,
            address: None,
            wishlist: vec![],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    async fn facade() -> CatalogFacade {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        CatalogFacade::new(db, Arc::new(AuthState::new()), Arc::new(AtomicU64::new(0)))
    }

    #[tokio::test]
    async fn test_fetch_page_filters_searches_paginates() {
        let f = facade().await;
        for i in 0..20 {
            f.db.products()
                .insert(&product(
                    &format!("p-{i}"),
                    &format!("Laptop {i}"),
                    Category::Laptop,
                    (20 - i) * 10_000,
                ))
                .await
                .unwrap();
        }
        f.db.products()
            .insert(&product("m-1", "Mouse", Category::Mouse, 500))
            .await
            .unwrap();

        let query = ProductQuery {
            category: Some(Category::Laptop),
            sort: SortKey::PriceAsc,
            page: 1,
            page_size: 12,
            ..ProductQuery::default()
        };
        let page = f.fetch_page(&query).await.unwrap().into_page().unwrap();

        assert_eq!(page.items.len(), 12);
        assert_eq!(page.total_count, 20);
        assert_eq!(page.total_pages, 2);
        assert!(page.items.windows(2).all(|w| w[0].price <= w[1].price));

        let query = ProductQuery {
            search: Some("mouse".to_string()),
            ..ProductQuery::default()
        };
        let page = f.fetch_page(&query).await.unwrap().into_page().unwrap();
        assert_eq!(page.total_count, 1);
        assert_eq!(page.items[0].id, "m-1");
    }

    #[tokio::test]
    async fn test_stale_fetch_is_superseded() {
        let f = facade().await;
        f.db.products()
            .insert(&product("p", "P", Category::Gpu, 100))
            .await
            .unwrap();

        let query = ProductQuery::default();

        // Two requests issued back to back; the older ticket finishes after
        // the newer one was taken.
        let old_ticket = f.next_ticket();
        let new_ticket = f.next_ticket();

        let stale = f.fetch_with_ticket(&query, old_ticket).await.unwrap();
        assert!(matches!(stale, PageFetch::Superseded));
        assert!(stale.into_page().is_none());

        let fresh = f.fetch_with_ticket(&query, new_ticket).await.unwrap();
        assert!(matches!(fresh, PageFetch::Fresh(_)));
    }

    #[tokio::test]
    async fn test_get_product_not_found() {
        let f = facade().await;
        let err = f.get_product("ghost").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_admin_gate() {
        let f = facade().await;

        let draft = ProductDraft {
            name: "RTX 5080".to_string(),
            description: None,
            brand: Some("NVIDIA".to_string()),
            category: Category::Gpu,
            price: Money::from_minor(4_500_000_00),
            discount_price: None,
            images: vec![],
            stock: 5,
            featured: true,
        };

        // Anonymous caller is refused
        let err = f.create_product(draft.clone()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Unauthorized);

        // Admin succeeds
        f.auth.set(AuthStage::Authenticated(admin_profile()));
        let created = f.create_product(draft).await.unwrap();
        assert!(!created.id.is_empty());

        f.set_stock(&created.id, 2).await.unwrap();
        let read = f.get_product(&created.id).await.unwrap();
        assert_eq!(read.stock, 2);

        let err = f.set_stock(&created.id, -1).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        f.delete_product(&created.id).await.unwrap();
        let err = f.get_product(&created.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_featured_strip() {
        let f = facade().await;
        for i in 0..10 {
            let mut p = product(&format!("p-{i}"), "P", Category::Storage, 100);
            p.featured = true;
            f.db.products().insert(&p).await.unwrap();
        }

        let strip = f.featured().await.unwrap();
        assert_eq!(strip.len(), FEATURED_LIMIT as usize);
    }
}
