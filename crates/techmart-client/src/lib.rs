//! # TechMart Client
//!
//! The storefront client layer: shared stores, guarded facades and local
//! persistence over the `techmart-db` backend.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         techmart-client                                 │
//! │                                                                         │
//! │  UI (toasts, pages, forms)                                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Storefront ── facades ──┬── CartFacade ──────┐                         │
//! │                          ├── CatalogFacade    │   shared stores         │
//! │                          ├── WishlistFacade   ├─► CartState             │
//! │                          ├── AuthFacade       ├─► WishlistState         │
//! │                          └── OrderFacade ─────┘   AuthState             │
//! │                                │                                        │
//! │                                ▼                                        │
//! │                       techmart-db (SQLite + identity)                   │
//! │                                                                         │
//! │  Facades own the guard rules and localized notices; stores hold state  │
//! │  behind mutexes; everything user-visible is Mongolian from the fixed   │
//! │  tables in techmart-core.                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust,ignore
//! let store = Storefront::new(ClientConfig::from_env()).await?;
//! let _mirror = store.auth().mirror_sessions();
//!
//! store.auth().login("bat@example.mn", "Passw0rd").await?;
//! store.cart().add_to_cart("product-id").await?;
//! let (order, notice) = store.orders().place_order(shipping, payment).await?;
//! ```

pub mod config;
pub mod error;
pub mod facade;
pub mod notice;
pub mod persist;
pub mod state;

use std::sync::atomic::AtomicU64;
use std::sync::Arc;

use tracing::info;

pub use config::ClientConfig;
pub use error::{ApiError, ErrorCode};
pub use facade::{
    AuthFacade, CartFacade, CatalogFacade, OrderFacade, PageFetch, SessionMirror, WishlistFacade,
};
pub use notice::{Notice, NoticeKind};
pub use persist::{PersistedState, PersistError};
pub use state::{AuthStage, AuthState, CartState, WishlistState};

use techmart_db::{Database, DbConfig, IdentityProvider};

/// The assembled storefront: one database, one identity provider and the
/// shared stores every facade works against.
///
/// Facade accessors are cheap; each returns a handle sharing the same
/// underlying stores, so state observed through one facade is immediately
/// visible through the others.
#[derive(Clone)]
pub struct Storefront {
    config: ClientConfig,
    db: Database,
    identity: Arc<IdentityProvider>,
    cart: Arc<CartState>,
    wishlist: Arc<WishlistState>,
    auth: Arc<AuthState>,
    query_generation: Arc<AtomicU64>,
}

impl Storefront {
    /// Opens the database and assembles the stores.
    pub async fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let db_config = match &config.database_path {
            Some(path) => DbConfig::new(path.clone()),
            None => DbConfig::in_memory(),
        };
        let db = Database::new(db_config)
            .await
            .map_err(ApiError::from)?;

        let identity = Arc::new(IdentityProvider::new(db.clone()));

        info!(store = %config.store_name, "Storefront ready");

        Ok(Storefront {
            config,
            db,
            identity,
            cart: Arc::new(CartState::new()),
            wishlist: Arc::new(WishlistState::new()),
            auth: Arc::new(AuthState::new()),
            query_generation: Arc::new(AtomicU64::new(0)),
        })
    }

    /// An in-memory storefront with default configuration (tests, demos).
    pub async fn in_memory() -> Result<Self, ApiError> {
        Storefront::new(ClientConfig::default()).await
    }

    // =========================================================================
    // Facades
    // =========================================================================

    /// Cart operations.
    pub fn cart(&self) -> CartFacade {
        CartFacade::new(self.db.clone(), Arc::clone(&self.cart))
    }

    /// Catalog reads and the admin product surface.
    pub fn catalog(&self) -> CatalogFacade {
        CatalogFacade::new(
            self.db.clone(),
            Arc::clone(&self.auth),
            Arc::clone(&self.query_generation),
        )
    }

    /// Wishlist operations.
    pub fn wishlist(&self) -> WishlistFacade {
        WishlistFacade::new(
            self.db.clone(),
            Arc::clone(&self.auth),
            Arc::clone(&self.wishlist),
        )
    }

    /// Authentication operations.
    pub fn auth(&self) -> AuthFacade {
        AuthFacade::new(
            Arc::clone(&self.identity),
            self.db.clone(),
            Arc::clone(&self.auth),
            Arc::clone(&self.wishlist),
        )
    }

    /// Checkout and order history.
    pub fn orders(&self) -> OrderFacade {
        OrderFacade::new(
            self.db.clone(),
            Arc::clone(&self.auth),
            Arc::clone(&self.cart),
        )
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// The active configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The underlying database handle.
    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Writes the cart and wishlist snapshot to disk.
    pub fn save_state(&self) -> Result<(), PersistError> {
        let snapshot = PersistedState {
            cart: self.cart.snapshot(),
            wishlist: self.wishlist.ids(),
            last_uid: self.auth.current_user().map(|u| u.uid),
        };
        snapshot.save(&self.state_path()?)
    }

    /// Restores the cart and wishlist snapshot from disk, if one exists.
    ///
    /// A missing or unreadable snapshot is not an error; the stores just
    /// stay empty.
    pub fn restore_state(&self) -> Result<(), PersistError> {
        let snapshot = PersistedState::load_or_default(&self.state_path()?);
        self.cart.with_cart_mut(|cart| *cart = snapshot.cart);
        self.wishlist.replace(snapshot.wishlist);
        Ok(())
    }

    /// Persists state and closes the pool.
    pub async fn shutdown(&self) {
        if let Err(e) = self.save_state() {
            tracing::warn!(error = %e, "Could not persist state on shutdown");
        }
        self.db.close().await;
    }

    fn state_path(&self) -> Result<std::path::PathBuf, PersistError> {
        match &self.config.state_path {
            Some(path) => Ok(path.clone()),
            None => persist::default_state_path(),
        }
    }
}

/// Initializes tracing for the client process.
///
/// `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,techmart=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}

// =============================================================================
// Integration-style Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use techmart_core::locale::messages;
    use techmart_core::query::ProductQuery;
    use techmart_core::{Category, Money, PaymentInfo, PaymentMethod, ShippingInfo};

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

    #[tokio::test]
    async fn test_full_shopping_flow() {
        let store = Storefront::in_memory().await.unwrap();

        // Seed the catalog directly through the repository
        let now = chrono::Utc::now();
        let product = techmart_core::Product {
            id: "p-1".to_string(),
            name: "MacBook Pro".to_string(),
            description: None,
            brand: Some("Apple".to_string()),
            category: Category::Laptop,
            price: Money::from_minor(500_000_00),
            discount_price: None,
            images: vec![],
            stock: 3,
            rating: 0.0,
            sale_count: 0,
            featured: true,
            created_at: now,
            updated_at: now,
        };
        store.database().products().insert(&product).await.unwrap();

        // Register, browse, add to cart, check out
        store
            .auth()
            .register("bat@example.mn", "Passw0rd", "Бат")
            .await
            .unwrap();

        let page = store
            .catalog()
            .fetch_page(&ProductQuery::default())
            .await
            .unwrap()
            .into_page()
            .unwrap();
        assert_eq!(page.total_count, 1);

        store.cart().add_to_cart("p-1").await.unwrap();
        let (order, notice) = store
            .orders()
            .place_order(
                shipping(),
                PaymentInfo {
                    method: PaymentMethod::Card,
                    card_last4: "4242".to_string(),
                },
            )
            .await
            .unwrap();

        assert_eq!(notice, Notice::success(messages::ORDER_PLACED));
        assert_eq!(order.total.minor(), 550_000_00);
        assert!(store.cart().totals().subtotal == Money::zero());

        let history = store.orders().my_orders().await.unwrap();
        assert_eq!(history.len(), 1);
    }

    #[tokio::test]
    async fn test_facades_share_stores() {
        let store = Storefront::in_memory().await.unwrap();

        store
            .auth()
            .register("bat@example.mn", "Passw0rd", "Бат")
            .await
            .unwrap();

        // A wishlist toggle through one facade handle is visible through
        // a freshly constructed one
        store.wishlist().toggle("p-9").await.unwrap();
        assert!(store.wishlist().contains("p-9"));
    }

    #[tokio::test]
    async fn test_state_round_trip() {
        let dir = std::env::temp_dir().join(format!("techmart-sf-{}", std::process::id()));
        let state_path = dir.join("state.json");

        let config = ClientConfig {
            state_path: Some(state_path.clone()),
            ..ClientConfig::default()
        };

        let store = Storefront::new(config.clone()).await.unwrap();
        let now = chrono::Utc::now();
        let product = techmart_core::Product {
            id: "p-1".to_string(),
            name: "Keychron K2".to_string(),
            description: None,
            brand: None,
            category: Category::Keyboard,
            price: Money::from_minor(150_000),
            discount_price: None,
            images: vec![],
            stock: 5,
            rating: 0.0,
            sale_count: 0,
            featured: false,
            created_at: now,
            updated_at: now,
        };
        store.database().products().insert(&product).await.unwrap();
        store.cart().add_to_cart("p-1").await.unwrap();
        store.save_state().unwrap();

        // A second storefront with the same state path restores the cart
        let other = Storefront::new(config).await.unwrap();
        other.restore_state().unwrap();
        assert_eq!(other.cart().quantity_of("p-1"), 1);

        std::fs::remove_dir_all(&dir).ok();
    }
}
