//! # techmart-db: Document Store & Identity for TechMart
//!
//! This crate provides storage and identity for the TechMart storefront.
//! It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      TechMart Data Flow                                 │
//! │                                                                         │
//! │  Facade call (fetch_page, place_order, login)                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   techmart-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐   ┌───────────────┐   ┌────────────────┐  │   │
//! │  │   │   Database    │   │  Repositories │   │    Identity    │  │   │
//! │  │   │   (pool.rs)   │   │ product/order │   │  (identity.rs) │  │   │
//! │  │   │               │   │ /user         │   │                │  │   │
//! │  │   │ SqlitePool    │◄──│ Collection    │   │ argon2 hashes  │  │   │
//! │  │   │ + migrations  │   │ access        │   │ watch sessions │  │   │
//! │  │   └───────────────┘   └───────────────┘   └────────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │   users / products / orders  (JSON columns for nested docs)    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Collection access (product, order, user)
//! - [`identity`] - Email/password provider with session broadcasting
//!
//! ## Usage
//!
//! ```rust,ignore
//! use techmart_db::{Database, DbConfig, IdentityProvider};
//!
//! let db = Database::new(DbConfig::new("path/to/techmart.db")).await?;
//!
//! let laptops = db.products().list(Some(Category::Laptop), SortKey::PriceAsc).await?;
//!
//! let identity = IdentityProvider::new(db.clone());
//! identity.register("bat@example.mn", "Passw0rd", "Бат").await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod identity;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use identity::{AuthError, IdentityProvider, Session, SessionSubscription};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::order::{OrderDraft, OrderRepository};
pub use repository::product::ProductRepository;
pub use repository::user::UserRepository;
