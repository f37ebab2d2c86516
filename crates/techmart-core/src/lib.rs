//! # techmart-core: Pure Business Logic for TechMart
//!
//! This crate is the **heart** of the TechMart storefront. It contains all
//! business logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       TechMart Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                      Storefront UI                              │   │
//! │  │   Catalog ──► Cart ──► Checkout ──► Orders ──► Admin            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                   techmart-client (facades)                     │   │
//! │  │    add_to_cart, fetch_page, place_order, login, etc.            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ techmart-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐   │   │
//! │  │   │   types   │  │   money   │  │   cart    │  │   query   │   │   │
//! │  │   │  Product  │  │   Money   │  │   Cart    │  │  search   │   │   │
//! │  │   │   Order   │  │  TaxCalc  │  │ CartLine  │  │ paginate  │   │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘   │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  techmart-db (Storage Layer)                    │   │
//! │  │        SQLite document store, identity provider                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Order, Category, SortKey, etc.)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`cart`] - The cart store: line items and derived totals
//! - [`wishlist`] - Wishlist id-set
//! - [`query`] - Client-side search/sort/paginate pipeline
//! - [`validation`] - Form and business rule validation
//! - [`locale`] - Localized user-facing message tables (Mongolian)
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in minor units (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod locale;
pub mod money;
pub mod query;
pub mod types;
pub mod validation;
pub mod wishlist;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use techmart_core::Money` instead of
// `use techmart_core::money::Money`.

pub use cart::{Cart, CartLine, CartTotals};
pub use error::ValidationError;
pub use locale::AuthErrorCode;
pub use money::Money;
pub use query::{ProductPage, ProductQuery};
pub use types::*;
pub use wishlist::WishlistSet;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Value-added tax rate in basis points (1000 = 10% Mongolian VAT).
///
/// Applied on the cart subtotal; totals are recomputed after every
/// mutation so they can never drift from the line items.
pub const VAT_RATE_BPS: u32 = 1000;

/// Default catalog page size.
pub const ITEMS_PER_PAGE: u32 = 12;

/// Maximum catalog page size accepted from callers.
pub const MAX_PAGE_SIZE: u32 = 100;

/// How many featured products the home page shows.
pub const FEATURED_LIMIT: u32 = 8;
