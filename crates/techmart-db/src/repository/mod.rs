//! # Repository Module
//!
//! Collection access for the TechMart document store.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The Repository pattern abstracts storage access behind a clean API.   │
//! │                                                                         │
//! │  Facade call                                                           │
//! │       │                                                                 │
//! │       │  db.products().list(Some(Category::Laptop), SortKey::PriceAsc) │
//! │       │  ↓                                                              │
//! │       ▼                                                                 │
//! │  ProductRepository                                                     │
//! │  ├── list(&self, category, sort)                                       │
//! │  ├── get_by_id(&self, id)                                              │
//! │  ├── insert(&self, product)                                            │
//! │  └── update(&self, product)                                            │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  The store exposes only what a managed document backend would:         │
//! │  equality filters, single-field ordering and limits. Substring         │
//! │  search and pagination live in techmart-core on top of these reads.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`product::ProductRepository`] - Catalog CRUD, featured reads, stock
//! - [`order::OrderRepository`] - Transactional order placement and history
//! - [`user::UserRepository`] - Profile documents and wishlist persistence

pub mod order;
pub mod product;
pub mod user;
