//! # Facades
//!
//! The guarded operations the UI calls. Each facade wraps one store (or
//! the backend) and owns the user-feedback rules: what mutates, what is
//! refused, and which localized notice comes back.
//!
//! ## Facade Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Facade Layer                                    │
//! │                                                                         │
//! │  CartFacade       add_to_cart, change_quantity, remove, clear, sync    │
//! │  CatalogFacade    fetch_page (generation guard), get_product, admin    │
//! │  WishlistFacade   toggle (login-gated), contains, refresh              │
//! │  AuthFacade       register, login, logout, profile, session mirror     │
//! │  OrderFacade      place_order (transactional), history, admin status   │
//! │                                                                         │
//! │  Facades return Result<_, ApiError>; user feedback that is not an      │
//! │  error (sold out, at cap) comes back as a Notice in the Ok value.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod orders;
pub mod wishlist;

pub use auth::{AuthFacade, SessionMirror};
pub use cart::CartFacade;
pub use catalog::{CatalogFacade, PageFetch};
pub use orders::OrderFacade;
pub use wishlist::WishlistFacade;
