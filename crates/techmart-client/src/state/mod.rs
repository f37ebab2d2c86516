//! # Client Stores
//!
//! In-process state containers for the storefront.
//!
//! ## Concurrency Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Store Concurrency                                  │
//! │                                                                         │
//! │  Each store is one value behind Arc<Mutex<_>> with closure accessors:  │
//! │                                                                         │
//! │  cart.with_cart(|c| c.totals)            read, lock held briefly       │
//! │  cart.with_cart_mut(|c| c.add(&p))       write, serialized             │
//! │                                                                         │
//! │  Every action runs entirely inside one lock acquisition, so actions    │
//! │  are atomic and serialized. Backend calls happen OUTSIDE the lock;     │
//! │  a store closure never awaits.                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Stores
//!
//! - [`cart::CartState`] - The shopping cart
//! - [`wishlist::WishlistState`] - The wishlist id set
//! - [`auth::AuthState`] - The authentication state machine

pub mod auth;
pub mod cart;
pub mod wishlist;

pub use auth::{AuthStage, AuthState};
pub use cart::CartState;
pub use wishlist::WishlistState;
