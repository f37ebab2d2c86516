//! # Wishlist Facade
//!
//! Login-gated wishlist toggling. The local set answers instantly; every
//! change is written through to the user document, and a failed write
//! rolls the local set back so the two never drift.

use std::sync::Arc;

use tracing::debug;

use crate::error::ApiError;
use crate::notice::Notice;
use crate::state::{AuthState, WishlistState};
use techmart_core::locale::messages;
use techmart_db::Database;

/// Guarded wishlist operations.
#[derive(Clone)]
pub struct WishlistFacade {
    db: Database,
    auth: Arc<AuthState>,
    wishlist: Arc<WishlistState>,
}

impl WishlistFacade {
    pub(crate) fn new(db: Database, auth: Arc<AuthState>, wishlist: Arc<WishlistState>) -> Self {
        WishlistFacade {
            db,
            auth,
            wishlist,
        }
    }

    /// Toggles a product in the signed-in user's wishlist.
    ///
    /// Anonymous callers get a login-required notice and nothing changes.
    /// The local set flips first; if the backend write fails the flip is
    /// reverted before the error propagates.
    pub async fn toggle(&self, product_id: &str) -> Result<Notice, ApiError> {
        let Some(user) = self.auth.current_user() else {
            return Ok(Notice::error(messages::LOGIN_REQUIRED));
        };

        let added = self.wishlist.with_set_mut(|set| set.toggle(product_id));
        debug!(product_id = %product_id, added, "Wishlist toggled");

        let ids = self.wishlist.ids();
        if let Err(e) = self.db.users().set_wishlist(&user.uid, &ids).await {
            // Undo the optimistic flip
            self.wishlist.with_set_mut(|set| set.toggle(product_id));
            return Err(e.into());
        }

        Ok(if added {
            Notice::success(messages::WISHLIST_ADDED)
        } else {
            Notice::success(messages::WISHLIST_REMOVED)
        })
    }

    /// Whether a product is wishlisted.
    pub fn contains(&self, product_id: &str) -> bool {
        self.wishlist.contains(product_id)
    }

    /// The wishlisted product ids.
    pub fn ids(&self) -> Vec<String> {
        self.wishlist.ids()
    }

    /// Reloads the local set from the signed-in user's document.
    pub async fn refresh(&self) -> Result<(), ApiError> {
        let Some(user) = self.auth.current_user() else {
            self.wishlist.clear();
            return Ok(());
        };

        let ids = self.db.users().get_wishlist(&user.uid).await?;
        self.wishlist.replace(ids);
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AuthStage;
    use chrono::Utc;
    use techmart_core::{UserProfile, UserRole};
    use techmart_db::DbConfig;

    fn profile(uid: &str) -> UserProfile {
        UserProfile {
            uid: uid.to_string(),
            email: format!("{uid}@example.mn"),
            name: "Бат".to_string(),
            role: UserRole::User,
            avatar: None,
            phone: None,
            address: None,
            wishlist: vec![],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    async fn facade_with_user() -> WishlistFacade {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let user = profile("u-1");
        db.users().create(&user, "hash").await.unwrap();

        let auth = Arc::new(AuthState::new());
        auth.set(AuthStage::Authenticated(user));

        WishlistFacade::new(db, auth, Arc::new(WishlistState::new()))
    }

    #[tokio::test]
    async fn test_toggle_requires_login() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let f = WishlistFacade::new(
            db,
            Arc::new(AuthState::new()),
            Arc::new(WishlistState::new()),
        );

        let notice = f.toggle("p-1").await.unwrap();
        assert_eq!(notice, Notice::error(messages::LOGIN_REQUIRED));
        assert!(!f.contains("p-1"));
    }

    #[tokio::test]
    async fn test_toggle_round_trip_persists() {
        let f = facade_with_user().await;

        let notice = f.toggle("p-1").await.unwrap();
        assert_eq!(notice, Notice::success(messages::WISHLIST_ADDED));
        assert!(f.contains("p-1"));

        // Stored on the user document
        let stored = f.db.users().get_wishlist("u-1").await.unwrap();
        assert_eq!(stored, vec!["p-1".to_string()]);

        let notice = f.toggle("p-1").await.unwrap();
        assert_eq!(notice, Notice::success(messages::WISHLIST_REMOVED));
        assert!(!f.contains("p-1"));
        assert!(f.db.users().get_wishlist("u-1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_refresh_restores_from_document() {
        let f = facade_with_user().await;
        f.db.users()
            .set_wishlist("u-1", &["a".to_string(), "b".to_string()])
            .await
            .unwrap();

        f.refresh().await.unwrap();
        assert!(f.contains("a"));
        assert!(f.contains("b"));
        assert_eq!(f.ids().len(), 2);
    }
}
