//! # Auth Facade
//!
//! Register, login and logout over the identity provider, keeping the
//! auth store and the wishlist in step with the session.
//!
//! ## Session Mirroring
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Session Mirror                                     │
//! │                                                                         │
//! │  IdentityProvider ── watch channel ──► SessionMirror task               │
//! │                                             │                           │
//! │               Some(session) ── load profile │ ── Authenticated + WL     │
//! │               None          ──────────────── │ ── Anonymous, WL clear   │
//! │                                                                         │
//! │  The mirror covers session changes the facade did not initiate          │
//! │  (expiry, a logout from another handle). Dropping the SessionMirror     │
//! │  aborts the task; there is no explicit unsubscribe call.                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::ApiError;
use crate::notice::Notice;
use crate::state::{AuthStage, AuthState, WishlistState};
use techmart_core::locale::messages;
use techmart_core::UserProfile;
use techmart_db::{Database, IdentityProvider};

/// Guarded authentication operations.
#[derive(Clone)]
pub struct AuthFacade {
    identity: Arc<IdentityProvider>,
    db: Database,
    auth: Arc<AuthState>,
    wishlist: Arc<WishlistState>,
}

impl AuthFacade {
    pub(crate) fn new(
        identity: Arc<IdentityProvider>,
        db: Database,
        auth: Arc<AuthState>,
        wishlist: Arc<WishlistState>,
    ) -> Self {
        AuthFacade {
            identity,
            db,
            auth,
            wishlist,
        }
    }

    /// Registers a new account and signs it in.
    ///
    /// Any provider error returns the auth store to Anonymous and surfaces
    /// as a localized message.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<Notice, ApiError> {
        self.auth.set(AuthStage::Authenticating);

        match self.identity.register(email, password, name).await {
            Ok(profile) => {
                self.enter_session(profile);
                Ok(Notice::success(messages::REGISTER_SUCCESS))
            }
            Err(e) => {
                self.auth.set_anonymous();
                Err(e.into())
            }
        }
    }

    /// Signs in, restoring the account's wishlist into the local set.
    pub async fn login(&self, email: &str, password: &str) -> Result<Notice, ApiError> {
        self.auth.set(AuthStage::Authenticating);

        match self.identity.login(email, password).await {
            Ok(profile) => {
                let greeting = messages::welcome(&profile.name);
                self.enter_session(profile);
                Ok(Notice::success(greeting))
            }
            Err(e) => {
                self.auth.set_anonymous();
                Err(e.into())
            }
        }
    }

    /// Signs out, clearing the local auth and wishlist stores.
    pub fn logout(&self) -> Notice {
        self.identity.logout();
        self.auth.set_anonymous();
        self.wishlist.clear();
        Notice::success(messages::LOGOUT_SUCCESS)
    }

    /// The signed-in profile, if any.
    pub fn current_user(&self) -> Option<UserProfile> {
        self.auth.current_user()
    }

    /// Whether a user is signed in.
    pub fn is_authenticated(&self) -> bool {
        self.auth.is_authenticated()
    }

    /// Updates the editable profile fields and reloads the store.
    pub async fn update_profile(
        &self,
        name: &str,
        avatar: Option<&str>,
        phone: Option<&str>,
        address: Option<&str>,
    ) -> Result<Notice, ApiError> {
        let user = self.auth.current_user().ok_or_else(ApiError::login_required)?;

        techmart_core::validation::validate_name(name)?;
        if let Some(phone) = phone {
            techmart_core::validation::validate_phone(phone)?;
        }

        self.db
            .users()
            .update_profile(&user.uid, name, avatar, phone, address)
            .await?;

        let refreshed = self
            .db
            .users()
            .get_by_uid(&user.uid)
            .await?
            .ok_or_else(|| ApiError::not_found("User", &user.uid))?;
        self.auth.set(AuthStage::Authenticated(refreshed));

        debug!(uid = %user.uid, "Profile updated");
        Ok(Notice::success(messages::REGISTER_SUCCESS))
    }

    /// Changes the signed-in user's password.
    pub async fn change_password(&self, old: &str, new: &str) -> Result<(), ApiError> {
        let user = self.auth.current_user().ok_or_else(ApiError::login_required)?;
        self.identity.change_password(&user.uid, old, new).await?;
        Ok(())
    }

    /// Requests a password reset for an email.
    pub async fn request_password_reset(&self, email: &str) -> Result<(), ApiError> {
        self.identity.request_password_reset(email).await?;
        Ok(())
    }

    /// Starts mirroring provider session changes into the auth store.
    ///
    /// Covers changes this facade did not make itself: session expiry and
    /// logouts through other handles. Drop the returned mirror to stop.
    pub fn mirror_sessions(&self) -> SessionMirror {
        let mut sub = self.identity.subscribe();
        let db = self.db.clone();
        let auth = Arc::clone(&self.auth);
        let wishlist = Arc::clone(&self.wishlist);

        let handle = tokio::spawn(async move {
            while let Ok(session) = sub.changed().await {
                match session {
                    None => {
                        debug!("Session ended, clearing local stores");
                        auth.set_anonymous();
                        wishlist.clear();
                    }
                    Some(session) => match db.users().get_by_uid(&session.uid).await {
                        Ok(Some(profile)) => {
                            wishlist.replace(profile.wishlist.clone());
                            auth.set(AuthStage::Authenticated(profile));
                        }
                        Ok(None) => {
                            warn!(uid = %session.uid, "Session for unknown user, ignoring");
                        }
                        Err(e) => {
                            warn!(error = %e, "Failed to load profile for session");
                        }
                    },
                }
            }
        });

        info!("Session mirror started");
        SessionMirror { handle }
    }

    fn enter_session(&self, profile: UserProfile) {
        self.wishlist.replace(profile.wishlist.clone());
        self.auth.set(AuthStage::Authenticated(profile));
    }
}

/// Handle for the session mirror task. Dropping it stops the mirroring.
#[derive(Debug)]
pub struct SessionMirror {
    handle: JoinHandle<()>,
}

impl Drop for SessionMirror {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use std::time::Duration;
    use techmart_db::DbConfig;

    async fn facade() -> AuthFacade {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let identity = Arc::new(IdentityProvider::new(db.clone()));
        AuthFacade::new(
            identity,
            db,
            Arc::new(AuthState::new()),
            Arc::new(WishlistState::new()),
        )
    }

    #[tokio::test]
    async fn test_register_authenticates() {
        let f = facade().await;

        let notice = f
            .register("bat@example.mn", "Passw0rd", "Бат")
            .await
            .unwrap();
        assert_eq!(notice, Notice::success(messages::REGISTER_SUCCESS));
        assert!(f.is_authenticated());
        assert_eq!(f.current_user().unwrap().email, "bat@example.mn");
    }

    #[tokio::test]
    async fn test_wrong_password_surfaces_localized_and_stays_anonymous() {
        let f = facade().await;
        f.register("bat@example.mn", "Passw0rd", "Бат").await.unwrap();
        f.logout();

        let err = f.login("bat@example.mn", "wrongPW12").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::AuthError);
        assert_eq!(err.message, "Нууц үг буруу байна");
        assert!(!f.is_authenticated());
    }

    #[tokio::test]
    async fn test_login_restores_wishlist_and_greets() {
        let f = facade().await;
        f.register("bat@example.mn", "Passw0rd", "Бат").await.unwrap();
        let uid = f.current_user().unwrap().uid;

        f.db.users()
            .set_wishlist(&uid, &["p-1".to_string()])
            .await
            .unwrap();
        f.logout();
        assert!(f.wishlist.ids().is_empty());

        let notice = f.login("bat@example.mn", "Passw0rd").await.unwrap();
        assert_eq!(notice, Notice::success("Тавтай морил, Бат!"));
        assert!(f.wishlist.contains("p-1"));
    }

    #[tokio::test]
    async fn test_logout_clears_stores() {
        let f = facade().await;
        f.register("bat@example.mn", "Passw0rd", "Бат").await.unwrap();

        let notice = f.logout();
        assert_eq!(notice, Notice::success(messages::LOGOUT_SUCCESS));
        assert!(!f.is_authenticated());
        assert!(f.wishlist.ids().is_empty());
    }

    #[tokio::test]
    async fn test_update_profile_requires_login() {
        let f = facade().await;
        let err = f.update_profile("Болд", None, None, None).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Unauthorized);
    }

    #[tokio::test]
    async fn test_update_profile_reloads_store() {
        let f = facade().await;
        f.register("bat@example.mn", "Passw0rd", "Бат").await.unwrap();

        f.update_profile("Болд", None, Some("99112233"), None)
            .await
            .unwrap();

        let user = f.current_user().unwrap();
        assert_eq!(user.name, "Болд");
        assert_eq!(user.phone.as_deref(), Some("99112233"));
    }

    #[tokio::test]
    async fn test_mirror_reflects_external_logout() {
        let f = facade().await;
        let _mirror = f.mirror_sessions();

        f.register("bat@example.mn", "Passw0rd", "Бат").await.unwrap();
        assert!(f.is_authenticated());

        // Logout directly through the provider, not the facade
        f.identity.logout();

        for _ in 0..50 {
            if !f.is_authenticated() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(!f.is_authenticated());
        assert!(f.wishlist.ids().is_empty());
    }

    #[tokio::test]
    async fn test_dropped_mirror_stops_updates() {
        let f = facade().await;
        let mirror = f.mirror_sessions();
        drop(mirror);

        f.register("bat@example.mn", "Passw0rd", "Бат").await.unwrap();
        f.identity.logout();
        tokio::time::sleep(Duration::from_millis(50)).await;

        // The facade store was set by register() and nothing cleared it
        assert!(f.is_authenticated());
    }
}
