//! # Auth State
//!
//! The authentication state machine the UI observes.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Auth State Machine                                  │
//! │                                                                         │
//! │            login()/register()                                           │
//! │  Anonymous ──────────────────► Authenticating                           │
//! │      ▲                              │                                   │
//! │      │        provider error        │  provider ok                      │
//! │      ├──────────────────────────────┤                                   │
//! │      │                              ▼                                   │
//! │      │   logout()/expiry    Authenticated(profile)                      │
//! │      └──────────────────────────────┘                                   │
//! │                                                                         │
//! │  Errors surface once (as a localized notice) and the machine falls     │
//! │  back to Anonymous; there is no error state to get stuck in.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Mutex;

use techmart_core::UserProfile;

/// Where the user currently stands.
#[derive(Debug, Clone, Default)]
pub enum AuthStage {
    /// No session. The default and the state after any auth error.
    #[default]
    Anonymous,

    /// A login or registration call is in flight.
    Authenticating,

    /// Signed in with a loaded profile document.
    Authenticated(UserProfile),
}

/// Shared auth store.
#[derive(Debug, Default)]
pub struct AuthState {
    stage: Mutex<AuthStage>,
}

impl AuthState {
    /// Creates a new anonymous auth state.
    pub fn new() -> Self {
        AuthState::default()
    }

    /// Executes a function with read access to the stage.
    pub fn with_stage<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&AuthStage) -> R,
    {
        let stage = self.stage.lock().expect("auth mutex poisoned");
        f(&stage)
    }

    /// Moves to a new stage.
    pub fn set(&self, stage: AuthStage) {
        let mut current = self.stage.lock().expect("auth mutex poisoned");
        *current = stage;
    }

    /// Convenience: back to Anonymous (error, logout, expiry).
    pub fn set_anonymous(&self) {
        self.set(AuthStage::Anonymous);
    }

    /// The signed-in profile, if any.
    pub fn current_user(&self) -> Option<UserProfile> {
        self.with_stage(|stage| match stage {
            AuthStage::Authenticated(profile) => Some(profile.clone()),
            _ => None,
        })
    }

    /// Whether a user is signed in.
    pub fn is_authenticated(&self) -> bool {
        self.with_stage(|stage| matches!(stage, AuthStage::Authenticated(_)))
    }

    /// Whether the signed-in user is an admin.
    pub fn is_admin(&self) -> bool {
        self.current_user().is_some_and(|p| p.is_admin())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use techmart_core::UserRole;

    fn profile(role: UserRole) -> UserProfile {
        UserProfile {
            uid: "u-1".to_string(),
            email: "bat@example.mn".to_string(),
            name: "Бат".to_string(),
            role,
            avatar: None,
            phone: None,
            address: None,
            wishlist: vec![],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_transitions() {
        let state = AuthState::new();
        assert!(!state.is_authenticated());

        state.set(AuthStage::Authenticating);
        assert!(!state.is_authenticated());
        assert!(state.current_user().is_none());

        state.set(AuthStage::Authenticated(profile(UserRole::User)));
        assert!(state.is_authenticated());
        assert!(!state.is_admin());

        state.set(AuthStage::Authenticated(profile(UserRole::Admin)));
        assert!(state.is_admin());

        state.set_anonymous();
        assert!(!state.is_authenticated());
    }
}
