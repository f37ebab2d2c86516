//! # Identity Provider
//!
//! Email/password identity backing the storefront's auth facade.
//!
//! ## Session Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Identity Provider                                  │
//! │                                                                         │
//! │  register(email, pw, name)     login(email, pw)         logout()        │
//! │       │                             │                       │           │
//! │       ▼                             ▼                       ▼           │
//! │  argon2 hash + user row       verify hash             clear session     │
//! │       │                             │                       │           │
//! │       └──────────────┬──────────────┴───────────────────────┘           │
//! │                      ▼                                                  │
//! │          watch channel: Option<Session>                                 │
//! │                      │                                                  │
//! │                      ▼                                                  │
//! │          SessionSubscription (auth facade mirror)                       │
//! │          dropped handle = no more deliveries                            │
//! │                                                                         │
//! │  Failed logins per email feed a counter; past the limit the provider   │
//! │  answers TooManyRequests until the cooldown lapses.                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## What Is Never Stored
//! Plaintext passwords exist only inside the call frame; only the argon2
//! PHC string reaches the users table. Sessions carry uid + email + expiry,
//! no credential material.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::DbError;
use crate::pool::Database;
use techmart_core::validation::{validate_email, validate_password};
use techmart_core::{AuthErrorCode, UserProfile, UserRole};

// =============================================================================
// Tunables
// =============================================================================

/// Failed logins per email before the provider starts refusing attempts.
const MAX_FAILED_ATTEMPTS: u32 = 5;

/// How long an email stays locked out after hitting the attempt limit.
const ATTEMPT_COOLDOWN: Duration = Duration::from_secs(5 * 60);

/// Default session lifetime.
const SESSION_TTL: Duration = Duration::from_secs(24 * 60 * 60);

// =============================================================================
// Sessions
// =============================================================================

/// An authenticated session. Carries identity and expiry only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub uid: String,
    pub email: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Whether the session has lapsed.
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

/// A live view of the current session.
///
/// Obtained from [`IdentityProvider::subscribe`]. Dropping the handle ends
/// the subscription; there is no explicit unsubscribe call.
#[derive(Debug)]
pub struct SessionSubscription {
    rx: watch::Receiver<Option<Session>>,
}

impl SessionSubscription {
    /// The session as of the last delivery.
    pub fn current(&self) -> Option<Session> {
        self.rx.borrow().clone()
    }

    /// Waits for the next session change and returns the new value.
    ///
    /// Returns `None` as a value when the change was a sign-out. Errors
    /// only if the provider itself was dropped.
    pub async fn changed(&mut self) -> Result<Option<Session>, watch::error::RecvError> {
        self.rx.changed().await?;
        Ok(self.rx.borrow_and_update().clone())
    }
}

// =============================================================================
// Errors
// =============================================================================

/// Identity operation errors.
///
/// Each variant maps onto one of the fixed [`AuthErrorCode`]s the client
/// localizes; the mapping is total so no provider failure can escape the
/// message table.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("email already in use")]
    EmailAlreadyInUse,

    #[error("invalid email address")]
    InvalidEmail,

    #[error("password does not meet requirements")]
    WeakPassword,

    #[error("no account for that email")]
    UserNotFound,

    #[error("wrong password")]
    WrongPassword,

    #[error("too many failed attempts")]
    TooManyRequests,

    #[error("credential hashing failed: {0}")]
    Hashing(String),

    #[error(transparent)]
    Db(#[from] DbError),
}

impl AuthError {
    /// The fixed provider code for this error.
    pub fn code(&self) -> AuthErrorCode {
        match self {
            AuthError::EmailAlreadyInUse => AuthErrorCode::EmailAlreadyInUse,
            AuthError::InvalidEmail => AuthErrorCode::InvalidEmail,
            AuthError::WeakPassword => AuthErrorCode::WeakPassword,
            AuthError::UserNotFound => AuthErrorCode::UserNotFound,
            AuthError::WrongPassword => AuthErrorCode::WrongPassword,
            AuthError::TooManyRequests => AuthErrorCode::TooManyRequests,
            AuthError::Db(DbError::ConnectionFailed(_)) | AuthError::Db(DbError::PoolExhausted) => {
                AuthErrorCode::NetworkFailure
            }
            AuthError::Hashing(_) | AuthError::Db(_) => AuthErrorCode::Other,
        }
    }
}

pub type AuthResult<T> = Result<T, AuthError>;

// =============================================================================
// Attempt Counter
// =============================================================================

#[derive(Debug, Clone, Copy)]
struct AttemptWindow {
    failures: u32,
    last_failure: DateTime<Utc>,
}

// =============================================================================
// Provider
// =============================================================================

/// The email/password identity provider.
///
/// One instance per client; clones share the session channel and the
/// attempt counter.
#[derive(Debug)]
pub struct IdentityProvider {
    db: Database,
    sessions: watch::Sender<Option<Session>>,
    attempts: Mutex<HashMap<String, AttemptWindow>>,
    session_ttl: Duration,
}

impl IdentityProvider {
    /// Creates a provider over the given database.
    pub fn new(db: Database) -> Self {
        let (sessions, _) = watch::channel(None);
        IdentityProvider {
            db,
            sessions,
            attempts: Mutex::new(HashMap::new()),
            session_ttl: SESSION_TTL,
        }
    }

    /// Overrides the session lifetime (tests use short TTLs).
    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }

    /// Registers a new account and signs it in.
    ///
    /// ## Errors
    /// * `InvalidEmail` - email fails the shape check
    /// * `WeakPassword` - password fails the strength check
    /// * `EmailAlreadyInUse` - the email has an account
    pub async fn register(&self, email: &str, password: &str, name: &str) -> AuthResult<UserProfile> {
        let email = email.trim();

        validate_email(email).map_err(|_| AuthError::InvalidEmail)?;
        validate_password(password).map_err(|_| AuthError::WeakPassword)?;

        let password_hash = hash_password(password)?;
        let now = Utc::now();

        let profile = UserProfile {
            uid: Uuid::new_v4().to_string(),
            email: email.to_string(),
            name: name.trim().to_string(),
            role: UserRole::User,
            avatar: None,
            phone: None,
            address: None,
            wishlist: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        match self.db.users().create(&profile, &password_hash).await {
            Ok(()) => {}
            Err(DbError::UniqueViolation { .. }) => return Err(AuthError::EmailAlreadyInUse),
            Err(e) => return Err(e.into()),
        }

        info!(uid = %profile.uid, "Account registered");
        self.start_session(&profile);
        Ok(profile)
    }

    /// Signs in with email and password.
    ///
    /// ## Errors
    /// * `UserNotFound` - no account for the email
    /// * `WrongPassword` - hash verification failed
    /// * `TooManyRequests` - the email is in its cooldown window
    pub async fn login(&self, email: &str, password: &str) -> AuthResult<UserProfile> {
        let email = email.trim();

        self.check_attempts(email)?;

        let credential = match self.db.users().get_credential_by_email(email).await? {
            Some(credential) => credential,
            None => {
                self.record_failure(email);
                return Err(AuthError::UserNotFound);
            }
        };

        if !verify_password(password, &credential.password_hash)? {
            self.record_failure(email);
            debug!(email = %email, "Password verification failed");
            return Err(AuthError::WrongPassword);
        }

        self.clear_attempts(email);
        info!(uid = %credential.profile.uid, "Signed in");
        self.start_session(&credential.profile);
        Ok(credential.profile)
    }

    /// Signs out the current session.
    pub fn logout(&self) {
        info!("Signed out");
        self.sessions.send_replace(None);
    }

    /// The current session, if one exists and hasn't expired.
    ///
    /// An expired session is cleared here, so observers see the sign-out
    /// the next time anyone asks.
    pub fn current_session(&self) -> Option<Session> {
        let session = self.sessions.borrow().clone()?;
        if session.is_expired() {
            warn!(uid = %session.uid, "Session expired, signing out");
            self.sessions.send_replace(None);
            return None;
        }
        Some(session)
    }

    /// Subscribes to session changes.
    ///
    /// The subscription delivers every sign-in and sign-out until the
    /// handle is dropped.
    pub fn subscribe(&self) -> SessionSubscription {
        SessionSubscription {
            rx: self.sessions.subscribe(),
        }
    }

    /// Acknowledges a password-reset request.
    ///
    /// There is no mail infrastructure here; the provider verifies the
    /// account exists and logs the request.
    pub async fn request_password_reset(&self, email: &str) -> AuthResult<()> {
        let email = email.trim();

        if self
            .db
            .users()
            .get_credential_by_email(email)
            .await?
            .is_none()
        {
            return Err(AuthError::UserNotFound);
        }

        info!(email = %email, "Password reset requested");
        Ok(())
    }

    /// Changes a password after re-verifying the old one.
    pub async fn change_password(&self, uid: &str, old: &str, new: &str) -> AuthResult<()> {
        validate_password(new).map_err(|_| AuthError::WeakPassword)?;

        let profile = self
            .db
            .users()
            .get_by_uid(uid)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let credential = self
            .db
            .users()
            .get_credential_by_email(&profile.email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if !verify_password(old, &credential.password_hash)? {
            return Err(AuthError::WrongPassword);
        }

        let password_hash = hash_password(new)?;
        self.db.users().set_password_hash(uid, &password_hash).await?;

        info!(uid = %uid, "Password changed");
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    fn start_session(&self, profile: &UserProfile) {
        let now = Utc::now();
        let session = Session {
            uid: profile.uid.clone(),
            email: profile.email.clone(),
            issued_at: now,
            expires_at: now
                + chrono::Duration::from_std(self.session_ttl)
                    .unwrap_or_else(|_| chrono::Duration::hours(24)),
        };
        self.sessions.send_replace(Some(session));
    }

    fn check_attempts(&self, email: &str) -> AuthResult<()> {
        let attempts = self.attempts.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(window) = attempts.get(&normalize_email(email)) {
            let cooled_off = Utc::now()
                >= window.last_failure
                    + chrono::Duration::from_std(ATTEMPT_COOLDOWN)
                        .unwrap_or_else(|_| chrono::Duration::minutes(5));
            if window.failures >= MAX_FAILED_ATTEMPTS && !cooled_off {
                return Err(AuthError::TooManyRequests);
            }
        }
        Ok(())
    }

    fn record_failure(&self, email: &str) {
        let mut attempts = self.attempts.lock().unwrap_or_else(|e| e.into_inner());
        let window = attempts
            .entry(normalize_email(email))
            .or_insert(AttemptWindow {
                failures: 0,
                last_failure: Utc::now(),
            });
        // A failure after the cooldown starts a fresh window
        let cooled_off = Utc::now()
            >= window.last_failure
                + chrono::Duration::from_std(ATTEMPT_COOLDOWN)
                    .unwrap_or_else(|_| chrono::Duration::minutes(5));
        if window.failures >= MAX_FAILED_ATTEMPTS && cooled_off {
            window.failures = 0;
        }
        window.failures += 1;
        window.last_failure = Utc::now();
    }

    fn clear_attempts(&self, email: &str) {
        let mut attempts = self.attempts.lock().unwrap_or_else(|e| e.into_inner());
        attempts.remove(&normalize_email(email));
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn hash_password(password: &str) -> AuthResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AuthError::Hashing(e.to_string()))?;
    Ok(hash.to_string())
}

fn verify_password(password: &str, stored: &str) -> AuthResult<bool> {
    let parsed = PasswordHash::new(stored).map_err(|e| AuthError::Hashing(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

// =============================================================================
// Unit Tests
// =============================================================================
