//! # User Repository
//!
//! Profile documents and wishlist persistence.
//!
//! ## Document Shape
//! One row per user: profile fields plus the wishlist as a JSON id array
//! and the argon2 password hash. The hash is read only by the identity
//! provider and never crosses this crate's public API as part of a
//! profile.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use techmart_core::{UserProfile, UserRole};

// =============================================================================
// Row Mapping
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    uid: String,
    email: String,
    password_hash: String,
    name: String,
    role: String,
    avatar: Option<String>,
    phone: Option<String>,
    address: Option<String>,
    wishlist: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_credential(self) -> DbResult<Credential> {
        let wishlist: Vec<String> = serde_json::from_str(&self.wishlist)
            .map_err(|e| DbError::corrupt("User", &self.uid, e.to_string()))?;

        Ok(Credential {
            password_hash: self.password_hash,
            profile: UserProfile {
                uid: self.uid,
                email: self.email,
                name: self.name,
                role: UserRole::parse(&self.role),
                avatar: self.avatar,
                phone: self.phone,
                address: self.address,
                wishlist,
                created_at: self.created_at,
                updated_at: self.updated_at,
            },
        })
    }
}

/// A profile plus its stored password hash. Only the identity provider
/// sees this; everything else works with [`UserProfile`].
#[derive(Debug, Clone)]
pub struct Credential {
    pub password_hash: String,
    pub profile: UserProfile,
}

const USER_COLUMNS: &str = "uid, email, password_hash, name, role, avatar, phone, address, \
     wishlist, created_at, updated_at";

// =============================================================================
// Repository
// =============================================================================

/// Repository for user document operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Inserts a new user document with its password hash.
    ///
    /// ## Returns
    /// * `Ok(())` - User created
    /// * `Err(DbError::UniqueViolation)` - Email already registered
    pub async fn create(&self, profile: &UserProfile, password_hash: &str) -> DbResult<()> {
        debug!(uid = %profile.uid, "Creating user");

        let wishlist = serde_json::to_string(&profile.wishlist)
            .map_err(|e| DbError::Internal(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO users (
                uid, email, password_hash, name, role,
                avatar, phone, address, wishlist,
                created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5,
                ?6, ?7, ?8, ?9,
                ?10, ?11
            )
            "#,
        )
        .bind(&profile.uid)
        .bind(&profile.email)
        .bind(password_hash)
        .bind(&profile.name)
        .bind(profile.role.as_str())
        .bind(&profile.avatar)
        .bind(&profile.phone)
        .bind(&profile.address)
        .bind(wishlist)
        .bind(profile.created_at)
        .bind(profile.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets a user profile by uid.
    pub async fn get_by_uid(&self, uid: &str) -> DbResult<Option<UserProfile>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE uid = ?1");

        let row: Option<UserRow> = sqlx::query_as(&sql)
            .bind(uid)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row
            .map(UserRow::into_credential)
            .transpose()?
            .map(|c| c.profile))
    }

    /// Gets a user's profile and password hash by email (case-insensitive).
    ///
    /// For the identity provider's login path only.
    pub async fn get_credential_by_email(&self, email: &str) -> DbResult<Option<Credential>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1");

        let row: Option<UserRow> = sqlx::query_as(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        row.map(UserRow::into_credential).transpose()
    }

    /// Updates the editable profile fields.
    pub async fn update_profile(
        &self,
        uid: &str,
        name: &str,
        avatar: Option<&str>,
        phone: Option<&str>,
        address: Option<&str>,
    ) -> DbResult<()> {
        debug!(uid = %uid, "Updating profile");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE users SET
                name = ?2,
                avatar = ?3,
                phone = ?4,
                address = ?5,
                updated_at = ?6
            WHERE uid = ?1
            "#,
        )
        .bind(uid)
        .bind(name)
        .bind(avatar)
        .bind(phone)
        .bind(address)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", uid));
        }

        Ok(())
    }

    /// Replaces the stored wishlist with the given id set.
    ///
    /// The whole array is written at once, the way the facade's local set
    /// is mirrored after every toggle.
    pub async fn set_wishlist(&self, uid: &str, product_ids: &[String]) -> DbResult<()> {
        debug!(uid = %uid, count = product_ids.len(), "Writing wishlist");

        let wishlist =
            serde_json::to_string(product_ids).map_err(|e| DbError::Internal(e.to_string()))?;
        let now = Utc::now();

        let result =
            sqlx::query("UPDATE users SET wishlist = ?2, updated_at = ?3 WHERE uid = ?1")
                .bind(uid)
                .bind(wishlist)
                .bind(now)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", uid));
        }

        Ok(())
    }

    /// Reads the stored wishlist ids.
    pub async fn get_wishlist(&self, uid: &str) -> DbResult<Vec<String>> {
        let profile = self
            .get_by_uid(uid)
            .await?
            .ok_or_else(|| DbError::not_found("User", uid))?;

        Ok(profile.wishlist)
    }

    /// Replaces the stored password hash (password change/reset).
    pub async fn set_password_hash(&self, uid: &str, password_hash: &str) -> DbResult<()> {
        debug!(uid = %uid, "Replacing password hash");

        let now = Utc::now();

        let result =
            sqlx::query("UPDATE users SET password_hash = ?2, updated_at = ?3 WHERE uid = ?1")
                .bind(uid)
                .bind(password_hash)
                .bind(now)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", uid));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    fn profile(uid: &str, email: &str) -> UserProfile {
        UserProfile {
            uid: uid.to_string(),
            email: email.to_string(),
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

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_create_and_read() {
        let db = test_db().await;
        let repo = db.users();

        repo.create(&profile("u-1", "bat@example.mn"), "hash")
            .await
            .unwrap();

        let read = repo.get_by_uid("u-1").await.unwrap().unwrap();
        assert_eq!(read.email, "bat@example.mn");
        assert_eq!(read.role, UserRole::User);
        assert!(read.wishlist.is_empty());

        let cred = repo
            .get_credential_by_email("bat@example.mn")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(cred.password_hash, "hash");
    }

    #[tokio::test]
    async fn test_email_lookup_is_case_insensitive() {
        let db = test_db().await;
        let repo = db.users();

        repo.create(&profile("u-1", "Bat@Example.mn"), "hash")
            .await
            .unwrap();

        assert!(repo
            .get_credential_by_email("bat@example.mn")
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let db = test_db().await;
        let repo = db.users();

        repo.create(&profile("u-1", "bat@example.mn"), "hash")
            .await
            .unwrap();
        let err = repo
            .create(&profile("u-2", "bat@example.mn"), "hash")
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_wishlist_round_trip() {
        let db = test_db().await;
        let repo = db.users();

        repo.create(&profile("u-1", "bat@example.mn"), "hash")
            .await
            .unwrap();

        let ids = vec!["p-1".to_string(), "p-2".to_string()];
        repo.set_wishlist("u-1", &ids).await.unwrap();

        let read = repo.get_wishlist("u-1").await.unwrap();
        assert_eq!(read, ids);

        repo.set_wishlist("u-1", &[]).await.unwrap();
        assert!(repo.get_wishlist("u-1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_profile() {
        let db = test_db().await;
        let repo = db.users();

        repo.create(&profile("u-1", "bat@example.mn"), "hash")
            .await
            .unwrap();

        repo.update_profile("u-1", "Болд", None, Some("99112233"), None)
            .await
            .unwrap();

        let read = repo.get_by_uid("u-1").await.unwrap().unwrap();
        assert_eq!(read.name, "Болд");
        assert_eq!(read.phone.as_deref(), Some("99112233"));

        let err = repo
            .update_profile("ghost", "X", None, None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
