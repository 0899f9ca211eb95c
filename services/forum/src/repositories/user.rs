//! User repository for database operations
//!
//! Row access goes through [`UserStore`]; [`UserRepository`] layers the
//! account rules on top of it (email normalization, password hashing) and
//! runs the avatar lifecycle hooks around updates and deletes.

use std::sync::Arc;

use anyhow::Result;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use async_trait::async_trait;
use common::media::{DEFAULT_AVATAR, FileStore};
use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::avatar::{AvatarCleanup, AvatarLifecycle, LifecycleError, UserLifecycle};
use crate::models::{NewUser, NewUserRecord, UpdateUser, User};
use crate::validation::{
    normalize_email, validate_avatar, validate_email, validate_name, validate_password,
};

/// Row-level access to the users table
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a row and return it with its generated id
    async fn insert(&self, record: &NewUserRecord) -> Result<User>;

    /// Fetch the persisted row for `id`
    async fn fetch(&self, id: Uuid) -> Result<Option<User>>;

    /// Fetch the row with this (normalized) email
    async fn fetch_by_email(&self, email: &str) -> Result<Option<User>>;

    /// All rows, newest first
    async fn fetch_all(&self) -> Result<Vec<User>>;

    /// Overwrite the row for `user.id`, writing it back if it is gone
    async fn upsert(&self, user: &User) -> Result<User>;

    /// Delete the row for `id`
    async fn remove(&self, id: Uuid) -> Result<bool>;
}

/// [`UserStore`] backed by PostgreSQL
#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    /// Create a new store over `pool`
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn insert(&self, record: &NewUserRecord) -> Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash, name, bio, avatar, is_staff, is_superuser)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, email, name, bio, avatar, password_hash, is_active, is_staff,
                      is_superuser, last_login, date_joined
            "#,
        )
        .bind(&record.email)
        .bind(&record.password_hash)
        .bind(&record.name)
        .bind(&record.bio)
        .bind(&record.avatar)
        .bind(record.is_staff)
        .bind(record.is_superuser)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    async fn fetch(&self, id: Uuid) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, name, bio, avatar, password_hash, is_active, is_staff,
                   is_superuser, last_login, date_joined
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn fetch_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, name, bio, avatar, password_hash, is_active, is_staff,
                   is_superuser, last_login, date_joined
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn fetch_all(&self) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, name, bio, avatar, password_hash, is_active, is_staff,
                   is_superuser, last_login, date_joined
            FROM users
            ORDER BY date_joined DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn upsert(&self, user: &User) -> Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, email, name, bio, avatar, password_hash, is_active, is_staff,
                               is_superuser, last_login, date_joined)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (id) DO UPDATE
            SET email = EXCLUDED.email, name = EXCLUDED.name, bio = EXCLUDED.bio,
                avatar = EXCLUDED.avatar, password_hash = EXCLUDED.password_hash,
                is_active = EXCLUDED.is_active, is_staff = EXCLUDED.is_staff,
                is_superuser = EXCLUDED.is_superuser, last_login = EXCLUDED.last_login
            RETURNING id, email, name, bio, avatar, password_hash, is_active, is_staff,
                      is_superuser, last_login, date_joined
            "#,
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.name)
        .bind(&user.bio)
        .bind(&user.avatar)
        .bind(&user.password_hash)
        .bind(user.is_active)
        .bind(user.is_staff)
        .bind(user.is_superuser)
        .bind(user.last_login)
        .bind(user.date_joined)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    async fn remove(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Result of [`UserRepository::save`]
#[derive(Debug)]
pub struct Saved {
    pub user: User,
    pub avatar: AvatarCleanup,
}

/// User repository
#[derive(Clone)]
pub struct UserRepository {
    store: Arc<dyn UserStore>,
    lifecycle: Arc<dyn UserLifecycle>,
}

impl UserRepository {
    /// Create a new user repository over PostgreSQL, removing stale avatars
    /// from `files`
    pub fn new(pool: PgPool, files: Arc<dyn FileStore>) -> Self {
        Self::with_store(
            Arc::new(PgUserStore::new(pool)),
            Arc::new(AvatarLifecycle::new(files)),
        )
    }

    /// Create a user repository from its parts
    pub fn with_store(store: Arc<dyn UserStore>, lifecycle: Arc<dyn UserLifecycle>) -> Self {
        Self { store, lifecycle }
    }

    /// Register a regular user
    pub async fn create_user(&self, new_user: &NewUser) -> Result<User> {
        self.insert(new_user, false).await
    }

    /// Register a user with staff and superuser flags set
    pub async fn create_superuser(&self, new_user: &NewUser) -> Result<User> {
        self.insert(new_user, true).await
    }

    async fn insert(&self, new_user: &NewUser, privileged: bool) -> Result<User> {
        let email = normalize_email(&new_user.email);
        validate_email(&email)?;
        validate_password(&new_user.password)?;
        if let Some(name) = &new_user.name {
            validate_name("name", name)?;
        }

        let avatar = match new_user.avatar.as_deref().map(str::trim) {
            Some(avatar) if !avatar.is_empty() => avatar.to_string(),
            _ => DEFAULT_AVATAR.to_string(),
        };
        validate_avatar(&avatar)?;

        info!("Creating new user: {}", email);

        let record = NewUserRecord {
            email,
            password_hash: hash_password(&new_user.password)?,
            name: new_user.name.clone(),
            bio: new_user.bio.clone(),
            avatar,
            is_staff: privileged,
            is_superuser: privileged,
        };

        self.store.insert(&record).await
    }

    /// Find a user by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        self.store.fetch(id).await
    }

    /// Find a user by email, normalizing it first
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        self.store.fetch_by_email(&normalize_email(email)).await
    }

    /// Get all users
    pub async fn list(&self) -> Result<Vec<User>> {
        self.store.fetch_all().await
    }

    /// Persist changes to an existing user.
    ///
    /// The stored version is loaded first so a replaced avatar file can be
    /// removed. The record is written even when that lookup misses, and
    /// nothing that goes wrong with the file stops the write.
    pub async fn save(&self, user: &User) -> Result<Saved> {
        let stored = self.store.fetch(user.id).await?;
        self.persist(stored.as_ref(), user).await
    }

    async fn persist(&self, stored: Option<&User>, user: &User) -> Result<Saved> {
        let avatar = match stored {
            Some(old) => self.lifecycle.after_load_compare(old, user),
            None => {
                let miss = LifecycleError::LookupMiss(user.id);
                debug!("Skipping avatar reconciliation: {}", miss);
                AvatarCleanup::Failed(miss)
            }
        };

        let user = self.store.upsert(user).await?;
        Ok(Saved { user, avatar })
    }

    /// Apply a profile edit and save it. `None` if the user does not exist.
    pub async fn update_profile(&self, id: Uuid, changes: &UpdateUser) -> Result<Option<Saved>> {
        let Some(stored) = self.store.fetch(id).await? else {
            return Ok(None);
        };
        let mut user = stored.clone();

        if let Some(email) = &changes.email {
            let email = normalize_email(email);
            validate_email(&email)?;
            user.email = email;
        }

        if let Some(name) = &changes.name {
            validate_name("name", name)?;
            user.name = Some(name.trim().to_string());
        }

        if let Some(bio) = &changes.bio {
            user.bio = Some(bio.clone());
        }

        if let Some(avatar) = &changes.avatar {
            let avatar = avatar.trim();
            validate_avatar(avatar)?;
            user.avatar = if avatar.is_empty() {
                DEFAULT_AVATAR.to_string()
            } else {
                avatar.to_string()
            };
        }

        info!("Updating profile of user {}", id);
        self.persist(Some(&stored), &user).await.map(Some)
    }

    /// Verify a user's password
    pub fn verify_password(&self, user: &User, password: &str) -> Result<bool> {
        let parsed_hash = PasswordHash::new(&user.password_hash)
            .map_err(|e| anyhow::anyhow!("Failed to parse password hash: {}", e))?;

        let argon2 = Argon2::default();
        let result = argon2.verify_password(password.as_bytes(), &parsed_hash);

        Ok(result.is_ok())
    }

    /// Delete a user account along with its custom avatar file.
    ///
    /// The row is deleted whatever happened to the file.
    pub async fn delete(&self, user: &User) -> Result<AvatarCleanup> {
        info!("Deleting user {}", user.id);
        let avatar = self.lifecycle.before_delete(user);
        self.store.remove(user.id).await?;
        Ok(avatar)
    }
}

fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?
        .to_string();

    Ok(password_hash)
}
