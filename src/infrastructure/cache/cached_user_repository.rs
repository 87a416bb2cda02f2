//! Read-through, write-invalidate cache in front of a [`UserRepository`].
//!
//! [`CachingUserRepository`] implements the same trait as the repository it
//! wraps, so it is bound in its place at startup. Reads are served from the
//! cache substrate when possible and populate it on miss; mutations always go
//! to the wrapped repository and then delete the keys they made stale.
//!
//! # Invalidation
//!
//! | Operation       | Keys deleted on success                                        |
//! |-----------------|----------------------------------------------------------------|
//! | `create`        | `all`                                                          |
//! | `update_by_id`  | `by-id:<id>`, `all`, email key of the old email, of the new one |
//! | `delete_by_id`  | `by-id:<id>`, `all`, email key of the old email                 |
//!
//! The old email comes from a read made *before* delegating the mutation,
//! because afterwards the store can no longer tell what it was.
//!
//! # Consistency
//!
//! The mutation and the deletes that follow are not atomic. A reader racing a
//! writer can see the previous value until the deletes land, and a crash in
//! between leaves a stale entry that only disappears at TTL expiry. Absent
//! results are never cached, so a user created after a failed lookup is
//! visible immediately.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use super::keys;
use super::service::{CacheError, CacheService};
use crate::domain::entities::{NewUser, User, UserPatch};
use crate::domain::repositories::UserRepository;
use crate::error::AppError;

/// What a cache entry holds. The email index stores only an id so a user is
/// never cached under two keys.
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
enum CachedValue {
    User(User),
    Users(Vec<User>),
    UserId(i64),
}

/// Borrowed twin of [`CachedValue`] used when writing, with the same encoding.
#[derive(Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
enum CachedRef<'a> {
    User(&'a User),
    Users(&'a [User]),
    UserId(i64),
}

fn record_lookup(key: &str, hit: bool) {
    let family = keys::family(key);
    if hit {
        debug!(key, "Cache HIT");
        metrics::counter!("user_cache_hits_total", "family" => family).increment(1);
    } else {
        debug!(key, "Cache MISS");
        metrics::counter!("user_cache_misses_total", "family" => family).increment(1);
    }
}

/// Cache-aside decorator over any [`UserRepository`].
///
/// All entries share one TTL. The cache handle is injected, so several
/// decorators (or processes) may share a substrate: key derivation is
/// deterministic.
pub struct CachingUserRepository<R: UserRepository + ?Sized> {
    inner: Arc<R>,
    cache: Arc<dyn CacheService>,
    ttl: Duration,
}

impl<R: UserRepository + ?Sized> CachingUserRepository<R> {
    /// Wraps `inner`, caching its reads in `cache` for `ttl`.
    pub fn new(inner: Arc<R>, cache: Arc<dyn CacheService>, ttl: Duration) -> Self {
        Self { inner, cache, ttl }
    }

    /// TTL applied to every entry.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Drops every entry derived from `user`: its id, its email and the listing.
    ///
    /// For out-of-band changes made directly in the database.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the cache substrate fails.
    pub async fn evict_user(&self, user: &User) -> Result<(), AppError> {
        self.invalidate(&[
            keys::by_id(user.id),
            keys::ALL_USERS.to_string(),
            keys::by_email(&user.email),
        ])
        .await
    }

    async fn lookup(&self, key: &str) -> Result<Option<CachedValue>, AppError> {
        let Some(raw) = self.cache.get(key).await? else {
            return Ok(None);
        };

        match serde_json::from_str::<CachedValue>(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                // Overwritten by the repopulating read.
                warn!(key, error = %e, "Ignoring undecodable cache entry");
                Ok(None)
            }
        }
    }

    async fn store(&self, key: &str, value: CachedRef<'_>) -> Result<(), AppError> {
        let raw = serde_json::to_string(&value)
            .map_err(|e| CacheError::SerializationError(e.to_string()))?;
        self.cache.set(key, &raw, self.ttl).await?;
        debug!(key, ttl_seconds = self.ttl.as_secs(), "Cache SET");
        Ok(())
    }

    async fn invalidate(&self, stale: &[String]) -> Result<(), AppError> {
        for key in stale {
            self.cache.delete(key).await?;
            debug!(key = key.as_str(), "Cache INVALIDATE");
            metrics::counter!("user_cache_invalidations_total", "family" => keys::family(key))
                .increment(1);
        }
        Ok(())
    }
}

#[async_trait]
impl<R: UserRepository + ?Sized> UserRepository for CachingUserRepository<R> {
    async fn list_all(&self) -> Result<Vec<User>, AppError> {
        if let Some(CachedValue::Users(users)) = self.lookup(keys::ALL_USERS).await? {
            record_lookup(keys::ALL_USERS, true);
            return Ok(users);
        }
        record_lookup(keys::ALL_USERS, false);

        let users = self.inner.list_all().await?;
        self.store(keys::ALL_USERS, CachedRef::Users(&users)).await?;
        Ok(users)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        let key = keys::by_id(id);

        if let Some(CachedValue::User(user)) = self.lookup(&key).await? {
            record_lookup(&key, true);
            return Ok(Some(user));
        }
        record_lookup(&key, false);

        let Some(user) = self.inner.find_by_id(id).await? else {
            return Ok(None);
        };

        self.store(&key, CachedRef::User(&user)).await?;
        Ok(Some(user))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let key = keys::by_email(email);

        if let Some(CachedValue::UserId(id)) = self.lookup(&key).await? {
            record_lookup(&key, true);
            return self.find_by_id(id).await;
        }
        record_lookup(&key, false);

        let Some(user) = self.inner.find_by_email(email).await? else {
            return Ok(None);
        };

        self.store(&key, CachedRef::UserId(user.id)).await?;
        self.find_by_id(user.id).await
    }

    async fn create(&self, new_user: NewUser) -> Result<User, AppError> {
        let user = self.inner.create(new_user).await?;
        self.invalidate(&[keys::ALL_USERS.to_string()]).await?;
        Ok(user)
    }

    async fn update_by_id(&self, id: i64, patch: UserPatch) -> Result<bool, AppError> {
        let before = self.find_by_id(id).await?;
        let new_email_key = patch.email.as_deref().map(keys::by_email);

        if !self.inner.update_by_id(id, patch).await? {
            return Ok(false);
        }

        let mut stale = vec![keys::by_id(id), keys::ALL_USERS.to_string()];
        if let Some(before) = &before {
            stale.push(keys::by_email(&before.email));
        }
        if let Some(new_email_key) = new_email_key {
            stale.push(new_email_key);
        }
        self.invalidate(&stale).await?;

        Ok(true)
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool, AppError> {
        let before = self.find_by_id(id).await?;

        if !self.inner.delete_by_id(id).await? {
            return Ok(false);
        }

        let mut stale = vec![keys::by_id(id), keys::ALL_USERS.to_string()];
        if let Some(before) = &before {
            stale.push(keys::by_email(&before.email));
        }
        self.invalidate(&stale).await?;

        Ok(true)
    }
}
