//! Moka-backed implementation of the `UserCache` port.
//!
//! Capacity and time-to-live are optional. With neither set the cache keeps
//! every user for the life of the process. Insertion goes through moka's
//! entry API so the first writer for a key wins and racing writers get the
//! resident value back.

use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;

use crate::domain::ports::UserCache;
use crate::domain::{User, UserId};

/// Eviction policy for [`MokaUserCache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UserCachePolicy {
    /// Maximum number of cached users. `None` means unbounded.
    pub max_capacity: Option<u64>,
    /// Time after insertion at which an entry expires. `None` means never.
    pub time_to_live: Option<Duration>,
}

/// Concurrent user cache shared by all enrichment calls.
#[derive(Debug, Clone)]
pub struct MokaUserCache {
    inner: Cache<UserId, User>,
}

impl MokaUserCache {
    /// Build a cache with the given policy.
    ///
    /// # Examples
    /// ```
    /// use std::time::Duration;
    ///
    /// use public_api::outbound::cache::{MokaUserCache, UserCachePolicy};
    ///
    /// let cache = MokaUserCache::new(UserCachePolicy {
    ///     max_capacity: Some(10_000),
    ///     time_to_live: Some(Duration::from_secs(300)),
    /// });
    /// assert_eq!(cache.entry_count(), 0);
    /// ```
    #[must_use]
    pub fn new(policy: UserCachePolicy) -> Self {
        let mut builder = Cache::builder();
        if let Some(capacity) = policy.max_capacity {
            builder = builder.max_capacity(capacity);
        }
        if let Some(ttl) = policy.time_to_live {
            builder = builder.time_to_live(ttl);
        }
        Self {
            inner: builder.build(),
        }
    }

    /// Approximate number of cached users.
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.inner.entry_count()
    }
}

impl Default for MokaUserCache {
    fn default() -> Self {
        Self::new(UserCachePolicy::default())
    }
}

#[async_trait]
impl UserCache for MokaUserCache {
    async fn get(&self, user_id: UserId) -> Option<User> {
        self.inner.get(&user_id).await
    }

    async fn insert(&self, user: User) -> User {
        self.inner.entry(user.id()).or_insert(user).await.into_value()
    }
}
