//! Port for the shared user cache consulted during listing enrichment.
//!
//! Implementations must be safe for concurrent readers and writers. When two
//! writers race on the same key, the first stored value wins and later
//! writers receive it back from [`UserCache::insert`].

use async_trait::async_trait;

use crate::domain::{User, UserId};

/// Concurrent cache of users keyed by identifier.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserCache: Send + Sync {
    /// Look up a cached user.
    async fn get(&self, user_id: UserId) -> Option<User>;

    /// Store `user` unless an entry already exists, returning the resident
    /// value.
    async fn insert(&self, user: User) -> User;
}

/// Cache that never retains anything.
///
/// Every lookup misses, so each enrichment call hits the user service.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureUserCache;

#[async_trait]
impl UserCache for FixtureUserCache {
    async fn get(&self, _user_id: UserId) -> Option<User> {
        None
    }

    async fn insert(&self, user: User) -> User {
        user
    }
}
