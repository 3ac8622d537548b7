//! In-memory upstream doubles with call accounting.
//!
//! The stubs record how often each operation ran and how many user lookups
//! overlapped, so tests can assert deduplication and the concurrency bound.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{Notify, mpsc};

use crate::domain::ports::{ListingSource, ListingSourceError, UserCache, UserSource, UserSourceError};
use crate::domain::{Listing, ListingQuery, NewListing, PageRequest, User, UserId};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Build a user, panicking on invalid fixture input.
pub fn user(raw_id: i64, name: &str) -> User {
    let id = UserId::new(raw_id).unwrap_or_else(|err| panic!("fixture user id {raw_id}: {err}"));
    User::new(id, name, 1_700_000_000_000_000, 1_700_000_000_000_000)
        .unwrap_or_else(|err| panic!("fixture user {raw_id}: {err}"))
}

/// Build a listing owned by `owner`.
pub fn listing(id: i64, owner: i64) -> Listing {
    let owner = UserId::new(owner).unwrap_or_else(|err| panic!("fixture owner {owner}: {err}"));
    Listing::new(id, owner, "rent", 1_000 * id, 1_700_000_000_000_000, 1_700_000_000_000_000)
}

/// Cache backed by a mutex-guarded map; first write wins.
#[derive(Debug, Default)]
pub struct InMemoryUserCache {
    entries: Mutex<HashMap<UserId, User>>,
}

impl InMemoryUserCache {
    /// Cache pre-populated with `users`.
    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        let entries = users.into_iter().map(|user| (user.id(), user)).collect();
        Self {
            entries: Mutex::new(entries),
        }
    }

    /// Number of cached users.
    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    /// Whether no users are cached.
    pub fn is_empty(&self) -> bool {
        lock(&self.entries).is_empty()
    }

    /// Whether `user_id` is cached.
    pub fn contains(&self, user_id: UserId) -> bool {
        lock(&self.entries).contains_key(&user_id)
    }
}

#[async_trait]
impl UserCache for InMemoryUserCache {
    async fn get(&self, user_id: UserId) -> Option<User> {
        lock(&self.entries).get(&user_id).cloned()
    }

    async fn insert(&self, user: User) -> User {
        lock(&self.entries)
            .entry(user.id())
            .or_insert(user)
            .clone()
    }
}

/// Listing source returning a fixed page.
#[derive(Debug)]
pub struct StubListingSource {
    page: Result<Vec<Listing>, ListingSourceError>,
    create_result: Option<ListingSourceError>,
    queries: Mutex<Vec<ListingQuery>>,
    created: Mutex<Vec<NewListing>>,
}

impl StubListingSource {
    /// Source whose every page is `listings`.
    pub fn with_page(listings: Vec<Listing>) -> Self {
        Self {
            page: Ok(listings),
            create_result: None,
            queries: Mutex::new(Vec::new()),
            created: Mutex::new(Vec::new()),
        }
    }

    /// Source whose page fetch always fails.
    pub fn failing(error: ListingSourceError) -> Self {
        Self {
            page: Err(error),
            ..Self::with_page(Vec::new())
        }
    }

    /// Make listing creation fail with `error`.
    #[must_use]
    pub fn with_create_failure(mut self, error: ListingSourceError) -> Self {
        self.create_result = Some(error);
        self
    }

    /// Queries seen so far.
    pub fn queries(&self) -> Vec<ListingQuery> {
        lock(&self.queries).clone()
    }

    /// Number of create calls seen so far.
    pub fn create_calls(&self) -> usize {
        lock(&self.created).len()
    }
}

#[async_trait]
impl ListingSource for StubListingSource {
    async fn fetch_listings_page(
        &self,
        query: &ListingQuery,
    ) -> Result<Vec<Listing>, ListingSourceError> {
        lock(&self.queries).push(*query);
        let listings = self.page.clone()?;
        Ok(match query.user_filter {
            Some(owner) => listings
                .into_iter()
                .filter(|listing| listing.user_id() == owner)
                .collect(),
            None => listings,
        })
    }

    async fn create_listing(&self, listing: &NewListing) -> Result<Listing, ListingSourceError> {
        let next_id = {
            let mut created = lock(&self.created);
            created.push(listing.clone());
            i64::try_from(created.len()).unwrap_or(i64::MAX) + 100
        };
        if let Some(error) = &self.create_result {
            return Err(error.clone());
        }
        Ok(Listing::new(
            next_id,
            listing.user_id(),
            listing.listing_type(),
            listing.price(),
            0,
            0,
        ))
    }
}

/// Gate that parks each user lookup until released.
#[derive(Debug)]
pub struct LookupGate {
    entered: mpsc::UnboundedSender<UserId>,
    release: Arc<Notify>,
}

impl LookupGate {
    /// Gate reporting entries on `entered` and waiting on `release`.
    pub fn new(entered: mpsc::UnboundedSender<UserId>, release: Arc<Notify>) -> Self {
        Self { entered, release }
    }
}

/// User source backed by a map, with per-id call counts.
#[derive(Debug, Default)]
pub struct StubUserSource {
    users: HashMap<UserId, User>,
    failures: HashMap<UserId, UserSourceError>,
    calls: Mutex<HashMap<UserId, usize>>,
    created: Mutex<Vec<String>>,
    active: AtomicUsize,
    max_active: AtomicUsize,
    delay: Option<Duration>,
    gate: Option<LookupGate>,
}

impl StubUserSource {
    /// Source that knows `users`.
    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        Self {
            users: users.into_iter().map(|user| (user.id(), user)).collect(),
            ..Self::default()
        }
    }

    /// Make lookups for `user_id` fail with `error`.
    #[must_use]
    pub fn with_failure(mut self, user_id: UserId, error: UserSourceError) -> Self {
        self.failures.insert(user_id, error);
        self
    }

    /// Hold every successful lookup for `delay` before answering.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Park every lookup on `gate`.
    #[must_use]
    pub fn with_gate(mut self, gate: LookupGate) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Lookups issued for `user_id`.
    pub fn calls_for(&self, user_id: UserId) -> usize {
        lock(&self.calls).get(&user_id).copied().unwrap_or(0)
    }

    /// Lookups issued across all ids.
    pub fn total_calls(&self) -> usize {
        lock(&self.calls).values().sum()
    }

    /// Highest number of overlapping lookups observed.
    pub fn max_active(&self) -> usize {
        self.max_active.load(Ordering::SeqCst)
    }

    /// Names passed to `create_user`.
    pub fn created_names(&self) -> Vec<String> {
        lock(&self.created).clone()
    }
}

#[async_trait]
impl UserSource for StubUserSource {
    async fn fetch_user_by_id(&self, user_id: UserId) -> Result<User, UserSourceError> {
        *lock(&self.calls).entry(user_id).or_insert(0) += 1;
        let active_now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(active_now, Ordering::SeqCst);

        if let Some(gate) = &self.gate {
            let released = gate.release.notified();
            tokio::pin!(released);
            released.as_mut().enable();
            gate.entered.send(user_id).ok();
            released.await;
        }
        if let Some(error) = self.failures.get(&user_id) {
            self.active.fetch_sub(1, Ordering::SeqCst);
            return Err(error.clone());
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.active.fetch_sub(1, Ordering::SeqCst);

        self.users
            .get(&user_id)
            .cloned()
            .ok_or_else(|| UserSourceError::not_found(user_id))
    }

    async fn fetch_users_page(&self, page: &PageRequest) -> Result<Vec<User>, UserSourceError> {
        let mut users: Vec<_> = self.users.values().cloned().collect();
        users.sort_by_key(User::id);
        let size = usize::try_from(page.page_size()).unwrap_or(usize::MAX);
        let skip = usize::try_from(page.page_num() - 1)
            .unwrap_or(usize::MAX)
            .saturating_mul(size);
        Ok(users.into_iter().skip(skip).take(size).collect())
    }

    async fn create_user(&self, name: &str) -> Result<User, UserSourceError> {
        let next_id = {
            let mut created = lock(&self.created);
            created.push(name.to_owned());
            i64::try_from(created.len()).unwrap_or(i64::MAX) + 1_000
        };
        let id = UserId::new(next_id).map_err(|err| UserSourceError::decode(err.to_string()))?;
        User::new(id, name, 0, 0).map_err(|err| UserSourceError::decode(err.to_string()))
    }
}
