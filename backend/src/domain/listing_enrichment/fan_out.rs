//! Bounded, cancellable fan-out of user lookups.
//!
//! One task is spawned per distinct user id. Cache hits return without
//! touching the semaphore; misses take a permit before calling the user
//! service. The first failure cancels the shared token so queued and
//! in-flight lookups stop early, but every task is still joined before the
//! batch result is returned.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::ListingEnrichmentError;
use crate::domain::ports::{UserCache, UserSourceError};
use crate::domain::{TraceId, UpstreamFetcher, User, UserId};

/// Outcome of one lookup that did not produce a user.
#[derive(Debug)]
enum LookupFailure {
    Fetch(UserSourceError),
    Cancelled,
    PermitUnavailable,
}

/// Everything a lookup task needs, cloned into each task.
#[derive(Clone)]
struct LookupContext {
    fetcher: UpstreamFetcher,
    cache: Arc<dyn UserCache>,
    permits: Arc<Semaphore>,
    cancel: CancellationToken,
}

impl LookupContext {
    async fn resolve(&self, user_id: UserId) -> Result<User, LookupFailure> {
        if let Some(user) = self.cache.get(user_id).await {
            debug!(user_id = user_id.get(), "user cache hit");
            return Ok(user);
        }
        debug!(user_id = user_id.get(), "user cache miss");

        let _permit = tokio::select! {
            biased;
            () = self.cancel.cancelled() => return Err(LookupFailure::Cancelled),
            permit = self.permits.acquire() => {
                permit.map_err(|_| LookupFailure::PermitUnavailable)?
            }
        };

        let fetched = tokio::select! {
            biased;
            () = self.cancel.cancelled() => return Err(LookupFailure::Cancelled),
            result = self.fetcher.fetch_user_by_id(user_id) => {
                result.map_err(LookupFailure::Fetch)?
            }
        };

        Ok(self.cache.insert(fetched).await)
    }
}

/// Resolve every id in `user_ids`, all or nothing.
pub(super) async fn resolve_users(
    fetcher: &UpstreamFetcher,
    cache: &Arc<dyn UserCache>,
    user_ids: BTreeSet<UserId>,
    max_concurrent: usize,
) -> Result<HashMap<UserId, User>, ListingEnrichmentError> {
    let context = LookupContext {
        fetcher: fetcher.clone(),
        cache: Arc::clone(cache),
        permits: Arc::new(Semaphore::new(max_concurrent.max(1))),
        cancel: CancellationToken::new(),
    };

    let mut tasks = JoinSet::new();
    for user_id in user_ids.iter().copied() {
        let task_context = context.clone();
        tasks.spawn(TraceId::propagate(async move {
            (user_id, task_context.resolve(user_id).await)
        }));
    }

    let mut resolved = HashMap::with_capacity(user_ids.len());
    let mut first_failure: Option<ListingEnrichmentError> = None;
    let mut record_failure = |failure: ListingEnrichmentError| {
        if first_failure.is_none() {
            context.cancel.cancel();
            first_failure = Some(failure);
        }
    };

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((user_id, Ok(user))) => {
                resolved.insert(user_id, user);
            }
            Ok((user_id, Err(LookupFailure::Fetch(source)))) => {
                warn!(user_id = user_id.get(), error = %source, "user lookup failed");
                record_failure(ListingEnrichmentError::Aggregation { user_id, source });
            }
            // Only reachable once a sibling failure has been recorded.
            Ok((_, Err(LookupFailure::Cancelled))) => {
                record_failure(ListingEnrichmentError::internal(
                    "user lookup cancelled without a recorded failure",
                ));
            }
            Ok((_, Err(LookupFailure::PermitUnavailable))) => {
                record_failure(ListingEnrichmentError::internal(
                    "user lookup semaphore closed",
                ));
            }
            Err(join_error) => {
                warn!(error = %join_error, "user lookup task did not complete");
                record_failure(ListingEnrichmentError::internal(join_error.to_string()));
            }
        }
    }

    match first_failure {
        Some(failure) => Err(failure),
        None => Ok(resolved),
    }
}
