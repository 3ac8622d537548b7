//! Listing enrichment: join a page of listings with their owners.
//!
//! The service reads one page from the listing source, resolves each distinct
//! owner at most once through the shared [`UserCache`], and pairs every
//! listing with its owner in upstream order. Any failed lookup voids the
//! whole page.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::ports::UserCache;
use crate::domain::{EnrichedListing, Listing, ListingQuery, NewListing, UpstreamFetcher};

mod error;
mod fan_out;

pub use error::ListingEnrichmentError;

/// Tuning for the enrichment fan-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingEnrichmentConfig {
    /// Upper bound on concurrent user-service calls within one enrichment
    /// call. Values below 1 are treated as 1.
    ///
    /// The bound is not shared: concurrent enrichment calls each get their own
    /// permits, so the user service may see up to this many lookups per
    /// in-flight request.
    pub max_concurrent_user_fetches: usize,
}

impl Default for ListingEnrichmentConfig {
    fn default() -> Self {
        Self {
            max_concurrent_user_fetches: 8,
        }
    }
}

/// Read-aggregation use case over the listing and user services.
pub struct ListingEnrichmentService {
    fetcher: UpstreamFetcher,
    cache: Arc<dyn UserCache>,
    config: ListingEnrichmentConfig,
}

impl ListingEnrichmentService {
    /// Build the service around an injected cache.
    pub fn new(
        fetcher: UpstreamFetcher,
        cache: Arc<dyn UserCache>,
        config: ListingEnrichmentConfig,
    ) -> Self {
        Self {
            fetcher,
            cache,
            config,
        }
    }

    /// Fetch a page of listings and attach each listing's owner.
    ///
    /// The result has one entry per listing, in upstream order. Cache entries
    /// written before a failure are kept.
    ///
    /// ```rust,ignore
    /// let enriched = service.get_enriched_listings(&ListingQuery::default()).await?;
    /// assert!(enriched.iter().all(|e| e.user().id() == e.listing().user_id()));
    /// ```
    pub async fn get_enriched_listings(
        &self,
        query: &ListingQuery,
    ) -> Result<Vec<EnrichedListing>, ListingEnrichmentError> {
        let listings = self
            .fetcher
            .fetch_listings_page(query)
            .await
            .map_err(|err| {
                warn!(error = %err, "listing page fetch failed");
                ListingEnrichmentError::Upstream(err)
            })?;

        if listings.is_empty() {
            debug!("listing page is empty");
            return Ok(Vec::new());
        }

        let owners: BTreeSet<_> = listings.iter().map(Listing::user_id).collect();
        let owner_count = owners.len();
        let users = fan_out::resolve_users(
            &self.fetcher,
            &self.cache,
            owners,
            self.config.max_concurrent_user_fetches,
        )
        .await?;

        let enriched = listings
            .into_iter()
            .map(|listing| {
                let owner = listing.user_id();
                let user = users.get(&owner).cloned().ok_or_else(|| {
                    ListingEnrichmentError::internal(format!("owner {owner} missing after join"))
                })?;
                EnrichedListing::new(listing, user)
                    .map_err(|err| ListingEnrichmentError::internal(err.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        info!(
            listings = enriched.len(),
            distinct_users = owner_count,
            "enriched listing page"
        );
        Ok(enriched)
    }

    /// Create a listing after confirming its owner exists.
    ///
    /// The owner is checked against the user service directly, bypassing the
    /// cache. The listing source is never called when the check fails.
    pub async fn create_listing(
        &self,
        listing: NewListing,
    ) -> Result<Listing, ListingEnrichmentError> {
        let user_id = listing.user_id();
        if let Err(source) = self.fetcher.fetch_user_by_id(user_id).await {
            if source.is_not_found() {
                debug!(user_id = user_id.get(), "rejecting listing for unknown user");
                return Err(ListingEnrichmentError::UserNotFound { user_id });
            }
            warn!(user_id = user_id.get(), error = %source, "owner check failed");
            return Err(ListingEnrichmentError::UserLookup { user_id, source });
        }

        let created = self
            .fetcher
            .create_listing(&listing)
            .await
            .map_err(ListingEnrichmentError::Upstream)?;
        info!(
            listing_id = created.id(),
            user_id = user_id.get(),
            "created listing"
        );
        Ok(created)
    }
}
