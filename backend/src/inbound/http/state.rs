//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain services and remain testable without I/O.

use std::sync::Arc;

use crate::domain::{ListingEnrichmentService, UserDirectoryService};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Listing reads and creation.
    pub listings: Arc<ListingEnrichmentService>,
    /// User creation.
    pub users: Arc<UserDirectoryService>,
}

impl HttpState {
    /// Bundle the services handed to every handler.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use public_api::domain::ports::{FixtureListingSource, FixtureUserCache, FixtureUserSource};
    /// use public_api::domain::{
    ///     ListingEnrichmentConfig, ListingEnrichmentService, UpstreamFetcher, UserDirectoryService,
    /// };
    /// use public_api::inbound::http::HttpState;
    ///
    /// let users = Arc::new(FixtureUserSource);
    /// let fetcher = UpstreamFetcher::new(Arc::new(FixtureListingSource), users.clone());
    /// let listings = ListingEnrichmentService::new(
    ///     fetcher,
    ///     Arc::new(FixtureUserCache),
    ///     ListingEnrichmentConfig::default(),
    /// );
    /// let _state = HttpState::new(Arc::new(listings), Arc::new(UserDirectoryService::new(users)));
    /// ```
    #[must_use]
    pub fn new(listings: Arc<ListingEnrichmentService>, users: Arc<UserDirectoryService>) -> Self {
        Self { listings, users }
    }
}
