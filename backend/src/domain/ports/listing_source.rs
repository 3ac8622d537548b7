//! Driven port for the upstream listing service.
//!
//! The domain owns the query shape and the error taxonomy so the enrichment
//! service stays independent of the wire protocol.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{Listing, ListingQuery, NewListing};

define_port_error! {
    /// Errors surfaced while calling the listing service.
    pub enum ListingSourceError {
        /// Network transport failed before a response arrived.
        Transport { message: String } =>
            "listing service transport failed: {message}",
        /// The call exceeded the configured timeout.
        Timeout { message: String } =>
            "listing service timed out: {message}",
        /// The service answered with an unexpected status.
        Status { status: u16, message: String } =>
            "listing service returned status {status}: {message}",
        /// The response body could not be decoded.
        Decode { message: String } =>
            "listing service response decode failed: {message}",
    }
}

/// Port for reading and creating listings.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Fetch one page of listings in upstream order.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// use public_api::domain::ListingQuery;
    /// use public_api::domain::ports::{FixtureListingSource, ListingSource};
    ///
    /// let listings = FixtureListingSource
    ///     .fetch_listings_page(&ListingQuery::default())
    ///     .await?;
    /// assert!(listings.is_empty());
    /// # Ok::<(), public_api::domain::ports::ListingSourceError>(())
    /// ```
    async fn fetch_listings_page(
        &self,
        query: &ListingQuery,
    ) -> Result<Vec<Listing>, ListingSourceError>;

    /// Persist a new listing and return the stored record.
    async fn create_listing(&self, listing: &NewListing) -> Result<Listing, ListingSourceError>;
}

/// Fixture source with no stored listings.
///
/// Creation echoes the request back with identifier `1`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureListingSource;

#[async_trait]
impl ListingSource for FixtureListingSource {
    async fn fetch_listings_page(
        &self,
        _query: &ListingQuery,
    ) -> Result<Vec<Listing>, ListingSourceError> {
        Ok(Vec::new())
    }

    async fn create_listing(&self, listing: &NewListing) -> Result<Listing, ListingSourceError> {
        Ok(Listing::new(
            1,
            listing.user_id(),
            listing.listing_type(),
            listing.price(),
            0,
            0,
        ))
    }
}
