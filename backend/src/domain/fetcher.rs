//! Capability wrapper around the two upstream sources.
//!
//! The enrichment service only ever talks to the listing and user services
//! through this type, which keeps call-level logging in one place. Timeouts
//! are enforced by the adapters behind the ports.

use std::sync::Arc;

use tracing::debug;

use crate::domain::ports::{ListingSource, ListingSourceError, UserSource, UserSourceError};
use crate::domain::{Listing, ListingQuery, NewListing, User, UserId};

/// Shared handle to the listing and user sources.
#[derive(Clone)]
pub struct UpstreamFetcher {
    listings: Arc<dyn ListingSource>,
    users: Arc<dyn UserSource>,
}

impl UpstreamFetcher {
    /// Bundle the two sources.
    pub fn new(listings: Arc<dyn ListingSource>, users: Arc<dyn UserSource>) -> Self {
        Self { listings, users }
    }

    /// Fetch one page of listings.
    pub async fn fetch_listings_page(
        &self,
        query: &ListingQuery,
    ) -> Result<Vec<Listing>, ListingSourceError> {
        debug!(
            page_num = query.page.page_num(),
            page_size = query.page.page_size(),
            user_filter = query.user_filter.map(UserId::get),
            "fetching listings page"
        );
        self.listings.fetch_listings_page(query).await
    }

    /// Fetch one user by identifier.
    pub async fn fetch_user_by_id(&self, user_id: UserId) -> Result<User, UserSourceError> {
        debug!(user_id = user_id.get(), "fetching user");
        self.users.fetch_user_by_id(user_id).await
    }

    /// Create a listing through the listing source.
    pub async fn create_listing(&self, listing: &NewListing) -> Result<Listing, ListingSourceError> {
        debug!(user_id = listing.user_id().get(), "creating listing");
        self.listings.create_listing(listing).await
    }
}

impl std::fmt::Debug for UpstreamFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamFetcher").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PageRequest;
    use crate::domain::ports::{MockListingSource, MockUserSource};
    use mockall::predicate::eq;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn forwards_user_lookups_to_the_user_source() {
        let owner = UserId::new(7).expect("positive id");
        let mut users = MockUserSource::new();
        users
            .expect_fetch_user_by_id()
            .with(eq(owner))
            .times(1)
            .returning(move |id| Ok(User::new(id, "A", 0, 0).expect("valid user")));
        let fetcher = UpstreamFetcher::new(Arc::new(MockListingSource::new()), Arc::new(users));

        let user = fetcher.fetch_user_by_id(owner).await.expect("user");
        assert_eq!(user.name(), "A");
    }

    #[rstest]
    #[tokio::test]
    async fn forwards_listing_queries_unchanged() {
        let owner = UserId::new(3).expect("positive id");
        let query = ListingQuery::new(PageRequest::new(2, 5).expect("valid page"))
            .with_user_filter(owner);
        let mut listings = MockListingSource::new();
        listings
            .expect_fetch_listings_page()
            .withf(move |seen| *seen == query)
            .times(1)
            .returning(|_| Err(ListingSourceError::timeout("slow")));
        let fetcher = UpstreamFetcher::new(Arc::new(listings), Arc::new(MockUserSource::new()));

        let err = fetcher
            .fetch_listings_page(&query)
            .await
            .expect_err("propagates source error");
        assert_eq!(err, ListingSourceError::timeout("slow"));
    }
}
