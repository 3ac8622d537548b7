//! Reqwest-backed `ListingSource` adapter.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use tracing::{debug, warn};

use super::dto::{ListingEnvelope, ListingsEnvelope};
use super::transport::{
    TransportFailure, UpstreamClientError, UpstreamEndpoint, decode_json, map_transport_error,
    success_body,
};
use crate::domain::ports::{ListingSource, ListingSourceError};
use crate::domain::{Listing, ListingQuery, NewListing};

const SERVICE: &str = "listing service";

/// Listing service client.
///
/// Reads pages with `GET {base}/listings` and creates listings with a
/// form-encoded `POST {base}/listings`.
#[derive(Debug, Clone)]
pub struct ListingHttpSource {
    endpoint: UpstreamEndpoint,
}

impl ListingHttpSource {
    /// Build an adapter whose requests time out after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error when `base_url` cannot carry a path or the reqwest
    /// client cannot be constructed.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, UpstreamClientError> {
        Ok(Self {
            endpoint: UpstreamEndpoint::new(base_url, timeout)?,
        })
    }
}

#[async_trait]
impl ListingSource for ListingHttpSource {
    async fn fetch_listings_page(
        &self,
        query: &ListingQuery,
    ) -> Result<Vec<Listing>, ListingSourceError> {
        let mut params = vec![
            ("page_num", query.page.page_num().to_string()),
            ("page_size", query.page.page_size().to_string()),
        ];
        if let Some(owner) = query.user_filter {
            params.push(("user_id", owner.to_string()));
        }
        let url = self.endpoint.url(&["listings"]);
        debug!(%url, "requesting listings page");

        let response = self
            .endpoint
            .client()
            .get(url)
            .query(&params)
            .send()
            .await
            .map_err(|err| log_failure(map_transport_error(&err)))?;
        let body = success_body(response).await.map_err(log_failure)?;
        let envelope: ListingsEnvelope = decode_json(SERVICE, &body).map_err(log_failure)?;
        let listings = envelope
            .into_domain()
            .map_err(|message| log_failure(TransportFailure::Decode(message)))?;
        debug!(count = listings.len(), "fetched listings page");
        Ok(listings)
    }

    async fn create_listing(&self, listing: &NewListing) -> Result<Listing, ListingSourceError> {
        let form = [
            ("user_id", listing.user_id().to_string()),
            ("listing_type", listing.listing_type().to_owned()),
            ("price", listing.price().to_string()),
        ];
        let response = self
            .endpoint
            .client()
            .post(self.endpoint.url(&["listings"]))
            .form(&form)
            .send()
            .await
            .map_err(|err| log_failure(map_transport_error(&err)))?;
        let body = success_body(response).await.map_err(log_failure)?;
        let envelope: ListingEnvelope = decode_json(SERVICE, &body).map_err(log_failure)?;
        let created = envelope
            .listing
            .into_domain()
            .map_err(|message| log_failure(TransportFailure::Decode(message)))?;
        debug!(listing_id = created.id(), "listing service created listing");
        Ok(created)
    }
}

fn log_failure(failure: TransportFailure) -> ListingSourceError {
    let error = ListingSourceError::from(failure);
    warn!(error = %error, "listing service call failed");
    error
}
