//! Typed failures for the listing enrichment use case and their API mapping.

use serde_json::json;

use crate::domain::ports::{ListingSourceError, UserSourceError};
use crate::domain::{Error, UserId};

/// Failures surfaced by [`super::ListingEnrichmentService`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ListingEnrichmentError {
    /// The listing service failed while reading a page or creating a listing.
    #[error("listing service call failed: {0}")]
    Upstream(#[source] ListingSourceError),
    /// The first user fetch that failed within a batch.
    #[error("failed to resolve user {user_id}: {source}")]
    Aggregation {
        /// User whose fetch failed.
        user_id: UserId,
        /// Failure reported by the user source.
        #[source]
        source: UserSourceError,
    },
    /// A new listing referenced a user that does not exist.
    #[error("user {user_id} does not exist")]
    UserNotFound {
        /// Referenced user.
        user_id: UserId,
    },
    /// The user service could not confirm the owner of a new listing.
    #[error("could not verify user {user_id}: {source}")]
    UserLookup {
        /// Referenced user.
        user_id: UserId,
        /// Failure reported by the user source.
        #[source]
        source: UserSourceError,
    },
    /// The fan-out itself failed, for example a task panicked.
    #[error("listing enrichment failed: {message}")]
    Internal {
        /// Diagnostic detail; never shown to callers.
        message: String,
    },
}

impl ListingEnrichmentError {
    pub(super) fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl From<ListingEnrichmentError> for Error {
    fn from(value: ListingEnrichmentError) -> Self {
        match value {
            ListingEnrichmentError::Upstream(source) => {
                Error::service_unavailable("listing service is unavailable")
                    .with_details(json!({ "reason": source.to_string() }))
            }
            ListingEnrichmentError::Aggregation { user_id, source } if source.is_not_found() => {
                Error::internal(format!("listing owner {user_id} is unknown to the user service"))
                    .with_details(json!({ "userId": user_id.get() }))
            }
            ListingEnrichmentError::Aggregation { user_id, source } => {
                Error::service_unavailable("failed to fetch listing owners").with_details(json!({
                    "userId": user_id.get(),
                    "reason": source.to_string(),
                }))
            }
            ListingEnrichmentError::UserNotFound { user_id } => {
                Error::invalid_request(format!("user {user_id} does not exist"))
                    .with_details(json!({ "field": "user_id", "userId": user_id.get() }))
            }
            ListingEnrichmentError::UserLookup { user_id, source } => {
                Error::service_unavailable("user service is unavailable").with_details(json!({
                    "userId": user_id.get(),
                    "reason": source.to_string(),
                }))
            }
            ListingEnrichmentError::Internal { .. } => Error::internal("Internal server error"),
        }
    }
}
