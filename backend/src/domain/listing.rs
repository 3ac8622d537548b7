//! Listing records owned by the listing upstream service.

use serde::Serialize;
use utoipa::ToSchema;

use super::UserId;

/// Validation errors raised while preparing a listing for creation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ListingValidationError {
    /// The listing type tag was blank.
    #[error("listing_type is required")]
    EmptyListingType,
    /// Prices are strictly positive.
    #[error("price must be positive, got {value}")]
    NonPositivePrice { value: i64 },
}

/// Listing as returned by the listing service.
///
/// The gateway never mutates a listing; enrichment pairs it with its owner in
/// [`EnrichedListing`](super::EnrichedListing).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Listing {
    #[schema(example = 1)]
    id: i64,
    #[schema(value_type = i64, example = 7)]
    user_id: UserId,
    #[schema(example = "rent")]
    listing_type: String,
    #[schema(example = 6000)]
    price: i64,
    created_at: i64,
    updated_at: i64,
}

impl Listing {
    /// Assemble a listing from upstream fields.
    ///
    /// # Examples
    /// ```
    /// use public_api::domain::{Listing, UserId};
    ///
    /// let owner = UserId::new(7).expect("positive id");
    /// let listing = Listing::new(1, owner, "rent", 6000, 0, 0);
    /// assert_eq!(listing.user_id(), owner);
    /// ```
    #[must_use]
    pub fn new(
        id: i64,
        user_id: UserId,
        listing_type: impl Into<String>,
        price: i64,
        created_at: i64,
        updated_at: i64,
    ) -> Self {
        Self {
            id,
            user_id,
            listing_type: listing_type.into(),
            price,
            created_at,
            updated_at,
        }
    }

    /// Listing identifier.
    #[must_use]
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Identifier of the owning user.
    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Type tag such as `rent` or `sale`.
    #[must_use]
    pub fn listing_type(&self) -> &str {
        self.listing_type.as_str()
    }

    /// Asking price in the upstream's minor unit.
    #[must_use]
    pub fn price(&self) -> i64 {
        self.price
    }

    /// Creation timestamp in Unix microseconds.
    #[must_use]
    pub fn created_at(&self) -> i64 {
        self.created_at
    }

    /// Last update timestamp in Unix microseconds.
    #[must_use]
    pub fn updated_at(&self) -> i64 {
        self.updated_at
    }
}

/// Validated request to create a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewListing {
    user_id: UserId,
    listing_type: String,
    price: i64,
}

impl NewListing {
    /// Validate creation input.
    ///
    /// # Examples
    /// ```
    /// use public_api::domain::{NewListing, UserId};
    ///
    /// let owner = UserId::new(3).expect("positive id");
    /// assert!(NewListing::new(owner, "sale", 100).is_ok());
    /// assert!(NewListing::new(owner, " ", 100).is_err());
    /// ```
    pub fn new(
        user_id: UserId,
        listing_type: impl Into<String>,
        price: i64,
    ) -> Result<Self, ListingValidationError> {
        let listing_type = listing_type.into();
        if listing_type.trim().is_empty() {
            return Err(ListingValidationError::EmptyListingType);
        }
        if price <= 0 {
            return Err(ListingValidationError::NonPositivePrice { value: price });
        }
        Ok(Self {
            user_id,
            listing_type,
            price,
        })
    }

    /// Owner who must exist before the listing is created.
    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Type tag.
    #[must_use]
    pub fn listing_type(&self) -> &str {
        self.listing_type.as_str()
    }

    /// Asking price.
    #[must_use]
    pub fn price(&self) -> i64 {
        self.price
    }
}
