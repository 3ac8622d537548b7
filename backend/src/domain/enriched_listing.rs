//! A listing paired with the user that owns it.

use serde::Serialize;
use utoipa::ToSchema;

use super::{Listing, User, UserId};

/// Raised when a listing is paired with a user other than its owner.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("listing {listing_id} belongs to user {expected}, not user {actual}")]
pub struct OwnerMismatch {
    /// Listing that failed to pair.
    pub listing_id: i64,
    /// Owner recorded on the listing.
    pub expected: UserId,
    /// User offered for the pairing.
    pub actual: UserId,
}

/// Listing enriched with its owner.
///
/// ## Invariants
/// - `user.id() == listing.user_id()` for every constructed value.
///
/// Serialises as the listing's own fields plus a nested `user` object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct EnrichedListing {
    #[serde(flatten)]
    listing: Listing,
    user: User,
}

impl EnrichedListing {
    /// Pair a listing with its owner, rejecting any other user.
    ///
    /// # Examples
    /// ```
    /// use public_api::domain::{EnrichedListing, Listing, User, UserId};
    ///
    /// let owner = UserId::new(7).expect("positive id");
    /// let user = User::new(owner, "A", 0, 0).expect("valid user");
    /// let listing = Listing::new(1, owner, "rent", 10, 0, 0);
    /// let enriched = EnrichedListing::new(listing, user).expect("owner matches");
    /// assert_eq!(enriched.user().name(), "A");
    /// ```
    pub fn new(listing: Listing, user: User) -> Result<Self, OwnerMismatch> {
        if listing.user_id() != user.id() {
            return Err(OwnerMismatch {
                listing_id: listing.id(),
                expected: listing.user_id(),
                actual: user.id(),
            });
        }
        Ok(Self { listing, user })
    }

    /// The listing as returned upstream.
    #[must_use]
    pub fn listing(&self) -> &Listing {
        &self.listing
    }

    /// The owning user.
    #[must_use]
    pub fn user(&self) -> &User {
        &self.user
    }
}
