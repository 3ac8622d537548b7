//! DTOs for the listing and user service JSON envelopes.
//!
//! Bodies decode into these transport types first and are then mapped to
//! domain records in one pass, so malformed identifiers surface as decode
//! errors rather than leaking into the domain.

use serde::Deserialize;

use crate::domain::{Listing, User, UserId};

#[derive(Debug, Deserialize)]
pub(super) struct ListingDto {
    pub(super) id: i64,
    pub(super) user_id: i64,
    pub(super) listing_type: String,
    pub(super) price: i64,
    pub(super) created_at: i64,
    pub(super) updated_at: i64,
}

#[derive(Debug, Deserialize)]
pub(super) struct UserDto {
    pub(super) id: i64,
    pub(super) name: String,
    pub(super) created_at: i64,
    pub(super) updated_at: i64,
}

/// `{"result": bool, "listings": [...]}`
#[derive(Debug, Deserialize)]
pub(super) struct ListingsEnvelope {
    #[serde(default)]
    pub(super) listings: Vec<ListingDto>,
}

/// `{"result": bool, "listing": {...}}`
#[derive(Debug, Deserialize)]
pub(super) struct ListingEnvelope {
    pub(super) listing: ListingDto,
}

/// `{"result": bool, "users": [...]}`
#[derive(Debug, Deserialize)]
pub(super) struct UsersEnvelope {
    #[serde(default)]
    pub(super) users: Vec<UserDto>,
}

/// `{"result": bool, "user": {...}}`
#[derive(Debug, Deserialize)]
pub(super) struct UserEnvelope {
    pub(super) user: UserDto,
}

impl ListingDto {
    pub(super) fn into_domain(self) -> Result<Listing, String> {
        let owner = UserId::new(self.user_id)
            .map_err(|err| format!("listing {} has invalid owner: {err}", self.id))?;
        Ok(Listing::new(
            self.id,
            owner,
            self.listing_type,
            self.price,
            self.created_at,
            self.updated_at,
        ))
    }
}

impl UserDto {
    pub(super) fn into_domain(self) -> Result<User, String> {
        let id = UserId::new(self.id).map_err(|err| format!("invalid user record: {err}"))?;
        User::new(id, self.name, self.created_at, self.updated_at)
            .map_err(|err| format!("user {} is invalid: {err}", self.id))
    }
}

impl ListingsEnvelope {
    pub(super) fn into_domain(self) -> Result<Vec<Listing>, String> {
        self.listings
            .into_iter()
            .map(ListingDto::into_domain)
            .collect()
    }
}

impl UsersEnvelope {
    pub(super) fn into_domain(self) -> Result<Vec<User>, String> {
        self.users.into_iter().map(UserDto::into_domain).collect()
    }
}
