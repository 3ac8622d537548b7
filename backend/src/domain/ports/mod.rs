//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod listing_source;
mod user_cache;
mod user_source;

#[cfg(test)]
pub use listing_source::MockListingSource;
pub use listing_source::{FixtureListingSource, ListingSource, ListingSourceError};
#[cfg(test)]
pub use user_cache::MockUserCache;
pub use user_cache::{FixtureUserCache, UserCache};
#[cfg(test)]
pub use user_source::MockUserSource;
pub use user_source::{FixtureUserSource, UserSource, UserSourceError};
