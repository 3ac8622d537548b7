//! Domain primitives, ports, and use-case services.
//!
//! Purpose: hold everything the gateway knows about listings and users
//! without depending on HTTP, JSON transports, or a concrete cache. Inbound
//! adapters call the services defined here; outbound adapters implement the
//! ports in [`ports`].
//!
//! Public surface:
//! - [`Listing`], [`NewListing`], [`User`], [`EnrichedListing`] are the records.
//! - [`PageRequest`], [`ListingQuery`] hold already-validated page parameters.
//! - [`Error`] / [`ErrorCode`] is the transport-agnostic failure payload.
//! - [`UpstreamFetcher`] wraps the two upstream sources.
//! - [`ListingEnrichmentService`] runs the concurrent listing/user join.
//! - [`UserDirectoryService`] handles user lookups and creation.

pub mod enriched_listing;
pub mod error;
pub mod fetcher;
pub mod listing;
pub mod listing_enrichment;
pub mod page;
pub mod ports;
pub mod trace_id;
pub mod user;
pub mod user_directory;

pub use self::enriched_listing::{EnrichedListing, OwnerMismatch};
pub use self::error::{Error, ErrorCode};
pub use self::fetcher::UpstreamFetcher;
pub use self::listing::{Listing, ListingValidationError, NewListing};
pub use self::listing_enrichment::{
    ListingEnrichmentConfig, ListingEnrichmentError, ListingEnrichmentService,
};
pub use self::page::{ListingQuery, PageRequest, PageRequestValidationError};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{User, UserId, UserValidationError};
pub use self::user_directory::{UserDirectoryError, UserDirectoryService};
