//! HTTP adapters for the listing and user services.
//!
//! Each adapter owns transport details only: URL building, timeout and status
//! mapping, and JSON decoding into domain records.

mod dto;
mod listing_http_source;
mod transport;
mod user_http_source;

pub use listing_http_source::ListingHttpSource;
pub use transport::UpstreamClientError;
pub use user_http_source::UserHttpSource;
