//! Public API gateway library.
//!
//! The gateway reads a page of listings from the listing service, resolves
//! each distinct owner once through a shared cache, and returns the listings
//! joined with their users in upstream order.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
