//! HTTP inbound adapter exposing the public REST endpoints.
//!
//! ```text
//! GET  /public-api/listings?page_num=1&page_size=10&user_id=7
//! POST /public-api/listings {"user_id":7,"listing_type":"rent","price":6000}
//! POST /public-api/users    {"name":"Ada"}
//! GET  /health/ready
//! GET  /health/live
//! ```

pub mod error;
pub mod health;
pub mod listings;
pub mod state;
pub mod users;
mod validation;

use actix_web::web;

pub use error::ApiResult;
pub use health::HealthState;
pub use state::HttpState;

/// Path prefix shared by every public endpoint.
pub const API_SCOPE: &str = "/public-api";

/// Register the public API scope together with its extractor configuration.
///
/// Malformed JSON bodies and query strings are reported with the same error
/// payload as handler-level validation failures.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use public_api::inbound::http::configure_public_api;
///
/// let _app = App::new().configure(configure_public_api);
/// ```
pub fn configure_public_api(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope(API_SCOPE)
            .app_data(validation::json_config())
            .app_data(validation::query_config())
            .service(listings::get_listings)
            .service(listings::create_listing)
            .service(users::create_user),
    );
}
