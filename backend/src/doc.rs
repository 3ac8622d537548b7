//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! specification for the gateway. It registers every public endpoint, the
//! health probes, and the shared error payload.
//!
//! The generated specification is used by Swagger UI (debug builds) and
//! exported via `cargo run --bin openapi-dump` for external tooling.

use utoipa::OpenApi;

use crate::domain::{EnrichedListing, Error, ErrorCode, Listing, User};
use crate::inbound::http::listings::{
    CreateListingRequest, CreatedListingResponse, ListingsResponse,
};
use crate::inbound::http::users::{CreateUserRequest, CreatedUserResponse};

/// OpenAPI document for the public API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Public API gateway",
        description = "Read-aggregation gateway joining listing pages with their owning users.",
        license(name = "MIT")
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::listings::get_listings,
        crate::inbound::http::listings::create_listing,
        crate::inbound::http::users::create_user,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        Listing,
        User,
        EnrichedListing,
        ListingsResponse,
        CreateListingRequest,
        CreatedListingResponse,
        CreateUserRequest,
        CreatedUserResponse,
    )),
    tags(
        (name = "listings", description = "Listings enriched with their owners"),
        (name = "users", description = "User creation"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying the registered paths and schema field structure.

    use super::*;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    fn assert_object_schema_has_field(name: &str, field: &str) {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        match schemas.get(name).expect("schema registered") {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema {name} should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema for {name}"),
        }
    }

    #[test]
    fn openapi_lists_public_endpoints() {
        let doc = ApiDoc::openapi();
        for path in [
            "/public-api/listings",
            "/public-api/users",
            "/health/ready",
            "/health/live",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing path {path}");
        }
    }

    #[test]
    fn openapi_error_schema_has_required_fields() {
        assert_object_schema_has_field("Error", "code");
        assert_object_schema_has_field("Error", "message");
        assert_object_schema_has_field("Error", "traceId");
    }

    #[test]
    fn openapi_listing_schemas_expose_owner_ids() {
        assert_object_schema_has_field("Listing", "user_id");
        assert_object_schema_has_field("ListingsResponse", "listings");
    }
}
