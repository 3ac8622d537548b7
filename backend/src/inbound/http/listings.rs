//! Listing API handlers.
//!
//! ```text
//! GET  /public-api/listings?page_num=1&page_size=10&user_id=7
//! POST /public-api/listings {"user_id":7,"listing_type":"rent","price":6000}
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::{IntoParams, ToSchema};

use super::ApiResult;
use super::state::HttpState;
use super::validation::{ValidationCode, field_error, parse_positive, positive_or_default};
use crate::domain::page::{DEFAULT_PAGE_NUM, DEFAULT_PAGE_SIZE};
use crate::domain::{
    EnrichedListing, Error, Listing, ListingQuery, ListingValidationError, NewListing,
    PageRequest, UserId,
};

/// Raw query parameters for `GET /public-api/listings`.
///
/// Values arrive as text so malformed numbers can be reported per field.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListingsQueryParams {
    /// One-based page number (default 1).
    #[param(example = "1")]
    pub page_num: Option<String>,
    /// Listings per page (default 10).
    #[param(example = "10")]
    pub page_size: Option<String>,
    /// Only return listings owned by this user.
    #[param(example = "7")]
    pub user_id: Option<String>,
}

impl ListingsQueryParams {
    fn into_query(self) -> Result<ListingQuery, Error> {
        let page_num =
            positive_or_default("page_num", self.page_num.as_deref(), DEFAULT_PAGE_NUM)?;
        let page_size =
            positive_or_default("page_size", self.page_size.as_deref(), DEFAULT_PAGE_SIZE)?;
        let page = PageRequest::new(page_num, page_size)
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        let mut query = ListingQuery::new(page);
        if let Some(raw) = self.user_id.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
            query = query.with_user_filter(parse_user_id(raw)?);
        }
        Ok(query)
    }
}

/// Response body for `GET /public-api/listings`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ListingsResponse {
    /// Always `true` on success.
    pub result: bool,
    /// Listings in upstream order, each with its owner.
    pub listings: Vec<EnrichedListing>,
}

/// Request body for `POST /public-api/listings`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateListingRequest {
    /// Owner; must exist in the user service.
    #[schema(example = 7)]
    pub user_id: i64,
    /// Listing type tag such as `rent` or `sale`.
    #[schema(example = "rent")]
    pub listing_type: String,
    /// Strictly positive price.
    #[schema(example = 6000)]
    pub price: i64,
}

impl TryFrom<CreateListingRequest> for NewListing {
    type Error = Error;

    fn try_from(value: CreateListingRequest) -> Result<Self, Self::Error> {
        let owner = UserId::new(value.user_id).map_err(|_| {
            field_error("user_id", ValidationCode::NotPositive, "Invalid user_id")
        })?;
        Self::new(owner, value.listing_type, value.price).map_err(map_listing_validation_error)
    }
}

/// Response body for `POST /public-api/listings`.
#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedListingResponse {
    /// The listing as stored by the listing service.
    pub listing: Listing,
}

fn parse_user_id(raw: &str) -> Result<UserId, Error> {
    let value: i64 = parse_positive("user_id", raw)?;
    UserId::new(value).map_err(|err| {
        field_error("user_id", ValidationCode::NotPositive, err.to_string())
    })
}

fn map_listing_validation_error(err: ListingValidationError) -> Error {
    match err {
        ListingValidationError::EmptyListingType => field_error(
            "listing_type",
            ValidationCode::Required,
            "listing_type is required",
        ),
        ListingValidationError::NonPositivePrice { .. } => {
            field_error("price", ValidationCode::NotPositive, "Invalid price")
        }
    }
}

/// Fetch one page of listings, each joined with its owning user.
///
/// The page is all-or-nothing: if any owner cannot be resolved the whole
/// request fails with 503.
#[utoipa::path(
    get,
    path = "/public-api/listings",
    params(ListingsQueryParams),
    responses(
        (status = 200, description = "Enriched listings", body = ListingsResponse),
        (status = 400, description = "Invalid query parameters", body = Error),
        (status = 503, description = "An upstream service failed", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["listings"],
    operation_id = "getListings"
)]
#[get("/listings")]
pub async fn get_listings(
    state: web::Data<HttpState>,
    params: web::Query<ListingsQueryParams>,
) -> ApiResult<web::Json<ListingsResponse>> {
    let query = params.into_inner().into_query()?;
    info!(
        page_num = query.page.page_num(),
        page_size = query.page.page_size(),
        user_id = query.user_filter.map(UserId::get),
        "fetching listings"
    );
    let listings = state.listings.get_enriched_listings(&query).await?;
    Ok(web::Json(ListingsResponse {
        result: true,
        listings,
    }))
}

/// Create a listing for an existing user.
#[utoipa::path(
    post,
    path = "/public-api/listings",
    request_body = CreateListingRequest,
    responses(
        (status = 201, description = "Listing created", body = CreatedListingResponse),
        (status = 400, description = "Invalid request or unknown user", body = Error),
        (status = 503, description = "An upstream service failed", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["listings"],
    operation_id = "createListing"
)]
#[post("/listings")]
pub async fn create_listing(
    state: web::Data<HttpState>,
    payload: web::Json<CreateListingRequest>,
) -> ApiResult<HttpResponse> {
    let new_listing = NewListing::try_from(payload.into_inner())?;
    let listing = state.listings.create_listing(new_listing).await?;
    Ok(HttpResponse::Created().json(CreatedListingResponse { listing }))
}
