//! End-to-end tests for the public API surface.
//!
//! Requests go through the same `Trace` middleware and route configuration the
//! binary uses, with in-memory upstream stubs behind the domain services.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use rstest::{fixture, rstest};
use serde_json::Value;

use public_api::Trace;
use public_api::domain::ports::UserSourceError;
use public_api::domain::{
    ListingEnrichmentConfig, ListingEnrichmentService, TRACE_ID_HEADER, UpstreamFetcher,
    UserDirectoryService, UserId,
};
use public_api::inbound::http::configure_public_api;
use public_api::inbound::http::state::HttpState;
use public_api::outbound::cache::MokaUserCache;
use public_api::test_support::upstream::{StubListingSource, StubUserSource, listing, user};

struct Gateway {
    listings: Arc<StubListingSource>,
    users: Arc<StubUserSource>,
    state: web::Data<HttpState>,
}

impl Gateway {
    fn new(listings: StubListingSource, users: StubUserSource) -> Self {
        let listings = Arc::new(listings);
        let users = Arc::new(users);
        let fetcher = UpstreamFetcher::new(listings.clone(), users.clone());
        let enrichment = ListingEnrichmentService::new(
            fetcher,
            Arc::new(MokaUserCache::default()),
            ListingEnrichmentConfig {
                max_concurrent_user_fetches: 2,
            },
        );
        let state = web::Data::new(HttpState::new(
            Arc::new(enrichment),
            Arc::new(UserDirectoryService::new(users.clone())),
        ));
        Self {
            listings,
            users,
            state,
        }
    }

    async fn get(&self, uri: &str) -> (StatusCode, Option<String>, Value) {
        let app = actix_test::init_service(
            App::new()
                .app_data(self.state.clone())
                .wrap(Trace)
                .configure(configure_public_api),
        )
        .await;
        let request = actix_test::TestRequest::get().uri(uri).to_request();
        let response = actix_test::call_service(&app, request).await;
        let status = response.status();
        let trace_id = response
            .headers()
            .get(TRACE_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let body = actix_test::read_body(response).await;
        let value = serde_json::from_slice(&body).expect("JSON body");
        (status, trace_id, value)
    }
}

fn id(raw: i64) -> UserId {
    UserId::new(raw).expect("positive id")
}

#[fixture]
fn marketplace() -> Gateway {
    Gateway::new(
        StubListingSource::with_page(vec![
            listing(1, 7),
            listing(2, 8),
            listing(3, 7),
            listing(4, 9),
        ]),
        StubUserSource::with_users([user(7, "A"), user(8, "B"), user(9, "C")]),
    )
}

#[rstest]
#[actix_web::test]
async fn listing_page_is_joined_in_order_with_one_lookup_per_owner(marketplace: Gateway) {
    let (status, trace_id, body) = marketplace.get("/public-api/listings").await;

    assert_eq!(status, StatusCode::OK);
    assert!(trace_id.is_some());
    let listings = body["listings"].as_array().expect("listings");
    let ids: Vec<_> = listings.iter().map(|l| l["id"].as_i64()).collect();
    assert_eq!(ids, vec![Some(1), Some(2), Some(3), Some(4)]);
    for entry in listings {
        assert_eq!(entry["user"]["id"], entry["user_id"]);
    }
    assert_eq!(marketplace.users.calls_for(id(7)), 1);
    assert_eq!(marketplace.users.calls_for(id(8)), 1);
    assert_eq!(marketplace.users.calls_for(id(9)), 1);
    assert!(marketplace.users.max_active() <= 2);
}

#[rstest]
#[actix_web::test]
async fn repeated_requests_are_served_from_the_shared_cache(marketplace: Gateway) {
    let (first, _, _) = marketplace.get("/public-api/listings").await;
    let (second, _, _) = marketplace
        .get("/public-api/listings?page_num=2&page_size=4")
        .await;

    assert_eq!(first, StatusCode::OK);
    assert_eq!(second, StatusCode::OK);
    assert_eq!(marketplace.users.total_calls(), 3);
    assert_eq!(marketplace.listings.queries().len(), 2);
}

#[rstest]
#[actix_web::test]
async fn one_failed_owner_fails_the_whole_page() {
    let gateway = Gateway::new(
        StubListingSource::with_page(vec![listing(1, 7), listing(2, 8)]),
        StubUserSource::with_users([user(7, "A"), user(8, "B")])
            .with_failure(id(8), UserSourceError::status(502_u16, "bad gateway")),
    );

    let (status, trace_id, body) = gateway.get("/public-api/listings").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], "service_unavailable");
    assert!(body.get("listings").is_none());
    assert_eq!(body["traceId"].as_str(), trace_id.as_deref());
}

#[rstest]
#[actix_web::test]
async fn empty_pages_skip_user_lookups() {
    let gateway = Gateway::new(
        StubListingSource::with_page(Vec::new()),
        StubUserSource::default(),
    );

    let (status, _, body) = gateway.get("/public-api/listings?user_id=42").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"], true);
    assert_eq!(body["listings"], Value::Array(Vec::new()));
    assert_eq!(gateway.users.total_calls(), 0);
}

#[rstest]
#[actix_web::test]
async fn invalid_parameters_never_reach_the_listing_service(marketplace: Gateway) {
    let (status, trace_id, body) = marketplace
        .get("/public-api/listings?page_size=ten")
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["field"], "page_size");
    assert_eq!(body["traceId"].as_str(), trace_id.as_deref());
    assert!(marketplace.listings.queries().is_empty());
}
