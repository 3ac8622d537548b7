//! Builders for HTTP state wiring.

use std::sync::Arc;

use color_eyre::eyre::{Result, WrapErr};
use tracing::info;

use public_api::domain::{ListingEnrichmentService, UpstreamFetcher, UserDirectoryService};
use public_api::inbound::http::state::HttpState;
use public_api::outbound::cache::MokaUserCache;
use public_api::outbound::upstream::{ListingHttpSource, UserHttpSource};

use super::ServerConfig;

/// Build the shared cache, upstream clients, and services.
pub(super) fn build_http_state(config: &ServerConfig) -> Result<HttpState> {
    let listings = Arc::new(
        ListingHttpSource::new(config.listing_service_url.clone(), config.upstream_timeout)
            .wrap_err("failed to build listing service client")?,
    );
    let users = Arc::new(
        UserHttpSource::new(config.user_service_url.clone(), config.upstream_timeout)
            .wrap_err("failed to build user service client")?,
    );
    let cache = Arc::new(MokaUserCache::new(config.cache_policy));
    info!(
        listing_service = %config.listing_service_url,
        user_service = %config.user_service_url,
        max_concurrent_user_fetches = config.enrichment.max_concurrent_user_fetches,
        "upstream clients configured"
    );

    let fetcher = UpstreamFetcher::new(listings, users.clone());
    let enrichment = ListingEnrichmentService::new(fetcher, cache, config.enrichment);
    Ok(HttpState::new(
        Arc::new(enrichment),
        Arc::new(UserDirectoryService::new(users)),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{test as actix_test, web};
    use public_api::domain::UserDirectoryError;
    use public_api::inbound::http::health::HealthState;
    use public_api::settings::{DEFAULT_BIND_ADDR, DEFAULT_UPSTREAM_TIMEOUT_MS, GatewaySettings};
    use rstest::rstest;

    use crate::server::build_app;

    fn default_config() -> ServerConfig {
        let settings = GatewaySettings {
            bind_addr: DEFAULT_BIND_ADDR.to_owned(),
            user_service_url: None,
            listing_service_url: None,
            upstream_timeout_ms: DEFAULT_UPSTREAM_TIMEOUT_MS,
            max_concurrent_user_fetches: None,
            user_cache_capacity: Some(100),
            user_cache_ttl_secs: Some(60),
        };
        ServerConfig::from_settings(&settings).expect("defaults are valid")
    }

    #[tokio::test]
    async fn built_state_validates_before_calling_upstream() {
        let state = build_http_state(&default_config()).expect("state builds");

        let err = state
            .users
            .create_user("   ")
            .await
            .expect_err("blank name is rejected");
        assert!(matches!(err, UserDirectoryError::EmptyName));
    }

    #[rstest]
    #[case("/health/live", StatusCode::OK)]
    #[case("/health/ready", StatusCode::SERVICE_UNAVAILABLE)]
    #[case("/public-api/listings?page_num=0", StatusCode::BAD_REQUEST)]
    #[actix_web::test]
    async fn built_state_serves_routes(#[case] uri: &str, #[case] expected: StatusCode) {
        let state = build_http_state(&default_config()).expect("state builds");
        let app = actix_test::init_service(build_app(
            web::Data::new(HealthState::new()),
            web::Data::new(state),
        ))
        .await;

        let response =
            actix_test::call_service(&app, actix_test::TestRequest::get().uri(uri).to_request())
                .await;

        assert_eq!(response.status(), expected);
    }
}
