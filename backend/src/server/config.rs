//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::time::Duration;

use color_eyre::eyre::{Result, WrapErr};
use url::Url;

use public_api::domain::ListingEnrichmentConfig;
use public_api::outbound::cache::UserCachePolicy;
use public_api::settings::GatewaySettings;

/// Validated values the server needs to start.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) user_service_url: Url,
    pub(crate) listing_service_url: Url,
    pub(crate) upstream_timeout: Duration,
    pub(crate) enrichment: ListingEnrichmentConfig,
    pub(crate) cache_policy: UserCachePolicy,
}

impl ServerConfig {
    /// Resolve defaults and validate loaded settings.
    ///
    /// # Errors
    /// Returns an error naming the first invalid setting.
    pub fn from_settings(settings: &GatewaySettings) -> Result<Self> {
        Ok(Self {
            bind_addr: settings.bind_addr().wrap_err("invalid bind address")?,
            user_service_url: settings
                .user_service_url()
                .wrap_err("invalid user service URL")?,
            listing_service_url: settings
                .listing_service_url()
                .wrap_err("invalid listing service URL")?,
            upstream_timeout: settings
                .upstream_timeout()
                .wrap_err("invalid upstream timeout")?,
            enrichment: settings.enrichment(),
            cache_policy: settings.user_cache_policy(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use public_api::settings::{DEFAULT_BIND_ADDR, DEFAULT_UPSTREAM_TIMEOUT_MS};
    use rstest::rstest;

    fn settings() -> GatewaySettings {
        GatewaySettings {
            bind_addr: DEFAULT_BIND_ADDR.to_owned(),
            user_service_url: None,
            listing_service_url: None,
            upstream_timeout_ms: DEFAULT_UPSTREAM_TIMEOUT_MS,
            max_concurrent_user_fetches: None,
            user_cache_capacity: None,
            user_cache_ttl_secs: None,
        }
    }

    #[rstest]
    fn defaults_resolve_to_local_upstreams() {
        let config = ServerConfig::from_settings(&settings()).expect("defaults are valid");

        assert_eq!(config.bind_addr.to_string(), "0.0.0.0:6002");
        assert_eq!(config.user_service_url.as_str(), "http://localhost:6001/");
        assert_eq!(config.listing_service_url.as_str(), "http://localhost:6000/");
        assert_eq!(config.upstream_timeout, Duration::from_secs(5));
        assert_eq!(config.enrichment, ListingEnrichmentConfig::default());
        assert_eq!(config.cache_policy, UserCachePolicy::default());
    }

    #[rstest]
    fn configured_values_flow_through() {
        let settings = GatewaySettings {
            bind_addr: "127.0.0.1:7100".to_owned(),
            listing_service_url: Some("http://listings.internal:9000".to_owned()),
            upstream_timeout_ms: 750,
            max_concurrent_user_fetches: Some(2),
            user_cache_ttl_secs: Some(30),
            ..settings()
        };

        let config = ServerConfig::from_settings(&settings).expect("valid settings");

        assert_eq!(config.bind_addr.port(), 7100);
        assert_eq!(
            config.listing_service_url.as_str(),
            "http://listings.internal:9000/"
        );
        assert_eq!(config.upstream_timeout, Duration::from_millis(750));
        assert_eq!(config.enrichment.max_concurrent_user_fetches, 2);
        assert_eq!(config.cache_policy.time_to_live, Some(Duration::from_secs(30)));
    }

    #[rstest]
    #[case::user_url(
        GatewaySettings { user_service_url: Some("::nope".to_owned()), ..settings() },
        "invalid user service URL"
    )]
    #[case::listing_url(
        GatewaySettings { listing_service_url: Some("not a url".to_owned()), ..settings() },
        "invalid listing service URL"
    )]
    #[case::bind_addr(
        GatewaySettings { bind_addr: "nowhere".to_owned(), ..settings() },
        "invalid bind address"
    )]
    #[case::timeout(
        GatewaySettings { upstream_timeout_ms: 0, ..settings() },
        "invalid upstream timeout"
    )]
    fn invalid_settings_are_rejected(#[case] settings: GatewaySettings, #[case] context: &str) {
        let err = ServerConfig::from_settings(&settings).expect_err("settings are invalid");
        assert_eq!(err.to_string(), context);
    }
}
