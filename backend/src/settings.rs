//! Gateway configuration loaded via OrthoConfig.
//!
//! Every field can be supplied as a CLI flag, a `PUBLIC_API_*` environment
//! variable, or a configuration file entry. The listen address and timeout
//! carry OrthoConfig defaults; accessors apply the remaining defaults and
//! validate values so the composition root only sees usable settings.

use std::net::SocketAddr;
use std::num::NonZeroUsize;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

use crate::domain::ListingEnrichmentConfig;
use crate::outbound::cache::UserCachePolicy;

/// Listen address used when none is configured.
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:6002";
/// User service base URL used when none is configured.
pub const DEFAULT_USER_SERVICE_URL: &str = "http://localhost:6001";
/// Listing service base URL used when none is configured.
pub const DEFAULT_LISTING_SERVICE_URL: &str = "http://localhost:6000";
/// Per-request upstream timeout used when none is configured.
pub const DEFAULT_UPSTREAM_TIMEOUT_MS: u64 = 5_000;

/// Errors raised while interpreting configured values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    /// A base URL did not parse.
    #[error("{field} is not a valid URL ({value}): {reason}")]
    InvalidUrl {
        field: &'static str,
        value: String,
        reason: String,
    },
    /// The listen address did not parse.
    #[error("bind_addr is not a socket address ({value}): {reason}")]
    InvalidBindAddr { value: String, reason: String },
    /// Timeouts must be non-zero.
    #[error("upstream_timeout_ms must be greater than zero")]
    ZeroTimeout,
}

/// Configuration values for the public API gateway.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "PUBLIC_API")]
pub struct GatewaySettings {
    /// Address the HTTP server listens on.
    #[ortho_config(default = DEFAULT_BIND_ADDR.to_owned())]
    pub bind_addr: String,
    /// Base URL of the user service.
    pub user_service_url: Option<String>,
    /// Base URL of the listing service.
    pub listing_service_url: Option<String>,
    /// Timeout applied to each upstream request, in milliseconds.
    #[ortho_config(default = DEFAULT_UPSTREAM_TIMEOUT_MS)]
    pub upstream_timeout_ms: u64,
    /// Maximum concurrent user lookups within one listing page request.
    ///
    /// Each request gets its own bound, so concurrent requests may together
    /// issue more upstream lookups than this.
    pub max_concurrent_user_fetches: Option<usize>,
    /// Optional bound on cached users.
    pub user_cache_capacity: Option<u64>,
    /// Optional time-to-live for cached users, in seconds.
    pub user_cache_ttl_secs: Option<u64>,
}

impl GatewaySettings {
    /// Return the parsed listen address.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidBindAddr`] when the value is not a
    /// socket address.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_str();
        raw.parse()
            .map_err(|err: std::net::AddrParseError| SettingsError::InvalidBindAddr {
                value: raw.to_owned(),
                reason: err.to_string(),
            })
    }

    /// Return the user service base URL.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidUrl`] when the value does not parse.
    pub fn user_service_url(&self) -> Result<Url, SettingsError> {
        parse_url(
            "user_service_url",
            self.user_service_url
                .as_deref()
                .unwrap_or(DEFAULT_USER_SERVICE_URL),
        )
    }

    /// Return the listing service base URL.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidUrl`] when the value does not parse.
    pub fn listing_service_url(&self) -> Result<Url, SettingsError> {
        parse_url(
            "listing_service_url",
            self.listing_service_url
                .as_deref()
                .unwrap_or(DEFAULT_LISTING_SERVICE_URL),
        )
    }

    /// Return the per-request upstream timeout.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::ZeroTimeout`] for a zero timeout.
    pub fn upstream_timeout(&self) -> Result<Duration, SettingsError> {
        match self.upstream_timeout_ms {
            0 => Err(SettingsError::ZeroTimeout),
            millis => Ok(Duration::from_millis(millis)),
        }
    }

    /// Enrichment settings; a configured bound of zero is raised to one.
    #[must_use]
    pub fn enrichment(&self) -> ListingEnrichmentConfig {
        let defaults = ListingEnrichmentConfig::default();
        let bound = self
            .max_concurrent_user_fetches
            .map_or(defaults.max_concurrent_user_fetches, |value| {
                NonZeroUsize::new(value).map_or(1, NonZeroUsize::get)
            });
        ListingEnrichmentConfig {
            max_concurrent_user_fetches: bound,
        }
    }

    /// Cache policy; unset values mean unbounded and non-expiring.
    #[must_use]
    pub fn user_cache_policy(&self) -> UserCachePolicy {
        UserCachePolicy {
            max_capacity: self.user_cache_capacity,
            time_to_live: self.user_cache_ttl_secs.map(Duration::from_secs),
        }
    }
}

fn parse_url(field: &'static str, raw: &str) -> Result<Url, SettingsError> {
    Url::parse(raw).map_err(|err| SettingsError::InvalidUrl {
        field,
        value: raw.to_owned(),
        reason: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    //! Unit tests for gateway configuration parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 7] = [
        "PUBLIC_API_BIND_ADDR",
        "PUBLIC_API_USER_SERVICE_URL",
        "PUBLIC_API_LISTING_SERVICE_URL",
        "PUBLIC_API_UPSTREAM_TIMEOUT_MS",
        "PUBLIC_API_MAX_CONCURRENT_USER_FETCHES",
        "PUBLIC_API_USER_CACHE_CAPACITY",
        "PUBLIC_API_USER_CACHE_TTL_SECS",
    ];

    fn unset() -> GatewaySettings {
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

    fn load_from_empty_args() -> GatewaySettings {
        GatewaySettings::load_from_iter([OsString::from("public-api")])
            .expect("config should load")
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();

        assert_eq!(
            settings.bind_addr().expect("default addr").to_string(),
            DEFAULT_BIND_ADDR
        );
        assert_eq!(
            settings.user_service_url().expect("default url").as_str(),
            "http://localhost:6001/"
        );
        assert_eq!(
            settings.listing_service_url().expect("default url").as_str(),
            "http://localhost:6000/"
        );
        assert_eq!(
            settings.upstream_timeout().expect("default timeout"),
            Duration::from_millis(DEFAULT_UPSTREAM_TIMEOUT_MS)
        );
        assert_eq!(
            settings.enrichment(),
            ListingEnrichmentConfig::default()
        );
        assert_eq!(settings.user_cache_policy(), UserCachePolicy::default());
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("PUBLIC_API_BIND_ADDR", Some("127.0.0.1:9000".to_owned())),
            (
                "PUBLIC_API_USER_SERVICE_URL",
                Some("http://users.internal:8080/v1".to_owned()),
            ),
            ("PUBLIC_API_LISTING_SERVICE_URL", None),
            ("PUBLIC_API_UPSTREAM_TIMEOUT_MS", Some("250".to_owned())),
            ("PUBLIC_API_MAX_CONCURRENT_USER_FETCHES", Some("3".to_owned())),
            ("PUBLIC_API_USER_CACHE_CAPACITY", Some("500".to_owned())),
            ("PUBLIC_API_USER_CACHE_TTL_SECS", Some("60".to_owned())),
        ]);

        let settings = load_from_empty_args();

        assert_eq!(
            settings.bind_addr().expect("addr").to_string(),
            "127.0.0.1:9000"
        );
        assert_eq!(
            settings.user_service_url().expect("url").as_str(),
            "http://users.internal:8080/v1"
        );
        assert_eq!(
            settings.upstream_timeout().expect("timeout"),
            Duration::from_millis(250)
        );
        assert_eq!(settings.enrichment().max_concurrent_user_fetches, 3);
        assert_eq!(
            settings.user_cache_policy(),
            UserCachePolicy {
                max_capacity: Some(500),
                time_to_live: Some(Duration::from_secs(60)),
            }
        );
    }

    #[rstest]
    fn invalid_urls_name_the_field() {
        let settings = GatewaySettings {
            listing_service_url: Some("not a url".to_owned()),
            ..unset()
        };
        let err = settings.listing_service_url().expect_err("invalid url");
        assert!(matches!(
            err,
            SettingsError::InvalidUrl { field: "listing_service_url", .. }
        ));
    }

    #[rstest]
    #[case(Some(0), 1)]
    #[case(Some(16), 16)]
    fn concurrency_bound_is_at_least_one(#[case] configured: Option<usize>, #[case] expected: usize) {
        let settings = GatewaySettings {
            max_concurrent_user_fetches: configured,
            ..unset()
        };
        assert_eq!(settings.enrichment().max_concurrent_user_fetches, expected);
    }

    #[rstest]
    fn malformed_bind_addr_is_reported() {
        let settings = GatewaySettings {
            bind_addr: "localhost".to_owned(),
            ..unset()
        };
        assert!(matches!(
            settings.bind_addr(),
            Err(SettingsError::InvalidBindAddr { value, .. }) if value == "localhost"
        ));
    }

    #[rstest]
    fn zero_timeout_is_rejected() {
        let settings = GatewaySettings {
            upstream_timeout_ms: 0,
            ..unset()
        };
        assert_eq!(settings.upstream_timeout(), Err(SettingsError::ZeroTimeout));
    }
}
