//! Shared reqwest plumbing for the upstream adapters.
//!
//! Both adapters classify failures the same way; this module does the
//! classification once and each adapter converts the result into its own
//! port error.

use std::time::Duration;

use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;

use crate::domain::ports::{ListingSourceError, UserSourceError};

const USER_AGENT: &str = concat!("public-api/", env!("CARGO_PKG_VERSION"));

/// Errors raised while constructing an upstream client.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamClientError {
    /// The base URL cannot have path segments appended.
    #[error("upstream base URL {url} cannot be used as a base")]
    InvalidBaseUrl {
        /// Rejected URL.
        url: String,
    },
    /// The reqwest client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Classified upstream failure, before conversion into a port error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum TransportFailure {
    Transport(String),
    Timeout(String),
    Status { status: u16, message: String },
    Decode(String),
}

impl From<TransportFailure> for ListingSourceError {
    fn from(value: TransportFailure) -> Self {
        match value {
            TransportFailure::Transport(message) => Self::transport(message),
            TransportFailure::Timeout(message) => Self::timeout(message),
            TransportFailure::Status { status, message } => Self::status(status, message),
            TransportFailure::Decode(message) => Self::decode(message),
        }
    }
}

impl From<TransportFailure> for UserSourceError {
    fn from(value: TransportFailure) -> Self {
        match value {
            TransportFailure::Transport(message) => Self::transport(message),
            TransportFailure::Timeout(message) => Self::timeout(message),
            TransportFailure::Status { status, message } => Self::status(status, message),
            TransportFailure::Decode(message) => Self::decode(message),
        }
    }
}

/// Base URL plus a client with the request timeout applied.
#[derive(Debug, Clone)]
pub(super) struct UpstreamEndpoint {
    client: Client,
    base_url: Url,
}

impl UpstreamEndpoint {
    pub(super) fn new(base_url: Url, timeout: Duration) -> Result<Self, UpstreamClientError> {
        if base_url.cannot_be_a_base() {
            return Err(UpstreamClientError::InvalidBaseUrl {
                url: base_url.to_string(),
            });
        }
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client, base_url })
    }

    pub(super) fn client(&self) -> &Client {
        &self.client
    }

    /// Append `segments` to the base path, keeping any existing prefix.
    pub(super) fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

pub(super) fn map_transport_error(error: &reqwest::Error) -> TransportFailure {
    if error.is_timeout() {
        TransportFailure::Timeout(error.to_string())
    } else {
        TransportFailure::Transport(error.to_string())
    }
}

pub(super) fn map_status_error(status: StatusCode, body: &[u8]) -> TransportFailure {
    let preview = body_preview(body);
    let message = if preview.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("unexpected status")
            .to_owned()
    } else {
        preview
    };
    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            TransportFailure::Timeout(format!("status {}: {message}", status.as_u16()))
        }
        _ => TransportFailure::Status {
            status: status.as_u16(),
            message,
        },
    }
}

/// Read the body of a successful response, mapping any other status.
pub(super) async fn success_body(response: Response) -> Result<Vec<u8>, TransportFailure> {
    let status = response.status();
    let body = response
        .bytes()
        .await
        .map_err(|err| map_transport_error(&err))?;
    if !status.is_success() {
        return Err(map_status_error(status, body.as_ref()));
    }
    Ok(body.to_vec())
}

pub(super) fn decode_json<T: DeserializeOwned>(
    service: &str,
    body: &[u8],
) -> Result<T, TransportFailure> {
    serde_json::from_slice(body).map_err(|error| {
        TransportFailure::Decode(format!("invalid {service} JSON payload: {error}"))
    })
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
