//! Shared validation helpers for inbound HTTP adapters.

use actix_web::{HttpRequest, web};
use serde_json::json;

use crate::domain::Error;

/// Validation error codes reported in `details.code`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ValidationCode {
    InvalidInteger,
    NotPositive,
    Required,
    MalformedBody,
    MalformedQuery,
}

impl ValidationCode {
    const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidInteger => "invalid_integer",
            Self::NotPositive => "not_positive",
            Self::Required => "required",
            Self::MalformedBody => "malformed_body",
            Self::MalformedQuery => "malformed_query",
        }
    }
}

/// Build a 400 payload naming the offending field.
pub(crate) fn field_error(field: &str, code: ValidationCode, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field,
        "code": code.as_str(),
    }))
}

/// Parse an optional positive integer, falling back to `default` when the
/// parameter is absent or empty.
pub(crate) fn positive_or_default(
    field: &str,
    raw: Option<&str>,
    default: u32,
) -> Result<u32, Error> {
    match raw.map(str::trim).filter(|value| !value.is_empty()) {
        None => Ok(default),
        Some(value) => parse_positive(field, value),
    }
}

/// Parse a positive integer.
pub(crate) fn parse_positive<T>(field: &str, value: &str) -> Result<T, Error>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    let parsed: T = value.parse().map_err(|_| {
        field_error(
            field,
            ValidationCode::InvalidInteger,
            format!("Invalid {field} parameter"),
        )
    })?;
    if parsed <= T::default() {
        return Err(field_error(
            field,
            ValidationCode::NotPositive,
            format!("{field} must be positive"),
        ));
    }
    Ok(parsed)
}

pub(crate) fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req: &HttpRequest| {
        let message = format!("Invalid request body: {err}");
        Error::invalid_request(message)
            .with_details(json!({ "code": ValidationCode::MalformedBody.as_str() }))
            .into()
    })
}

pub(crate) fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req: &HttpRequest| {
        let message = format!("Invalid query string: {err}");
        Error::invalid_request(message)
            .with_details(json!({ "code": ValidationCode::MalformedQuery.as_str() }))
            .into()
    })
}
