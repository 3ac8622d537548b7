//! User records owned by the user upstream service.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Validation errors raised while constructing user values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// Identifiers are positive integers.
    #[error("user id must be a positive integer, got {value}")]
    NonPositiveId { value: i64 },
    /// Names must contain at least one non-whitespace character.
    #[error("user name must not be empty")]
    EmptyName,
}

/// Positive integer identifying a user in the upstream user service.
///
/// # Examples
/// ```
/// use public_api::domain::UserId;
///
/// let id = UserId::new(7).expect("positive id");
/// assert_eq!(id.get(), 7);
/// assert!(UserId::new(0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct UserId(i64);

impl UserId {
    /// Validate and wrap a raw identifier.
    pub fn new(raw: i64) -> Result<Self, UserValidationError> {
        if raw <= 0 {
            return Err(UserValidationError::NonPositiveId { value: raw });
        }
        Ok(Self(raw))
    }

    /// Raw integer value.
    #[must_use]
    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i64> for UserId {
    type Error = UserValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserId> for i64 {
    fn from(value: UserId) -> Self {
        value.0
    }
}

/// User attached to listings.
///
/// ## Invariants
/// - `name` is non-empty once trimmed.
/// - Values are immutable once fetched; the gateway never edits a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct User {
    #[schema(value_type = i64, example = 7)]
    id: UserId,
    #[schema(example = "Ada")]
    name: String,
    /// Creation time as Unix microseconds, as reported upstream.
    created_at: i64,
    /// Last update time as Unix microseconds, as reported upstream.
    updated_at: i64,
}

impl User {
    /// Build a user from upstream fields.
    ///
    /// # Examples
    /// ```
    /// use public_api::domain::{User, UserId};
    ///
    /// let id = UserId::new(8).expect("positive id");
    /// let user = User::new(id, "Grace", 1, 2).expect("valid user");
    /// assert_eq!(user.name(), "Grace");
    /// ```
    pub fn new(
        id: UserId,
        name: impl Into<String>,
        created_at: i64,
        updated_at: i64,
    ) -> Result<Self, UserValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(UserValidationError::EmptyName);
        }
        Ok(Self {
            id,
            name,
            created_at,
            updated_at,
        })
    }

    /// Stable identifier.
    #[must_use]
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Creation timestamp.
    #[must_use]
    pub fn created_at(&self) -> i64 {
        self.created_at
    }

    /// Last update timestamp.
    #[must_use]
    pub fn updated_at(&self) -> i64 {
        self.updated_at
    }
}
