//! Driven port for the upstream user service.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{PageRequest, User, UserId};

define_port_error! {
    /// Errors surfaced while calling the user service.
    pub enum UserSourceError {
        /// The service reported that the user does not exist.
        NotFound { user_id: UserId } =>
            "user {user_id} not found",
        /// Network transport failed before a response arrived.
        Transport { message: String } =>
            "user service transport failed: {message}",
        /// The call exceeded the configured timeout.
        Timeout { message: String } =>
            "user service timed out: {message}",
        /// The service answered with an unexpected status.
        Status { status: u16, message: String } =>
            "user service returned status {status}: {message}",
        /// The response body could not be decoded.
        Decode { message: String } =>
            "user service response decode failed: {message}",
    }
}

impl UserSourceError {
    /// Whether the upstream positively reported the user as missing.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Port for reading and creating users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserSource: Send + Sync {
    /// Fetch a single user.
    ///
    /// Returns [`UserSourceError::NotFound`] when the service has no such user.
    async fn fetch_user_by_id(&self, user_id: UserId) -> Result<User, UserSourceError>;

    /// Fetch one page of users in upstream order.
    async fn fetch_users_page(&self, page: &PageRequest) -> Result<Vec<User>, UserSourceError>;

    /// Create a user with the given display name.
    async fn create_user(&self, name: &str) -> Result<User, UserSourceError>;
}

/// Fixture source that knows exactly one user.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureUserSource;

impl FixtureUserSource {
    /// Identifier of the single fixture user.
    pub const USER_ID: i64 = 1;
    /// Name of the single fixture user.
    pub const USER_NAME: &'static str = "Ada Lovelace";

    fn fixture_user() -> Result<User, UserSourceError> {
        let id = UserId::new(Self::USER_ID)
            .map_err(|err| UserSourceError::decode(format!("invalid fixture user: {err}")))?;
        User::new(id, Self::USER_NAME, 0, 0)
            .map_err(|err| UserSourceError::decode(format!("invalid fixture user: {err}")))
    }
}

#[async_trait]
impl UserSource for FixtureUserSource {
    async fn fetch_user_by_id(&self, user_id: UserId) -> Result<User, UserSourceError> {
        if user_id.get() != Self::USER_ID {
            return Err(UserSourceError::not_found(user_id));
        }
        Self::fixture_user()
    }

    async fn fetch_users_page(&self, page: &PageRequest) -> Result<Vec<User>, UserSourceError> {
        if page.page_num() > 1 {
            return Ok(Vec::new());
        }
        Ok(vec![Self::fixture_user()?])
    }

    async fn create_user(&self, name: &str) -> Result<User, UserSourceError> {
        let id = UserId::new(Self::USER_ID + 1)
            .map_err(|err| UserSourceError::decode(err.to_string()))?;
        User::new(id, name, 0, 0).map_err(|err| UserSourceError::decode(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn fixture_reports_unknown_users_as_not_found() {
        let missing = UserId::new(99).expect("positive id");
        let err = FixtureUserSource
            .fetch_user_by_id(missing)
            .await
            .expect_err("unknown user");
        assert!(err.is_not_found());
        assert_eq!(err, UserSourceError::not_found(missing));
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_returns_known_user() {
        let known = UserId::new(FixtureUserSource::USER_ID).expect("positive id");
        let user = FixtureUserSource
            .fetch_user_by_id(known)
            .await
            .expect("fixture user");
        assert_eq!(user.name(), FixtureUserSource::USER_NAME);
    }

    #[rstest]
    #[case(UserSourceError::timeout("slow"))]
    #[case(UserSourceError::transport("refused"))]
    #[case(UserSourceError::status(500_u16, "boom"))]
    #[case(UserSourceError::decode("garbage"))]
    fn only_not_found_is_not_found(#[case] err: UserSourceError) {
        assert!(!err.is_not_found());
    }
}
