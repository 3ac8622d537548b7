//! User lookups and creation, delegated to the user service.

use std::sync::Arc;

use serde_json::json;
use tracing::{info, warn};

use crate::domain::ports::{UserSource, UserSourceError};
use crate::domain::{Error, PageRequest, User, UserId};

/// Failures surfaced by [`UserDirectoryService`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserDirectoryError {
    /// The requested user does not exist.
    #[error("user {user_id} does not exist")]
    NotFound {
        /// Requested user.
        user_id: UserId,
    },
    /// A new user must have a non-blank name.
    #[error("user name must not be empty")]
    EmptyName,
    /// The user service failed.
    #[error("user service call failed: {0}")]
    Upstream(#[source] UserSourceError),
}

impl From<UserSourceError> for UserDirectoryError {
    fn from(value: UserSourceError) -> Self {
        match value {
            UserSourceError::NotFound { user_id } => Self::NotFound { user_id },
            other => Self::Upstream(other),
        }
    }
}

impl From<UserDirectoryError> for Error {
    fn from(value: UserDirectoryError) -> Self {
        match value {
            UserDirectoryError::NotFound { user_id } => {
                Error::not_found(format!("user {user_id} does not exist"))
            }
            UserDirectoryError::EmptyName => Error::invalid_request("name must not be empty")
                .with_details(json!({ "field": "name" })),
            UserDirectoryError::Upstream(source) => {
                Error::service_unavailable("user service is unavailable")
                    .with_details(json!({ "reason": source.to_string() }))
            }
        }
    }
}

/// Sibling use case to listing enrichment for reading and creating users.
#[derive(Clone)]
pub struct UserDirectoryService {
    users: Arc<dyn UserSource>,
}

impl UserDirectoryService {
    /// Wrap a user source.
    pub fn new(users: Arc<dyn UserSource>) -> Self {
        Self { users }
    }

    /// Fetch one user.
    pub async fn get_user(&self, user_id: UserId) -> Result<User, UserDirectoryError> {
        Ok(self.users.fetch_user_by_id(user_id).await?)
    }

    /// Fetch one page of users.
    pub async fn list_users(&self, page: &PageRequest) -> Result<Vec<User>, UserDirectoryError> {
        Ok(self.users.fetch_users_page(page).await?)
    }

    /// Create a user after checking the name is not blank.
    pub async fn create_user(&self, name: &str) -> Result<User, UserDirectoryError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(UserDirectoryError::EmptyName);
        }
        let user = self.users.create_user(name).await.map_err(|err| {
            warn!(error = %err, "user creation failed");
            UserDirectoryError::Upstream(err)
        })?;
        info!(user_id = user.id().get(), "created user");
        Ok(user)
    }
}

impl std::fmt::Debug for UserDirectoryService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserDirectoryService").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::MockUserSource;
    use crate::test_support::upstream::{StubUserSource, user};
    use rstest::rstest;

    fn id(raw: i64) -> UserId {
        UserId::new(raw).expect("positive id")
    }

    #[rstest]
    #[tokio::test]
    async fn get_user_maps_not_found() {
        let service = UserDirectoryService::new(Arc::new(StubUserSource::default()));
        let err = service.get_user(id(5)).await.expect_err("unknown user");
        assert_eq!(err, UserDirectoryError::NotFound { user_id: id(5) });
        assert_eq!(Error::from(err).code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[tokio::test]
    async fn list_users_pages_through_the_source() {
        let service = UserDirectoryService::new(Arc::new(StubUserSource::with_users([
            user(1, "A"),
            user(2, "B"),
            user(3, "C"),
        ])));
        let page = PageRequest::new(2, 2).expect("valid page");

        let users = service.list_users(&page).await.expect("page of users");

        let names: Vec<_> = users.iter().map(User::name).collect();
        assert_eq!(names, vec!["C"]);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[tokio::test]
    async fn create_user_rejects_blank_names(#[case] name: &str) {
        let mut source = MockUserSource::new();
        source.expect_create_user().never();
        let service = UserDirectoryService::new(Arc::new(source));

        let err = service.create_user(name).await.expect_err("blank name");
        assert_eq!(err, UserDirectoryError::EmptyName);
    }

    #[rstest]
    #[tokio::test]
    async fn create_user_trims_and_delegates() {
        let source = Arc::new(StubUserSource::default());
        let service = UserDirectoryService::new(source.clone());

        let created = service.create_user("  Grace  ").await.expect("created");

        assert_eq!(created.name(), "Grace");
        assert_eq!(source.created_names(), vec!["Grace".to_owned()]);
    }

    #[rstest]
    fn upstream_failures_map_to_service_unavailable() {
        let err = UserDirectoryError::from(UserSourceError::timeout("slow"));
        assert_eq!(Error::from(err).code(), ErrorCode::ServiceUnavailable);
    }
}
