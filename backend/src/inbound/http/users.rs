//! User API handlers.
//!
//! ```text
//! POST /public-api/users {"name":"Ada"}
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::ApiResult;
use super::state::HttpState;
use crate::domain::{Error, User};

/// Request body for `POST /public-api/users`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateUserRequest {
    /// Display name; must not be blank.
    #[schema(example = "Ada Lovelace")]
    pub name: String,
}

/// Response body for `POST /public-api/users`.
#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedUserResponse {
    /// The user as stored by the user service.
    pub user: User,
}

/// Create a user through the user service.
#[utoipa::path(
    post,
    path = "/public-api/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = CreatedUserResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 503, description = "User service failed", body = Error)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<CreateUserRequest>,
) -> ApiResult<HttpResponse> {
    let user = state.users.create_user(&payload.name).await?;
    Ok(HttpResponse::Created().json(CreatedUserResponse { user }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::ports::{FixtureListingSource, MockUserSource, UserSource, UserSourceError};
    use crate::domain::{
        ListingEnrichmentConfig, ListingEnrichmentService, UpstreamFetcher, UserDirectoryService,
    };
    use crate::inbound::http::configure_public_api;
    use crate::test_support::upstream::{InMemoryUserCache, StubUserSource};
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use rstest::rstest;
    use serde_json::{Value, json};

    async fn post_user(users: Arc<dyn UserSource>, payload: Value) -> (StatusCode, Value) {
        let fetcher = UpstreamFetcher::new(Arc::new(FixtureListingSource), users.clone());
        let state = HttpState::new(
            Arc::new(ListingEnrichmentService::new(
                fetcher,
                Arc::new(InMemoryUserCache::default()),
                ListingEnrichmentConfig::default(),
            )),
            Arc::new(UserDirectoryService::new(users)),
        );
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(configure_public_api),
        )
        .await;
        let request = actix_test::TestRequest::post()
            .uri("/public-api/users")
            .set_json(payload)
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        let status = response.status();
        let body = actix_test::read_body(response).await;
        (status, serde_json::from_slice(&body).expect("JSON body"))
    }

    #[rstest]
    #[actix_web::test]
    async fn creates_user() {
        let users = Arc::new(StubUserSource::default());

        let (status, body) = post_user(users.clone(), json!({"name": "Ada"})).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["user"]["name"], "Ada");
        assert_eq!(users.created_names(), vec!["Ada".to_owned()]);
    }

    #[rstest]
    #[case(json!({"name": ""}))]
    #[case(json!({"name": "   "}))]
    #[actix_web::test]
    async fn rejects_blank_names(#[case] payload: Value) {
        let users = Arc::new(StubUserSource::default());

        let (status, body) = post_user(users.clone(), payload).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"]["field"], "name");
        assert!(users.created_names().is_empty());
    }

    #[rstest]
    #[actix_web::test]
    async fn missing_name_is_a_malformed_body() {
        let (status, body) =
            post_user(Arc::new(StubUserSource::default()), json!({"nickname": "x"})).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "invalid_request");
        assert_eq!(body["details"]["code"], "malformed_body");
    }

    #[rstest]
    #[actix_web::test]
    async fn user_service_failure_is_unavailable() {
        let mut source = MockUserSource::new();
        source
            .expect_create_user()
            .times(1)
            .returning(|_| Err(UserSourceError::status(500_u16, "db down")));

        let (status, body) = post_user(Arc::new(source), json!({"name": "Ada"})).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["code"], "service_unavailable");
    }
}
