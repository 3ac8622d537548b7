//! Reqwest-backed `UserSource` adapter.
//!
//! Single users are read from `GET {base}/users/{id}`, where a 404 means the
//! user does not exist. Pages come from `GET {base}/users` and creation is a
//! form-encoded `POST {base}/users`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use tracing::{debug, warn};

use super::dto::{UserEnvelope, UsersEnvelope};
use super::transport::{
    TransportFailure, UpstreamClientError, UpstreamEndpoint, decode_json, map_transport_error,
    success_body,
};
use crate::domain::ports::{UserSource, UserSourceError};
use crate::domain::{PageRequest, User, UserId};

const SERVICE: &str = "user service";

/// User service client.
#[derive(Debug, Clone)]
pub struct UserHttpSource {
    endpoint: UpstreamEndpoint,
}

impl UserHttpSource {
    /// Build an adapter whose requests time out after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error when `base_url` cannot carry a path or the reqwest
    /// client cannot be constructed.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, UpstreamClientError> {
        Ok(Self {
            endpoint: UpstreamEndpoint::new(base_url, timeout)?,
        })
    }
}

#[async_trait]
impl UserSource for UserHttpSource {
    async fn fetch_user_by_id(&self, user_id: UserId) -> Result<User, UserSourceError> {
        let id_segment = user_id.to_string();
        let response = self
            .endpoint
            .client()
            .get(self.endpoint.url(&["users", id_segment.as_str()]))
            .send()
            .await
            .map_err(|err| log_failure(map_transport_error(&err)))?;
        if response.status() == StatusCode::NOT_FOUND {
            debug!(user_id = user_id.get(), "user service reports user missing");
            return Err(UserSourceError::not_found(user_id));
        }
        let body = success_body(response).await.map_err(log_failure)?;
        let envelope: UserEnvelope = decode_json(SERVICE, &body).map_err(log_failure)?;
        let user = envelope
            .user
            .into_domain()
            .map_err(|message| log_failure(TransportFailure::Decode(message)))?;
        if user.id() != user_id {
            return Err(log_failure(TransportFailure::Decode(format!(
                "requested user {user_id} but received user {}",
                user.id()
            ))));
        }
        Ok(user)
    }

    async fn fetch_users_page(&self, page: &PageRequest) -> Result<Vec<User>, UserSourceError> {
        let params = [
            ("page_num", page.page_num().to_string()),
            ("page_size", page.page_size().to_string()),
        ];
        let response = self
            .endpoint
            .client()
            .get(self.endpoint.url(&["users"]))
            .query(&params)
            .send()
            .await
            .map_err(|err| log_failure(map_transport_error(&err)))?;
        let body = success_body(response).await.map_err(log_failure)?;
        let envelope: UsersEnvelope = decode_json(SERVICE, &body).map_err(log_failure)?;
        envelope
            .into_domain()
            .map_err(|message| log_failure(TransportFailure::Decode(message)))
    }

    async fn create_user(&self, name: &str) -> Result<User, UserSourceError> {
        let response = self
            .endpoint
            .client()
            .post(self.endpoint.url(&["users"]))
            .form(&[("name", name)])
            .send()
            .await
            .map_err(|err| log_failure(map_transport_error(&err)))?;
        let body = success_body(response).await.map_err(log_failure)?;
        let envelope: UserEnvelope = decode_json(SERVICE, &body).map_err(log_failure)?;
        let created = envelope
            .user
            .into_domain()
            .map_err(|message| log_failure(TransportFailure::Decode(message)))?;
        debug!(user_id = created.id().get(), "user service created user");
        Ok(created)
    }
}

fn log_failure(failure: TransportFailure) -> UserSourceError {
    let error = UserSourceError::from(failure);
    warn!(error = %error, "user service call failed");
    error
}
