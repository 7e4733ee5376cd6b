use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use std::time::Duration;

use crate::errors::AppError;

/// Confirms that a user id belongs to a known user.
#[async_trait]
pub trait UserValidator: Send + Sync {
    async fn validate_user(&self, user_id: &str) -> Result<bool, AppError>;
}

/// Asks the user service `GET /api/users/{userId}/validate`, which answers
/// with a JSON boolean.
pub struct HttpUserValidator {
    client: Client,
    base_url: Url,
}

impl HttpUserValidator {
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(HttpUserValidator { client, base_url })
    }

    fn validate_url(&self, user_id: &str) -> Result<Url, AppError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                AppError::InternalServerError("User service URL cannot be a base".to_string())
            })?
            .pop_if_empty()
            .extend(["api", "users", user_id, "validate"]);
        Ok(url)
    }
}

fn unavailable() -> AppError {
    AppError::ServiceUnavailable("User service unavailable".to_string())
}

#[async_trait]
impl UserValidator for HttpUserValidator {
    async fn validate_user(&self, user_id: &str) -> Result<bool, AppError> {
        let url = self.validate_url(user_id)?;
        log::debug!("Validating user {} via {}", user_id, url);

        let response = self.client.get(url).send().await.map_err(|e| {
            log::error!("User service request failed for {}: {}", user_id, e);
            unavailable()
        })?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(false),
            StatusCode::BAD_REQUEST => Err(AppError::BadRequest(format!(
                "Invalid request for user: {}",
                user_id
            ))),
            status if status.is_success() => response.json::<bool>().await.map_err(|e| {
                log::error!("Unreadable user service response for {}: {}", user_id, e);
                unavailable()
            }),
            status => {
                log::error!("User service answered {} for {}", status, user_id);
                Err(unavailable())
            }
        }
    }
}
