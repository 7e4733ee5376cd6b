use std::sync::Arc;

use crate::db::ActivityRepository;
use crate::errors::AppError;
use crate::models::dto::{ActivityRequest, ActivityResponse};
use crate::services::publisher::ActivityPublisher;
use crate::services::user_validation::UserValidator;
use crate::utils::validation::validate_payload;

/// Records activities for validated users and announces them on the broker.
pub struct ActivityService {
    repository: Arc<dyn ActivityRepository>,
    user_validator: Arc<dyn UserValidator>,
    publisher: Arc<dyn ActivityPublisher>,
    exchange: String,
    routing_key: String,
}

impl ActivityService {
    pub fn new(
        repository: Arc<dyn ActivityRepository>,
        user_validator: Arc<dyn UserValidator>,
        publisher: Arc<dyn ActivityPublisher>,
        exchange: String,
        routing_key: String,
    ) -> Self {
        ActivityService {
            repository,
            user_validator,
            publisher,
            exchange,
            routing_key,
        }
    }

    /// Validates the owner, stores the activity and publishes it.
    ///
    /// Publishing is best-effort: a broker failure is logged and the stored
    /// activity is still returned.
    pub async fn track_activity(
        &self,
        request: ActivityRequest,
    ) -> Result<ActivityResponse, AppError> {
        validate_payload(&request)?;

        if !self.user_validator.validate_user(&request.user_id).await? {
            return Err(AppError::InvalidUser(request.user_id));
        }

        let saved = self.repository.save(request.into()).await?;

        if let Err(e) = self
            .publisher
            .publish(&self.exchange, &self.routing_key, &saved)
            .await
        {
            log::error!("Failed to publish activity {} to RabbitMQ: {}", saved.id, e);
        }

        log::info!(
            "Tracked {} activity {} for user {}",
            saved.activity_type,
            saved.id,
            saved.user_id
        );
        Ok(saved.into())
    }

    pub async fn get_user_activities(
        &self,
        user_id: &str,
    ) -> Result<Vec<ActivityResponse>, AppError> {
        let activities = self.repository.find_by_user_id(user_id).await?;
        log::debug!("Found {} activities for user {}", activities.len(), user_id);
        Ok(activities.into_iter().map(ActivityResponse::from).collect())
    }

    pub async fn get_activity(&self, activity_id: &str) -> Result<ActivityResponse, AppError> {
        self.repository
            .find_by_id(activity_id)
            .await?
            .map(ActivityResponse::from)
            .ok_or_else(|| AppError::NotFound("No activity found".to_string()))
    }
}
