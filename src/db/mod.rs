pub mod activity_repository;

use async_trait::async_trait;

use crate::errors::AppError;
use crate::models::activity::{Activity, NewActivity};

pub use activity_repository::PgActivityRepository;

/// Durable storage for activities.
#[async_trait]
pub trait ActivityRepository: Send + Sync {
    /// Stores the activity, assigning its id and timestamps.
    async fn save(&self, activity: NewActivity) -> Result<Activity, AppError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Activity>, AppError>;

    async fn find_by_user_id(&self, user_id: &str) -> Result<Vec<Activity>, AppError>;
}
