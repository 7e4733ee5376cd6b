//! In-memory stand-ins for the database, user service and broker.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::db::ActivityRepository;
use crate::errors::AppError;
use crate::models::activity::{Activity, NewActivity};
use crate::services::activity::ActivityService;
use crate::services::publisher::{ActivityPublisher, PublishError};
use crate::services::user_validation::UserValidator;

pub const EXCHANGE: &str = "fitness.exchange";
pub const ROUTING_KEY: &str = "activity.tracking";

#[derive(Default)]
pub struct InMemoryActivityRepository {
    activities: Mutex<Vec<Activity>>,
}

impl InMemoryActivityRepository {
    pub fn len(&self) -> usize {
        self.activities.lock().unwrap().len()
    }
}

#[async_trait]
impl ActivityRepository for InMemoryActivityRepository {
    async fn save(&self, activity: NewActivity) -> Result<Activity, AppError> {
        let saved = activity.into_activity(Uuid::new_v4().to_string(), Utc::now());
        self.activities.lock().unwrap().push(saved.clone());
        Ok(saved)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Activity>, AppError> {
        let activities = self.activities.lock().unwrap();
        Ok(activities.iter().find(|a| a.id == id).cloned())
    }

    async fn find_by_user_id(&self, user_id: &str) -> Result<Vec<Activity>, AppError> {
        let activities = self.activities.lock().unwrap();
        Ok(activities.iter().filter(|a| a.user_id == user_id).cloned().collect())
    }
}

/// Every call fails the way an unreachable database does.
pub struct FailingActivityRepository;

fn database_error() -> AppError {
    AppError::InternalServerError("Database error".to_string())
}

#[async_trait]
impl ActivityRepository for FailingActivityRepository {
    async fn save(&self, _activity: NewActivity) -> Result<Activity, AppError> {
        Err(database_error())
    }

    async fn find_by_id(&self, _id: &str) -> Result<Option<Activity>, AppError> {
        Err(database_error())
    }

    async fn find_by_user_id(&self, _user_id: &str) -> Result<Vec<Activity>, AppError> {
        Err(database_error())
    }
}

/// Behaves like a user service that cannot be reached.
pub struct UnavailableUserValidator;

#[async_trait]
impl UserValidator for UnavailableUserValidator {
    async fn validate_user(&self, _user_id: &str) -> Result<bool, AppError> {
        Err(AppError::ServiceUnavailable("User service unavailable".to_string()))
    }
}

pub struct StaticUserValidator {
    valid: HashSet<String>,
    calls: Mutex<Vec<String>>,
}

impl StaticUserValidator {
    pub fn accepting(users: &[&str]) -> Self {
        StaticUserValidator {
            valid: users.iter().map(|u| u.to_string()).collect(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl UserValidator for StaticUserValidator {
    async fn validate_user(&self, user_id: &str) -> Result<bool, AppError> {
        self.calls.lock().unwrap().push(user_id.to_string());
        Ok(self.valid.contains(user_id))
    }
}

#[derive(Default)]
pub struct RecordingPublisher {
    fail: bool,
    published: Mutex<Vec<(String, String, Activity)>>,
}

impl RecordingPublisher {
    pub fn failing() -> Self {
        RecordingPublisher {
            fail: true,
            ..RecordingPublisher::default()
        }
    }

    pub fn published(&self) -> Vec<(String, String, Activity)> {
        self.published.lock().unwrap().clone()
    }
}

#[async_trait]
impl ActivityPublisher for RecordingPublisher {
    async fn publish(
        &self,
        exchange: &str,
        routing_key: &str,
        activity: &Activity,
    ) -> Result<(), PublishError> {
        if self.fail {
            return Err(PublishError::Broker("connection reset".to_string()));
        }
        self.published.lock().unwrap().push((
            exchange.to_string(),
            routing_key.to_string(),
            activity.clone(),
        ));
        Ok(())
    }
}

pub struct Harness {
    pub repository: Arc<InMemoryActivityRepository>,
    pub validator: Arc<StaticUserValidator>,
    pub publisher: Arc<RecordingPublisher>,
}

impl Harness {
    pub fn new(valid_users: &[&str], publisher: RecordingPublisher) -> Self {
        Harness {
            repository: Arc::new(InMemoryActivityRepository::default()),
            validator: Arc::new(StaticUserValidator::accepting(valid_users)),
            publisher: Arc::new(publisher),
        }
    }

    pub fn service(&self) -> ActivityService {
        ActivityService::new(
            self.repository.clone(),
            self.validator.clone(),
            self.publisher.clone(),
            EXCHANGE.to_string(),
            ROUTING_KEY.to_string(),
        )
    }
}
