use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::ActivityRepository;
use crate::errors::AppError;
use crate::models::activity::{Activity, ActivityType, Metrics, NewActivity};

const ACTIVITY_COLUMNS: &str = "id, user_id, activity_type, duration, calories_burned, start_time, additional_metrics, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct ActivityRow {
    id: String,
    user_id: String,
    activity_type: String,
    duration: f64,
    calories_burned: f64,
    start_time: Option<DateTime<Utc>>,
    additional_metrics: Json<Metrics>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ActivityRow> for Activity {
    type Error = AppError;

    fn try_from(row: ActivityRow) -> Result<Self, Self::Error> {
        let activity_type = row.activity_type.parse::<ActivityType>().map_err(|e| {
            log::error!("Corrupt activity row {}: {}", row.id, e);
            AppError::InternalServerError("Database error".to_string())
        })?;

        Ok(Activity {
            id: row.id,
            user_id: row.user_id,
            activity_type,
            duration: row.duration,
            calories_burned: row.calories_burned,
            start_time: row.start_time,
            additional_metrics: row.additional_metrics.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

pub struct PgActivityRepository {
    pool: PgPool,
}

impl PgActivityRepository {
    pub fn new(pool: PgPool) -> Self {
        PgActivityRepository { pool }
    }
}

#[async_trait]
impl ActivityRepository for PgActivityRepository {
    async fn save(&self, activity: NewActivity) -> Result<Activity, AppError> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        let row = sqlx::query_as::<_, ActivityRow>(&format!(
            "INSERT INTO activities ({}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8) RETURNING {}",
            ACTIVITY_COLUMNS, ACTIVITY_COLUMNS
        ))
        .bind(&id)
        .bind(&activity.user_id)
        .bind(activity.activity_type.as_str())
        .bind(activity.duration)
        .bind(activity.calories_burned)
        .bind(activity.start_time)
        .bind(Json(&activity.additional_metrics))
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        log::debug!("Inserted activity {} for user {}", row.id, row.user_id);
        row.try_into()
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Activity>, AppError> {
        let row = sqlx::query_as::<_, ActivityRow>(&format!(
            "SELECT {} FROM activities WHERE id = $1",
            ACTIVITY_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Activity::try_from).transpose()
    }

    async fn find_by_user_id(&self, user_id: &str) -> Result<Vec<Activity>, AppError> {
        let rows = sqlx::query_as::<_, ActivityRow>(&format!(
            "SELECT {} FROM activities WHERE user_id = $1 ORDER BY created_at, id",
            ACTIVITY_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Activity::try_from).collect()
    }
}
