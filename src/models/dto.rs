use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use crate::models::activity::{Activity, ActivityType, Metrics, NewActivity};

#[derive(Serialize, Deserialize, Validate, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ActivityRequest {
    #[validate(length(min = 1, message = "User id cannot be empty"))]
    pub user_id: String,

    #[serde(rename = "type")]
    pub activity_type: ActivityType,

    #[validate(range(min = 0.0, message = "Duration cannot be negative"))]
    pub duration: f64,

    #[validate(range(min = 0.0, message = "Calories burned cannot be negative"))]
    pub calories_burned: f64,

    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub additional_metrics: Metrics,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Metrics, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Metrics>::deserialize(deserializer)?.unwrap_or_default())
}

impl From<ActivityRequest> for NewActivity {
    fn from(request: ActivityRequest) -> Self {
        NewActivity::new(
            request.user_id,
            request.activity_type,
            request.duration,
            request.calories_burned,
            request.start_time,
            request.additional_metrics,
        )
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ActivityResponse {
    pub id: String,
    pub user_id: String,
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    pub duration: f64,
    pub calories_burned: f64,
    pub start_time: Option<DateTime<Utc>>,
    pub additional_metrics: Metrics,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Activity> for ActivityResponse {
    fn from(activity: Activity) -> Self {
        ActivityResponse {
            id: activity.id,
            user_id: activity.user_id,
            activity_type: activity.activity_type,
            duration: activity.duration,
            calories_burned: activity.calories_burned,
            start_time: activity.start_time,
            additional_metrics: activity.additional_metrics,
            created_at: activity.created_at,
            updated_at: activity.updated_at,
        }
    }
}
