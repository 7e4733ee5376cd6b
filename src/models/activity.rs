use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Open-ended key/value data attached to an activity (pace, heart rate, ...).
pub type Metrics = HashMap<String, serde_json::Value>;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityType {
    Running,
    Walking,
    Cycling,
    Swimming,
    WeightTraining,
    Yoga,
    Hiit,
    Cardio,
    Stretching,
    Other,
}

impl ActivityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityType::Running => "RUNNING",
            ActivityType::Walking => "WALKING",
            ActivityType::Cycling => "CYCLING",
            ActivityType::Swimming => "SWIMMING",
            ActivityType::WeightTraining => "WEIGHT_TRAINING",
            ActivityType::Yoga => "YOGA",
            ActivityType::Hiit => "HIIT",
            ActivityType::Cardio => "CARDIO",
            ActivityType::Stretching => "STRETCHING",
            ActivityType::Other => "OTHER",
        }
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "RUNNING" => Ok(ActivityType::Running),
            "WALKING" => Ok(ActivityType::Walking),
            "CYCLING" => Ok(ActivityType::Cycling),
            "SWIMMING" => Ok(ActivityType::Swimming),
            "WEIGHT_TRAINING" => Ok(ActivityType::WeightTraining),
            "YOGA" => Ok(ActivityType::Yoga),
            "HIIT" => Ok(ActivityType::Hiit),
            "CARDIO" => Ok(ActivityType::Cardio),
            "STRETCHING" => Ok(ActivityType::Stretching),
            "OTHER" => Ok(ActivityType::Other),
            other => Err(format!("Unknown activity type: {}", other)),
        }
    }
}

/// A stored activity. `id`, `created_at` and `updated_at` are assigned by the
/// repository on save.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
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

/// An activity that has not been persisted yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewActivity {
    pub user_id: String,
    pub activity_type: ActivityType,
    pub duration: f64,
    pub calories_burned: f64,
    pub start_time: Option<DateTime<Utc>>,
    pub additional_metrics: Metrics,
}

impl NewActivity {
    pub fn new(
        user_id: String,
        activity_type: ActivityType,
        duration: f64,
        calories_burned: f64,
        start_time: Option<DateTime<Utc>>,
        additional_metrics: Metrics,
    ) -> Self {
        NewActivity {
            user_id,
            activity_type,
            duration,
            calories_burned,
            start_time,
            additional_metrics,
        }
    }

    /// Assigns the server-side identity and timestamps.
    pub fn into_activity(self, id: String, now: DateTime<Utc>) -> Activity {
        Activity {
            id,
            user_id: self.user_id,
            activity_type: self.activity_type,
            duration: self.duration,
            calories_burned: self.calories_burned,
            start_time: self.start_time,
            additional_metrics: self.additional_metrics,
            created_at: now,
            updated_at: now,
        }
    }
}
