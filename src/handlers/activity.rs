use actix_web::{web, HttpRequest, HttpResponse};

use crate::errors::AppError;
use crate::models::dto::ActivityRequest;
use crate::services::activity::ActivityService;
use crate::utils::validation::user_id_header;

// POST /api/activities
pub async fn track_activity(
    service: web::Data<ActivityService>,
    payload: web::Json<ActivityRequest>,
) -> Result<HttpResponse, AppError> {
    let response = service.track_activity(payload.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

// GET /api/activities
pub async fn get_user_activities(
    req: HttpRequest,
    service: web::Data<ActivityService>,
) -> Result<HttpResponse, AppError> {
    let user_id = user_id_header(&req)?;
    let activities = service.get_user_activities(&user_id).await?;
    Ok(HttpResponse::Ok().json(activities))
}

// GET /api/activities/{activityId}
pub async fn get_activity(
    service: web::Data<ActivityService>,
    activity_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let response = service.get_activity(&activity_id).await?;
    Ok(HttpResponse::Ok().json(response))
}
