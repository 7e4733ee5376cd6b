pub mod activity;

use actix_web::{error::JsonPayloadError, web, HttpRequest};

use crate::errors::AppError;

fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::BadRequest(err.to_string()).into()
}

/// Registers the `/api/activities` routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .service(
            web::resource("/api/activities")
                .route(web::post().to(activity::track_activity))
                .route(web::get().to(activity::get_user_activities)),
        )
        .service(
            web::resource("/api/activities/{activityId}")
                .route(web::get().to(activity::get_activity)),
        );
}
