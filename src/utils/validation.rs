use actix_web::HttpRequest;
use validator::Validate;
use crate::errors::AppError;

pub const USER_ID_HEADER: &str = "X-User-ID";

pub fn validate_payload<T: Validate>(payload: &T) -> Result<(), AppError> {
    payload.validate()
        .map_err(|err| AppError::BadRequest(err.to_string()))
}

// The caller asserts its own identity through the header; it is not verified here.
pub fn user_id_header(req: &HttpRequest) -> Result<String, AppError> {
    let user_id = req.headers().get(USER_ID_HEADER)
        .ok_or_else(|| AppError::BadRequest(format!("Missing {} header", USER_ID_HEADER)))?
        .to_str()
        .map_err(|_| AppError::BadRequest(format!("Invalid {} header", USER_ID_HEADER)))?
        .trim();

    if user_id.is_empty() {
        return Err(AppError::BadRequest(format!("{} header cannot be empty", USER_ID_HEADER)));
    }
    Ok(user_id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn reads_user_id_header() {
        let req = TestRequest::default()
            .insert_header((USER_ID_HEADER, "u1"))
            .to_http_request();
        assert_eq!(user_id_header(&req).unwrap(), "u1");
    }

    #[test]
    fn rejects_missing_or_blank_header() {
        let missing = TestRequest::default().to_http_request();
        assert!(matches!(user_id_header(&missing), Err(AppError::BadRequest(_))));

        let blank = TestRequest::default()
            .insert_header((USER_ID_HEADER, "  "))
            .to_http_request();
        assert!(matches!(user_id_header(&blank), Err(AppError::BadRequest(_))));
    }
}
