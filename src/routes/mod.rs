use actix_multipart::form::MultipartFormConfig;
use actix_web::http::{StatusCode, header};
use actix_web::{HttpResponse, ResponseError, web};
use serde_json::json;

use crate::services::ServiceError;

pub mod ingredients;
pub mod recipes;
pub mod tags;

/// Register every API handler under `/api` along with the extractor settings
/// that turn malformed payloads into 400 responses.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| ServiceError::Form(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| ServiceError::Form(err.to_string()).into()),
    )
    .app_data(
        MultipartFormConfig::default()
            .error_handler(|err, _req| ServiceError::Form(err.to_string()).into()),
    )
    .service(
        web::scope("/api")
            .service(recipes::list_recipes)
            .service(recipes::create_recipe)
            .service(recipes::show_recipe)
            .service(recipes::update_recipe)
            .service(recipes::replace_recipe)
            .service(recipes::delete_recipe)
            .service(recipes::upload_recipe_image)
            .service(tags::list_tags)
            .service(tags::create_tag)
            .service(tags::show_tag)
            .service(tags::update_tag)
            .service(tags::delete_tag)
            .service(ingredients::list_ingredients)
            .service(ingredients::create_ingredient)
            .service(ingredients::show_ingredient)
            .service(ingredients::update_ingredient)
            .service(ingredients::delete_ingredient),
    );
}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Unauthorized => StatusCode::UNAUTHORIZED,
            ServiceError::NotFound => StatusCode::NOT_FOUND,
            ServiceError::Form(_) => StatusCode::BAD_REQUEST,
            ServiceError::Conflict => StatusCode::CONFLICT,
            ServiceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let detail = match self {
            ServiceError::Internal(_) => "internal server error".to_string(),
            other => other.to_string(),
        };

        let mut response = HttpResponse::build(self.status_code());
        if matches!(self, ServiceError::Unauthorized) {
            response.insert_header((header::WWW_AUTHENTICATE, "Token"));
        }
        response.json(json!({ "detail": detail }))
    }
}

/// Convert a failed service call into a response, logging unexpected failures.
pub(crate) fn error_response(context: &str, err: ServiceError) -> HttpResponse {
    if let ServiceError::Internal(_) = &err {
        log::error!("{context}: {err}");
    }
    err.error_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[actix_web::test]
    async fn unauthorized_response_challenges_for_token() {
        let response = ServiceError::Unauthorized.error_response();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response
                .headers()
                .get(header::WWW_AUTHENTICATE)
                .and_then(|value| value.to_str().ok()),
            Some("Token")
        );
    }

    #[actix_web::test]
    async fn internal_error_hides_details() {
        let response = ServiceError::Internal("disk on fire".to_string()).error_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = to_bytes(response.into_body()).await.expect("body");
        let body: serde_json::Value = serde_json::from_slice(&body).expect("json body");
        assert_eq!(body["detail"], "internal server error");
    }

    #[test]
    fn service_errors_map_to_statuses() {
        assert_eq!(ServiceError::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ServiceError::Form("bad".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ServiceError::Conflict.status_code(), StatusCode::CONFLICT);
    }
}
