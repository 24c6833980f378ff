use std::future::{Ready, ready};

use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{FromRequest, HttpRequest, web};

use crate::domain::auth::AuthenticatedUser;
use crate::repository::DieselRepository;
use crate::services::ServiceError;
use crate::services::users::authenticate;

/// Resolves the caller from the `Authorization: Token <key>` header.
///
/// Handlers taking an [`AuthenticatedUser`] reject the request with 401 before
/// any other extractor or lookup runs when it is listed first.
impl FromRequest for AuthenticatedUser {
    type Error = ServiceError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate_request(req))
    }
}

fn authenticate_request(req: &HttpRequest) -> Result<AuthenticatedUser, ServiceError> {
    let repo = req
        .app_data::<web::Data<DieselRepository>>()
        .ok_or_else(|| ServiceError::Internal("repository is not configured".to_string()))?;

    let header = match req.headers().get(header::AUTHORIZATION) {
        Some(value) => Some(value.to_str().map_err(|_| ServiceError::Unauthorized)?),
        None => None,
    };

    authenticate(repo.get_ref(), header)
}
