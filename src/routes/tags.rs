use actix_web::{HttpResponse, Responder, delete, get, patch, post, web};

use crate::domain::auth::AuthenticatedUser;
use crate::forms::tags::{AddTagForm, EditTagForm};
use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::tags::{self as tags_service, TagQuery};

#[get("/tags")]
pub async fn list_tags(
    user: AuthenticatedUser,
    params: web::Query<TagQuery>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match tags_service::list_tags(repo.get_ref(), &user, params.into_inner()) {
        Ok(tags) => HttpResponse::Ok().json(tags),
        Err(err) => error_response("Failed to list tags", err),
    }
}

#[post("/tags")]
pub async fn create_tag(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Json<AddTagForm>,
) -> impl Responder {
    match tags_service::create_tag(repo.get_ref(), &user, form.into_inner()) {
        Ok(tag) => HttpResponse::Created().json(tag),
        Err(err) => error_response("Failed to create tag", err),
    }
}

#[get("/tags/{tag_id}")]
pub async fn show_tag(
    user: AuthenticatedUser,
    tag_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match tags_service::get_tag(repo.get_ref(), &user, tag_id.into_inner()) {
        Ok(tag) => HttpResponse::Ok().json(tag),
        Err(err) => error_response("Failed to load tag", err),
    }
}

#[patch("/tags/{tag_id}")]
pub async fn update_tag(
    user: AuthenticatedUser,
    tag_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
    form: web::Json<EditTagForm>,
) -> impl Responder {
    match tags_service::modify_tag(repo.get_ref(), &user, tag_id.into_inner(), form.into_inner()) {
        Ok(tag) => HttpResponse::Ok().json(tag),
        Err(err) => error_response("Failed to update tag", err),
    }
}

#[delete("/tags/{tag_id}")]
pub async fn delete_tag(
    user: AuthenticatedUser,
    tag_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match tags_service::remove_tag(repo.get_ref(), &user, tag_id.into_inner()) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => error_response("Failed to delete tag", err),
    }
}
