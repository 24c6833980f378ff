use actix_multipart::form::MultipartForm;
use actix_web::{HttpResponse, Responder, delete, get, patch, post, put, web};

use crate::config::ServerConfig;
use crate::domain::auth::AuthenticatedUser;
use crate::forms::recipes::{AddRecipeForm, EditRecipeForm, UploadRecipeImageForm};
use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::recipes::{self as recipes_service, RecipeQuery};

#[get("/recipes")]
pub async fn list_recipes(
    user: AuthenticatedUser,
    params: web::Query<RecipeQuery>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match recipes_service::list_recipes(repo.get_ref(), &user, params.into_inner()) {
        Ok(recipes) => HttpResponse::Ok().json(recipes),
        Err(err) => error_response("Failed to list recipes", err),
    }
}

#[post("/recipes")]
pub async fn create_recipe(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    form: web::Json<AddRecipeForm>,
) -> impl Responder {
    match recipes_service::create_recipe(
        repo.get_ref(),
        &user,
        form.into_inner(),
        &server_config,
    ) {
        Ok(recipe) => HttpResponse::Created().json(recipe),
        Err(err) => error_response("Failed to create recipe", err),
    }
}

#[get("/recipes/{recipe_id}")]
pub async fn show_recipe(
    user: AuthenticatedUser,
    recipe_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    match recipes_service::get_recipe(
        repo.get_ref(),
        &user,
        recipe_id.into_inner(),
        &server_config,
    ) {
        Ok(recipe) => HttpResponse::Ok().json(recipe),
        Err(err) => error_response("Failed to load recipe", err),
    }
}

#[patch("/recipes/{recipe_id}")]
pub async fn update_recipe(
    user: AuthenticatedUser,
    recipe_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    form: web::Json<EditRecipeForm>,
) -> impl Responder {
    match recipes_service::modify_recipe(
        repo.get_ref(),
        &user,
        recipe_id.into_inner(),
        form.into_inner(),
        &server_config,
    ) {
        Ok(recipe) => HttpResponse::Ok().json(recipe),
        Err(err) => error_response("Failed to update recipe", err),
    }
}

#[put("/recipes/{recipe_id}")]
pub async fn replace_recipe(
    user: AuthenticatedUser,
    recipe_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    form: web::Json<AddRecipeForm>,
) -> impl Responder {
    match recipes_service::replace_recipe(
        repo.get_ref(),
        &user,
        recipe_id.into_inner(),
        form.into_inner(),
        &server_config,
    ) {
        Ok(recipe) => HttpResponse::Ok().json(recipe),
        Err(err) => error_response("Failed to replace recipe", err),
    }
}

#[delete("/recipes/{recipe_id}")]
pub async fn delete_recipe(
    user: AuthenticatedUser,
    recipe_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match recipes_service::remove_recipe(repo.get_ref(), &user, recipe_id.into_inner()) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => error_response("Failed to delete recipe", err),
    }
}

#[post("/recipes/{recipe_id}/image")]
pub async fn upload_recipe_image(
    user: AuthenticatedUser,
    recipe_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    MultipartForm(mut form): MultipartForm<UploadRecipeImageForm>,
) -> impl Responder {
    match recipes_service::upload_recipe_image(
        repo.get_ref(),
        &user,
        recipe_id.into_inner(),
        || form.read_image(),
        &server_config,
    ) {
        Ok(image) => HttpResponse::Ok().json(image),
        Err(err) => error_response("Failed to upload recipe image", err),
    }
}
