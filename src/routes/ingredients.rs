use actix_web::{HttpResponse, Responder, delete, get, patch, post, web};

use crate::domain::auth::AuthenticatedUser;
use crate::forms::ingredients::{AddIngredientForm, EditIngredientForm};
use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::ingredients::{self as ingredients_service, IngredientQuery};

#[get("/ingredients")]
pub async fn list_ingredients(
    user: AuthenticatedUser,
    params: web::Query<IngredientQuery>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match ingredients_service::list_ingredients(repo.get_ref(), &user, params.into_inner()) {
        Ok(ingredients) => HttpResponse::Ok().json(ingredients),
        Err(err) => error_response("Failed to list ingredients", err),
    }
}

#[post("/ingredients")]
pub async fn create_ingredient(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Json<AddIngredientForm>,
) -> impl Responder {
    match ingredients_service::create_ingredient(repo.get_ref(), &user, form.into_inner()) {
        Ok(ingredient) => HttpResponse::Created().json(ingredient),
        Err(err) => error_response("Failed to create ingredient", err),
    }
}

#[get("/ingredients/{ingredient_id}")]
pub async fn show_ingredient(
    user: AuthenticatedUser,
    ingredient_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let ingredient_id = ingredient_id.into_inner();
    match ingredients_service::get_ingredient(repo.get_ref(), &user, ingredient_id) {
        Ok(ingredient) => HttpResponse::Ok().json(ingredient),
        Err(err) => error_response("Failed to load ingredient", err),
    }
}

#[patch("/ingredients/{ingredient_id}")]
pub async fn update_ingredient(
    user: AuthenticatedUser,
    ingredient_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
    form: web::Json<EditIngredientForm>,
) -> impl Responder {
    let ingredient_id = ingredient_id.into_inner();
    match ingredients_service::modify_ingredient(
        repo.get_ref(),
        &user,
        ingredient_id,
        form.into_inner(),
    ) {
        Ok(ingredient) => HttpResponse::Ok().json(ingredient),
        Err(err) => error_response("Failed to update ingredient", err),
    }
}

#[delete("/ingredients/{ingredient_id}")]
pub async fn delete_ingredient(
    user: AuthenticatedUser,
    ingredient_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let ingredient_id = ingredient_id.into_inner();
    match ingredients_service::remove_ingredient(repo.get_ref(), &user, ingredient_id) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => error_response("Failed to delete ingredient", err),
    }
}
