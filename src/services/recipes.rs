use std::fs;
use std::path::Path;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::ServerConfig;
use crate::domain::auth::AuthenticatedUser;
use crate::domain::recipe::{Recipe, RecipeListQuery, format_price};
use crate::forms::recipes::{AddRecipeForm, EditRecipeForm, RecipeFormResult, RecipeImage};
use crate::repository::{RecipeReader, RecipeWriter};
use crate::services::ingredients::IngredientView;
use crate::services::tags::TagView;
use crate::services::{ServiceError, ServiceResult};

/// Directory, relative to the media root, that recipe images are stored in.
pub const RECIPE_IMAGE_DIR: &str = "uploads/recipe";

/// Query parameters accepted by the recipes listing.
#[derive(Debug, Default, Deserialize)]
pub struct RecipeQuery {
    /// Comma-separated tag ids; a recipe matches when it has any of them.
    pub tags: Option<String>,
    /// Comma-separated ingredient ids; a recipe matches when it uses any of them.
    pub ingredients: Option<String>,
}

/// Recipe as shown in listings.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RecipeView {
    pub id: i32,
    pub title: String,
    pub time_minutes: i32,
    pub price: String,
    pub link: String,
    pub tags: Vec<TagView>,
    pub ingredients: Vec<IngredientView>,
}

impl From<Recipe> for RecipeView {
    fn from(recipe: Recipe) -> Self {
        Self {
            id: recipe.id,
            title: recipe.title,
            time_minutes: recipe.time_minutes,
            price: format_price(recipe.price_cents),
            link: recipe.link,
            tags: recipe.tags.into_iter().map(TagView::from).collect(),
            ingredients: recipe
                .ingredients
                .into_iter()
                .map(IngredientView::from)
                .collect(),
        }
    }
}

/// Recipe as shown on its own: the listing fields plus description and image URL.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RecipeDetailView {
    pub id: i32,
    pub title: String,
    pub time_minutes: i32,
    pub price: String,
    pub link: String,
    pub tags: Vec<TagView>,
    pub ingredients: Vec<IngredientView>,
    pub description: String,
    pub image: Option<String>,
}

impl RecipeDetailView {
    pub fn new(recipe: Recipe, config: &ServerConfig) -> Self {
        let image = recipe
            .image
            .as_deref()
            .map(|path| config.media_url_for(path));
        let description = recipe.description.clone();
        let RecipeView {
            id,
            title,
            time_minutes,
            price,
            link,
            tags,
            ingredients,
        } = RecipeView::from(recipe);

        Self {
            id,
            title,
            time_minutes,
            price,
            link,
            tags,
            ingredients,
            description,
            image,
        }
    }
}

/// Response of an image upload.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RecipeImageView {
    pub id: i32,
    pub image: Option<String>,
}

/// Lists the authenticated user's recipes, newest first.
pub fn list_recipes<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: RecipeQuery,
) -> ServiceResult<Vec<RecipeView>>
where
    R: RecipeReader + ?Sized,
{
    let list_query = RecipeListQuery::new(user.id)
        .tag_ids(parse_id_list(query.tags.as_deref(), "tags")?)
        .ingredient_ids(parse_id_list(query.ingredients.as_deref(), "ingredients")?);

    let recipes = repo.list_recipes(list_query).map_err(ServiceError::from)?;

    Ok(recipes.into_iter().map(RecipeView::from).collect())
}

/// Fetches a single recipe owned by the authenticated user.
pub fn get_recipe<R>(
    repo: &R,
    user: &AuthenticatedUser,
    recipe_id: i32,
    config: &ServerConfig,
) -> ServiceResult<RecipeDetailView>
where
    R: RecipeReader + ?Sized,
{
    let recipe = repo
        .get_recipe_by_id(recipe_id, user.id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)?;

    Ok(RecipeDetailView::new(recipe, config))
}

/// Creates a recipe together with its nested tags and ingredients.
pub fn create_recipe<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: AddRecipeForm,
    config: &ServerConfig,
) -> ServiceResult<RecipeDetailView>
where
    R: RecipeWriter + ?Sized,
{
    let new_recipe = form
        .into_new_recipe(user.id)
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let recipe = repo
        .create_recipe(&new_recipe)
        .map_err(ServiceError::from)?;

    Ok(RecipeDetailView::new(recipe, config))
}

/// Applies a partial update; nested lists, when present, replace the associations.
pub fn modify_recipe<R>(
    repo: &R,
    user: &AuthenticatedUser,
    recipe_id: i32,
    form: EditRecipeForm,
    config: &ServerConfig,
) -> ServiceResult<RecipeDetailView>
where
    R: RecipeWriter + ?Sized,
{
    let update = form
        .into_update_recipe(Utc::now().naive_utc())
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let recipe = repo
        .update_recipe(recipe_id, user.id, &update)
        .map_err(ServiceError::from)?;

    Ok(RecipeDetailView::new(recipe, config))
}

/// Replaces every scalar field of the recipe.
pub fn replace_recipe<R>(
    repo: &R,
    user: &AuthenticatedUser,
    recipe_id: i32,
    form: AddRecipeForm,
    config: &ServerConfig,
) -> ServiceResult<RecipeDetailView>
where
    R: RecipeWriter + ?Sized,
{
    let update = form
        .into_replacement(Utc::now().naive_utc())
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let recipe = repo
        .update_recipe(recipe_id, user.id, &update)
        .map_err(ServiceError::from)?;

    Ok(RecipeDetailView::new(recipe, config))
}

pub fn remove_recipe<R>(repo: &R, user: &AuthenticatedUser, recipe_id: i32) -> ServiceResult<()>
where
    R: RecipeWriter + ?Sized,
{
    repo.delete_recipe(recipe_id, user.id)
        .map_err(ServiceError::from)
}

/// Stores a new image for a recipe of the authenticated user.
///
/// The recipe is looked up before `read_image` runs, so a foreign or missing
/// recipe is reported as not found whatever the upload contains. The file is
/// written under [`RECIPE_IMAGE_DIR`] with a random name; the previous image
/// file is removed once the new reference is stored.
pub fn upload_recipe_image<R, F>(
    repo: &R,
    user: &AuthenticatedUser,
    recipe_id: i32,
    read_image: F,
    config: &ServerConfig,
) -> ServiceResult<RecipeImageView>
where
    R: RecipeReader + RecipeWriter + ?Sized,
    F: FnOnce() -> RecipeFormResult<RecipeImage>,
{
    let recipe = repo
        .get_recipe_by_id(recipe_id, user.id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)?;

    let image = read_image().map_err(|err| ServiceError::Form(err.to_string()))?;

    let relative_path = format!("{RECIPE_IMAGE_DIR}/{}.{}", Uuid::new_v4(), image.extension);
    let absolute_path = config.media_root.join(&relative_path);

    if let Some(parent) = absolute_path.parent() {
        fs::create_dir_all(parent).map_err(|err| ServiceError::Internal(err.to_string()))?;
    }
    fs::write(&absolute_path, &image.bytes)
        .map_err(|err| ServiceError::Internal(err.to_string()))?;

    let updated = match repo.set_recipe_image(recipe.id, user.id, &relative_path) {
        Ok(updated) => updated,
        Err(err) => {
            remove_media_file(&absolute_path);
            return Err(ServiceError::from(err));
        }
    };

    if let Some(previous) = recipe.image.as_deref() {
        remove_media_file(&config.media_root.join(previous));
    }

    Ok(RecipeImageView {
        id: updated.id,
        image: updated.image.as_deref().map(|path| config.media_url_for(path)),
    })
}

fn remove_media_file(path: &Path) {
    if let Err(err) = fs::remove_file(path) {
        log::warn!("Failed to remove media file {}: {err}", path.display());
    }
}

fn parse_id_list(value: Option<&str>, field: &str) -> ServiceResult<Vec<i32>> {
    let Some(value) = value else {
        return Ok(Vec::new());
    };

    value
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<i32>().map_err(|_| {
                ServiceError::Form(format!("{field}: '{part}' is not a valid id"))
            })
        })
        .collect()
}
