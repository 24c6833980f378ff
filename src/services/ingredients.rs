use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::domain::auth::AuthenticatedUser;
use crate::domain::ingredient::{Ingredient, IngredientListQuery};
use crate::forms::ingredients::{AddIngredientForm, EditIngredientForm};
use crate::repository::{IngredientReader, IngredientWriter};
use crate::services::{ServiceError, ServiceResult, is_truthy, normalize_search};

/// Query parameters accepted by the ingredients listing.
#[derive(Debug, Default, Deserialize)]
pub struct IngredientQuery {
    pub assigned_only: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct IngredientView {
    pub id: i32,
    pub name: String,
}

impl From<Ingredient> for IngredientView {
    fn from(ingredient: Ingredient) -> Self {
        Self {
            id: ingredient.id,
            name: ingredient.name,
        }
    }
}

/// Lists the authenticated user's ingredients, ordered by name descending.
pub fn list_ingredients<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: IngredientQuery,
) -> ServiceResult<Vec<IngredientView>>
where
    R: IngredientReader + ?Sized,
{
    let mut list_query = IngredientListQuery::new(user.id);

    if query.assigned_only.as_deref().is_some_and(is_truthy) {
        list_query = list_query.assigned_only();
    }

    if let Some(term) = normalize_search(query.search) {
        list_query = list_query.search(term);
    }

    let ingredients = repo
        .list_ingredients(list_query)
        .map_err(ServiceError::from)?;

    Ok(ingredients.into_iter().map(IngredientView::from).collect())
}

pub fn get_ingredient<R>(
    repo: &R,
    user: &AuthenticatedUser,
    ingredient_id: i32,
) -> ServiceResult<IngredientView>
where
    R: IngredientReader + ?Sized,
{
    repo.get_ingredient_by_id(ingredient_id, user.id)
        .map_err(ServiceError::from)?
        .map(IngredientView::from)
        .ok_or(ServiceError::NotFound)
}

pub fn create_ingredient<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: AddIngredientForm,
) -> ServiceResult<IngredientView>
where
    R: IngredientWriter + ?Sized,
{
    let new_ingredient = form
        .into_new_ingredient(user.id)
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    repo.create_ingredient(&new_ingredient)
        .map(IngredientView::from)
        .map_err(ServiceError::from)
}

pub fn modify_ingredient<R>(
    repo: &R,
    user: &AuthenticatedUser,
    ingredient_id: i32,
    form: EditIngredientForm,
) -> ServiceResult<IngredientView>
where
    R: IngredientWriter + ?Sized,
{
    let update = form
        .into_update_ingredient(Utc::now().naive_utc())
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    repo.update_ingredient(ingredient_id, user.id, &update)
        .map(IngredientView::from)
        .map_err(ServiceError::from)
}

/// Deletes an ingredient, removing it from every recipe that used it.
pub fn remove_ingredient<R>(
    repo: &R,
    user: &AuthenticatedUser,
    ingredient_id: i32,
) -> ServiceResult<()>
where
    R: IngredientWriter + ?Sized,
{
    repo.delete_ingredient(ingredient_id, user.id)
        .map_err(ServiceError::from)
}
