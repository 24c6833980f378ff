use crate::db::{DbConnection, DbPool};
use crate::domain::ingredient::{Ingredient, IngredientListQuery, NewIngredient, UpdateIngredient};
use crate::domain::recipe::{NewRecipe, Recipe, RecipeListQuery, UpdateRecipe};
use crate::domain::tag::{NewTag, Tag, TagListQuery, UpdateTag};
use crate::domain::user::{NewUser, User};
use crate::repository::errors::RepositoryResult;

pub mod errors;
pub mod ingredient;
pub mod recipe;
pub mod tag;
pub mod user;

#[cfg(test)]
pub mod mock;

#[derive(Clone)]
/// Diesel-backed repository implementation that wraps an r2d2 pool.
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository using the provided connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Read-only operations over user accounts and their API tokens.
pub trait UserReader {
    fn get_user_by_email(&self, email: &str) -> RepositoryResult<Option<User>>;
    /// Resolve the owner of an API token key.
    fn get_user_by_token(&self, key: &str) -> RepositoryResult<Option<User>>;
}

/// Write operations over user accounts and their API tokens.
pub trait UserWriter {
    /// Insert the account and its API token `key` in one transaction.
    fn create_user(&self, new_user: &NewUser, token_key: &str) -> RepositoryResult<User>;
}

/// Read-only operations over recipe records, always scoped to an owner.
pub trait RecipeReader {
    fn get_recipe_by_id(&self, id: i32, user_id: i32) -> RepositoryResult<Option<Recipe>>;
    fn list_recipes(&self, query: RecipeListQuery) -> RepositoryResult<Vec<Recipe>>;
}

/// Write operations over recipe records, always scoped to an owner.
///
/// Creating and updating a recipe resolves its nested tag and ingredient names
/// in the same transaction as the scalar write.
pub trait RecipeWriter {
    fn create_recipe(&self, new_recipe: &NewRecipe) -> RepositoryResult<Recipe>;
    fn update_recipe(
        &self,
        recipe_id: i32,
        user_id: i32,
        updates: &UpdateRecipe,
    ) -> RepositoryResult<Recipe>;
    /// Point the recipe at a stored image, relative to the media root.
    fn set_recipe_image(
        &self,
        recipe_id: i32,
        user_id: i32,
        image: &str,
    ) -> RepositoryResult<Recipe>;
    fn delete_recipe(&self, recipe_id: i32, user_id: i32) -> RepositoryResult<()>;
}

/// Read-only operations over tag records.
pub trait TagReader {
    fn get_tag_by_id(&self, id: i32, user_id: i32) -> RepositoryResult<Option<Tag>>;
    fn list_tags(&self, query: TagListQuery) -> RepositoryResult<Vec<Tag>>;
}

/// Write operations over tag records.
pub trait TagWriter {
    fn create_tag(&self, new_tag: &NewTag) -> RepositoryResult<Tag>;
    fn update_tag(&self, tag_id: i32, user_id: i32, updates: &UpdateTag) -> RepositoryResult<Tag>;
    fn delete_tag(&self, tag_id: i32, user_id: i32) -> RepositoryResult<()>;
}

/// Read-only operations over ingredient records.
pub trait IngredientReader {
    fn get_ingredient_by_id(&self, id: i32, user_id: i32) -> RepositoryResult<Option<Ingredient>>;
    fn list_ingredients(&self, query: IngredientListQuery) -> RepositoryResult<Vec<Ingredient>>;
}

/// Write operations over ingredient records.
pub trait IngredientWriter {
    fn create_ingredient(&self, new_ingredient: &NewIngredient) -> RepositoryResult<Ingredient>;
    fn update_ingredient(
        &self,
        ingredient_id: i32,
        user_id: i32,
        updates: &UpdateIngredient,
    ) -> RepositoryResult<Ingredient>;
    fn delete_ingredient(&self, ingredient_id: i32, user_id: i32) -> RepositoryResult<()>;
}

/// Escape character used with [`contains_pattern`].
pub(crate) const LIKE_ESCAPE: char = '\\';

/// Build a `LIKE` pattern matching `search` as a literal substring.
pub(crate) fn contains_pattern(search: &str) -> String {
    let mut pattern = String::with_capacity(search.len() + 2);
    pattern.push('%');
    for ch in search.chars() {
        if matches!(ch, '%' | '_' | LIKE_ESCAPE) {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}
