use mockall::mock;

use super::{
    IngredientReader, IngredientWriter, RecipeReader, RecipeWriter, TagReader, TagWriter,
    UserReader, UserWriter,
};
use crate::domain::{
    ingredient::{Ingredient, IngredientListQuery, NewIngredient, UpdateIngredient},
    recipe::{NewRecipe, Recipe, RecipeListQuery, UpdateRecipe},
    tag::{NewTag, Tag, TagListQuery, UpdateTag},
    user::{NewUser, User},
};
use crate::repository::errors::RepositoryResult;

mock! {
    pub UserReader {}

    impl UserReader for UserReader {
        fn get_user_by_email(&self, email: &str) -> RepositoryResult<Option<User>>;
        fn get_user_by_token(&self, key: &str) -> RepositoryResult<Option<User>>;
    }
}

// Account creation checks the email before inserting.
mock! {
    pub UserRepository {}

    impl UserReader for UserRepository {
        fn get_user_by_email(&self, email: &str) -> RepositoryResult<Option<User>>;
        fn get_user_by_token(&self, key: &str) -> RepositoryResult<Option<User>>;
    }

    impl UserWriter for UserRepository {
        fn create_user(&self, new_user: &NewUser, token_key: &str) -> RepositoryResult<User>;
    }
}

mock! {
    pub RecipeReader {}

    impl RecipeReader for RecipeReader {
        fn get_recipe_by_id(&self, id: i32, user_id: i32) -> RepositoryResult<Option<Recipe>>;
        fn list_recipes(&self, query: RecipeListQuery) -> RepositoryResult<Vec<Recipe>>;
    }
}

mock! {
    pub RecipeWriter {}

    impl RecipeWriter for RecipeWriter {
        fn create_recipe(&self, new_recipe: &NewRecipe) -> RepositoryResult<Recipe>;
        fn update_recipe(&self, recipe_id: i32, user_id: i32, updates: &UpdateRecipe) -> RepositoryResult<Recipe>;
        fn set_recipe_image(&self, recipe_id: i32, user_id: i32, image: &str) -> RepositoryResult<Recipe>;
        fn delete_recipe(&self, recipe_id: i32, user_id: i32) -> RepositoryResult<()>;
    }
}

// Image uploads read the current recipe before writing the new reference.
mock! {
    pub RecipeRepository {}

    impl RecipeReader for RecipeRepository {
        fn get_recipe_by_id(&self, id: i32, user_id: i32) -> RepositoryResult<Option<Recipe>>;
        fn list_recipes(&self, query: RecipeListQuery) -> RepositoryResult<Vec<Recipe>>;
    }

    impl RecipeWriter for RecipeRepository {
        fn create_recipe(&self, new_recipe: &NewRecipe) -> RepositoryResult<Recipe>;
        fn update_recipe(&self, recipe_id: i32, user_id: i32, updates: &UpdateRecipe) -> RepositoryResult<Recipe>;
        fn set_recipe_image(&self, recipe_id: i32, user_id: i32, image: &str) -> RepositoryResult<Recipe>;
        fn delete_recipe(&self, recipe_id: i32, user_id: i32) -> RepositoryResult<()>;
    }
}

mock! {
    pub TagReader {}

    impl TagReader for TagReader {
        fn get_tag_by_id(&self, id: i32, user_id: i32) -> RepositoryResult<Option<Tag>>;
        fn list_tags(&self, query: TagListQuery) -> RepositoryResult<Vec<Tag>>;
    }
}

mock! {
    pub TagWriter {}

    impl TagWriter for TagWriter {
        fn create_tag(&self, new_tag: &NewTag) -> RepositoryResult<Tag>;
        fn update_tag(&self, tag_id: i32, user_id: i32, updates: &UpdateTag) -> RepositoryResult<Tag>;
        fn delete_tag(&self, tag_id: i32, user_id: i32) -> RepositoryResult<()>;
    }
}

mock! {
    pub IngredientReader {}

    impl IngredientReader for IngredientReader {
        fn get_ingredient_by_id(&self, id: i32, user_id: i32) -> RepositoryResult<Option<Ingredient>>;
        fn list_ingredients(&self, query: IngredientListQuery) -> RepositoryResult<Vec<Ingredient>>;
    }
}

mock! {
    pub IngredientWriter {}

    impl IngredientWriter for IngredientWriter {
        fn create_ingredient(&self, new_ingredient: &NewIngredient) -> RepositoryResult<Ingredient>;
        fn update_ingredient(&self, ingredient_id: i32, user_id: i32, updates: &UpdateIngredient) -> RepositoryResult<Ingredient>;
        fn delete_ingredient(&self, ingredient_id: i32, user_id: i32) -> RepositoryResult<()>;
    }
}
