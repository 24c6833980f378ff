use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Ingredient owned by a single user that can be used by many recipes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Ingredient {
    pub id: i32,
    pub user_id: i32,
    /// Name of the ingredient, unique per owner.
    pub name: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIngredient {
    pub user_id: i32,
    pub name: String,
}

impl NewIngredient {
    pub fn new(user_id: i32, name: impl Into<String>) -> Self {
        let name = name.into().trim().to_string();
        Self { user_id, name }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateIngredient {
    pub name: Option<String>,
    pub updated_at: NaiveDateTime,
}

/// Query definition used to list ingredients for a user.
#[derive(Debug, Clone, Default)]
pub struct IngredientListQuery {
    pub user_id: i32,
    /// Restrict the listing to ingredients used by at least one recipe.
    pub assigned_only: bool,
    pub search: Option<String>,
}

impl IngredientListQuery {
    pub fn new(user_id: i32) -> Self {
        Self {
            user_id,
            ..Self::default()
        }
    }

    pub fn assigned_only(mut self) -> Self {
        self.assigned_only = true;
        self
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }
}
