use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::ingredient::Ingredient;
use crate::domain::tag::Tag;

/// Domain representation of a recipe together with its resolved associations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Recipe {
    /// Unique identifier of the recipe.
    pub id: i32,
    /// Owning user identifier.
    pub user_id: i32,
    /// Title of the recipe.
    pub title: String,
    /// Preparation time in minutes.
    pub time_minutes: i32,
    /// Price in cents.
    pub price_cents: i64,
    /// Free-form description, empty when not provided.
    pub description: String,
    /// External link, empty when not provided.
    pub link: String,
    /// Image path relative to the media root.
    pub image: Option<String>,
    /// Tags attached to the recipe, ordered by name.
    pub tags: Vec<Tag>,
    /// Ingredients used by the recipe, ordered by name.
    pub ingredients: Vec<Ingredient>,
    /// Timestamp for when the recipe record was created.
    pub created_at: NaiveDateTime,
    /// Timestamp for the last update to the recipe record.
    pub updated_at: NaiveDateTime,
}

/// Payload required to insert a new recipe for a user.
///
/// `tags` and `ingredients` hold sanitized names; each one is resolved to an
/// existing entity of the owner or created on the fly. `None` leaves the
/// association empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecipe {
    pub user_id: i32,
    pub title: String,
    pub time_minutes: i32,
    pub price_cents: i64,
    pub description: String,
    pub link: String,
    pub tags: Option<Vec<String>>,
    pub ingredients: Option<Vec<String>>,
}

impl NewRecipe {
    /// Build a new recipe payload with empty description, link and associations.
    pub fn new(
        user_id: i32,
        title: impl Into<String>,
        time_minutes: i32,
        price_cents: i64,
    ) -> Self {
        Self {
            user_id,
            title: title.into(),
            time_minutes,
            price_cents,
            description: String::new(),
            link: String::new(),
            tags: None,
            ingredients: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = link.into();
        self
    }

    /// Attach tag names to resolve when the recipe is stored.
    pub fn with_tags<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Attach ingredient names to resolve when the recipe is stored.
    pub fn with_ingredients<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ingredients = Some(names.into_iter().map(Into::into).collect());
        self
    }
}

/// Patch data applied when updating an existing recipe.
///
/// Scalar fields set to `None` are left untouched. `tags`/`ingredients` set to
/// `Some` replace the whole association with the resolved names; an empty list
/// clears it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateRecipe {
    pub title: Option<String>,
    pub time_minutes: Option<i32>,
    pub price_cents: Option<i64>,
    pub description: Option<String>,
    pub link: Option<String>,
    pub tags: Option<Vec<String>>,
    pub ingredients: Option<Vec<String>>,
    /// Timestamp captured when the patch was created.
    pub updated_at: NaiveDateTime,
}

impl UpdateRecipe {
    /// Construct an empty patch stamped with `updated_at`.
    pub fn new(updated_at: NaiveDateTime) -> Self {
        Self {
            title: None,
            time_minutes: None,
            price_cents: None,
            description: None,
            link: None,
            tags: None,
            ingredients: None,
            updated_at,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn time_minutes(mut self, time_minutes: i32) -> Self {
        self.time_minutes = Some(time_minutes);
        self
    }

    pub fn price_cents(mut self, price_cents: i64) -> Self {
        self.price_cents = Some(price_cents);
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    pub fn tags<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn ingredients<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ingredients = Some(names.into_iter().map(Into::into).collect());
        self
    }
}

/// Query definition used to list recipes for a user.
#[derive(Debug, Clone, Default)]
pub struct RecipeListQuery {
    /// Owning user identifier.
    pub user_id: i32,
    /// Only include recipes carrying at least one of these tags.
    pub tag_ids: Vec<i32>,
    /// Only include recipes using at least one of these ingredients.
    pub ingredient_ids: Vec<i32>,
}

impl RecipeListQuery {
    /// Construct a query that targets all recipes belonging to `user_id`.
    pub fn new(user_id: i32) -> Self {
        Self {
            user_id,
            ..Self::default()
        }
    }

    pub fn tag_ids(mut self, ids: Vec<i32>) -> Self {
        self.tag_ids = ids;
        self
    }

    pub fn ingredient_ids(mut self, ids: Vec<i32>) -> Self {
        self.ingredient_ids = ids;
        self
    }
}

/// Render a price in cents as a decimal string with two fractional digits.
pub fn format_price(price_cents: i64) -> String {
    let sign = if price_cents < 0 { "-" } else { "" };
    let cents = price_cents.unsigned_abs();
    format!("{sign}{}.{:02}", cents / 100, cents % 100)
}
