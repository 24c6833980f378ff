use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::recipe::{
    NewRecipe as DomainNewRecipe, Recipe as DomainRecipe, UpdateRecipe as DomainUpdateRecipe,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::recipes)]
pub struct Recipe {
    pub id: i32,
    pub user_id: i32,
    pub title: String,
    pub time_minutes: i32,
    pub price_cents: i64,
    pub description: String,
    pub link: String,
    pub image: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::recipes)]
pub struct NewRecipe<'a> {
    pub user_id: i32,
    pub title: &'a str,
    pub time_minutes: i32,
    pub price_cents: i64,
    pub description: &'a str,
    pub link: &'a str,
}

/// Scalar recipe changes; `None` fields are skipped by Diesel.
#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::recipes)]
pub struct UpdateRecipe<'a> {
    pub title: Option<&'a str>,
    pub time_minutes: Option<i32>,
    pub price_cents: Option<i64>,
    pub description: Option<&'a str>,
    pub link: Option<&'a str>,
    pub updated_at: NaiveDateTime,
}

impl From<Recipe> for DomainRecipe {
    fn from(value: Recipe) -> Self {
        Self {
            id: value.id,
            user_id: value.user_id,
            title: value.title,
            time_minutes: value.time_minutes,
            price_cents: value.price_cents,
            description: value.description,
            link: value.link,
            image: value.image,
            tags: Vec::new(),
            ingredients: Vec::new(),
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainNewRecipe> for NewRecipe<'a> {
    fn from(value: &'a DomainNewRecipe) -> Self {
        Self {
            user_id: value.user_id,
            title: value.title.as_str(),
            time_minutes: value.time_minutes,
            price_cents: value.price_cents,
            description: value.description.as_str(),
            link: value.link.as_str(),
        }
    }
}

impl<'a> From<&'a DomainUpdateRecipe> for UpdateRecipe<'a> {
    fn from(value: &'a DomainUpdateRecipe) -> Self {
        Self {
            title: value.title.as_deref(),
            time_minutes: value.time_minutes,
            price_cents: value.price_cents,
            description: value.description.as_deref(),
            link: value.link.as_deref(),
            updated_at: value.updated_at,
        }
    }
}
