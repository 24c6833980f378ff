use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::ingredient::{
    Ingredient as DomainIngredient, NewIngredient as DomainNewIngredient,
    UpdateIngredient as DomainUpdateIngredient,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::ingredients)]
pub struct Ingredient {
    pub id: i32,
    pub user_id: i32,
    pub name: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::ingredients)]
pub struct NewIngredient<'a> {
    pub user_id: i32,
    pub name: &'a str,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::ingredients)]
pub struct UpdateIngredient<'a> {
    pub name: Option<&'a str>,
    pub updated_at: NaiveDateTime,
}

impl From<Ingredient> for DomainIngredient {
    fn from(value: Ingredient) -> Self {
        Self {
            id: value.id,
            user_id: value.user_id,
            name: value.name,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainNewIngredient> for NewIngredient<'a> {
    fn from(value: &'a DomainNewIngredient) -> Self {
        Self {
            user_id: value.user_id,
            name: value.name.as_str(),
        }
    }
}

impl<'a> From<&'a DomainUpdateIngredient> for UpdateIngredient<'a> {
    fn from(value: &'a DomainUpdateIngredient) -> Self {
        Self {
            name: value.name.as_deref(),
            updated_at: value.updated_at,
        }
    }
}
