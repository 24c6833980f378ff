use chrono::Utc;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::{
    domain::recipe::{
        NewRecipe as DomainNewRecipe, Recipe as DomainRecipe, RecipeListQuery,
        UpdateRecipe as DomainUpdateRecipe,
    },
    models::recipe::{
        NewRecipe as DbNewRecipe, Recipe as DbRecipe, UpdateRecipe as DbUpdateRecipe,
    },
    repository::errors::{RepositoryError, RepositoryResult},
    repository::ingredient::{
        load_ingredients_for_recipes, replace_recipe_ingredients, resolve_ingredient_ids,
    },
    repository::tag::{load_tags_for_recipes, replace_recipe_tags, resolve_tag_ids},
    repository::{DieselRepository, RecipeReader, RecipeWriter},
};

impl RecipeReader for DieselRepository {
    fn get_recipe_by_id(&self, id: i32, user_id: i32) -> RepositoryResult<Option<DomainRecipe>> {
        use crate::schema::recipes;

        let mut conn = self.conn()?;
        let recipe = recipes::table
            .filter(recipes::id.eq(id))
            .filter(recipes::user_id.eq(user_id))
            .first::<DbRecipe>(&mut conn)
            .optional()?;

        match recipe {
            Some(db_recipe) => Ok(Some(hydrate_recipe(&mut conn, db_recipe)?)),
            None => Ok(None),
        }
    }

    fn list_recipes(&self, query: RecipeListQuery) -> RepositoryResult<Vec<DomainRecipe>> {
        use crate::schema::{recipe_ingredients, recipe_tags, recipes};

        let mut conn = self.conn()?;

        let mut items = recipes::table
            .filter(recipes::user_id.eq(query.user_id))
            .into_boxed::<diesel::sqlite::Sqlite>();

        if !query.tag_ids.is_empty() {
            items = items.filter(
                recipes::id.eq_any(
                    recipe_tags::table
                        .filter(recipe_tags::tag_id.eq_any(query.tag_ids.clone()))
                        .select(recipe_tags::recipe_id),
                ),
            );
        }

        if !query.ingredient_ids.is_empty() {
            items = items.filter(
                recipes::id.eq_any(
                    recipe_ingredients::table
                        .filter(
                            recipe_ingredients::ingredient_id.eq_any(query.ingredient_ids.clone()),
                        )
                        .select(recipe_ingredients::recipe_id),
                ),
            );
        }

        items = items.order(recipes::id.desc());

        let db_recipes = items.load::<DbRecipe>(&mut conn)?;

        hydrate_recipes(&mut conn, db_recipes)
    }
}

impl RecipeWriter for DieselRepository {
    fn create_recipe(&self, new_recipe: &DomainNewRecipe) -> RepositoryResult<DomainRecipe> {
        use crate::schema::recipes;

        let mut conn = self.conn()?;

        conn.immediate_transaction(|conn| {
            let db_new = DbNewRecipe::from(new_recipe);

            let created = diesel::insert_into(recipes::table)
                .values(&db_new)
                .get_result::<DbRecipe>(conn)?;

            reconcile_associations(
                conn,
                created.id,
                new_recipe.user_id,
                new_recipe.tags.as_deref(),
                new_recipe.ingredients.as_deref(),
            )?;

            hydrate_recipe(conn, created)
        })
    }

    fn update_recipe(
        &self,
        recipe_id: i32,
        user_id: i32,
        updates: &DomainUpdateRecipe,
    ) -> RepositoryResult<DomainRecipe> {
        use crate::schema::recipes;

        let mut conn = self.conn()?;

        conn.immediate_transaction(|conn| {
            let db_updates = DbUpdateRecipe::from(updates);

            let target = recipes::table
                .filter(recipes::id.eq(recipe_id))
                .filter(recipes::user_id.eq(user_id));

            let updated = diesel::update(target)
                .set(&db_updates)
                .get_result::<DbRecipe>(conn)?;

            reconcile_associations(
                conn,
                updated.id,
                user_id,
                updates.tags.as_deref(),
                updates.ingredients.as_deref(),
            )?;

            hydrate_recipe(conn, updated)
        })
    }

    fn set_recipe_image(
        &self,
        recipe_id: i32,
        user_id: i32,
        image: &str,
    ) -> RepositoryResult<DomainRecipe> {
        use crate::schema::recipes;

        let mut conn = self.conn()?;

        let target = recipes::table
            .filter(recipes::id.eq(recipe_id))
            .filter(recipes::user_id.eq(user_id));

        let updated = diesel::update(target)
            .set((
                recipes::image.eq(image),
                recipes::updated_at.eq(Utc::now().naive_utc()),
            ))
            .get_result::<DbRecipe>(&mut conn)?;

        hydrate_recipe(&mut conn, updated)
    }

    fn delete_recipe(&self, recipe_id: i32, user_id: i32) -> RepositoryResult<()> {
        use crate::schema::{recipe_ingredients, recipe_tags, recipes};

        let mut conn = self.conn()?;

        conn.immediate_transaction(|conn| {
            let target = recipes::table
                .filter(recipes::id.eq(recipe_id))
                .filter(recipes::user_id.eq(user_id));

            let deleted = diesel::delete(target).execute(conn)?;
            if deleted == 0 {
                return Err(RepositoryError::NotFound);
            }

            // Only the links go; the tags and ingredients stay with their owner.
            diesel::delete(recipe_tags::table.filter(recipe_tags::recipe_id.eq(recipe_id)))
                .execute(conn)?;
            diesel::delete(
                recipe_ingredients::table.filter(recipe_ingredients::recipe_id.eq(recipe_id)),
            )
            .execute(conn)?;

            Ok(())
        })
    }
}

/// Replace each supplied association with the owner's entities resolved from
/// `tags` / `ingredients`. `None` leaves that association untouched.
fn reconcile_associations(
    conn: &mut SqliteConnection,
    recipe_id: i32,
    user_id: i32,
    tags: Option<&[String]>,
    ingredients: Option<&[String]>,
) -> RepositoryResult<()> {
    if let Some(names) = tags {
        let tag_ids = resolve_tag_ids(conn, user_id, names)?;
        replace_recipe_tags(conn, recipe_id, &tag_ids)?;
    }

    if let Some(names) = ingredients {
        let ingredient_ids = resolve_ingredient_ids(conn, user_id, names)?;
        replace_recipe_ingredients(conn, recipe_id, &ingredient_ids)?;
    }

    Ok(())
}

fn hydrate_recipe(
    conn: &mut SqliteConnection,
    db_recipe: DbRecipe,
) -> RepositoryResult<DomainRecipe> {
    hydrate_recipes(conn, vec![db_recipe])?
        .pop()
        .ok_or(RepositoryError::NotFound)
}

fn hydrate_recipes(
    conn: &mut SqliteConnection,
    db_recipes: Vec<DbRecipe>,
) -> RepositoryResult<Vec<DomainRecipe>> {
    if db_recipes.is_empty() {
        return Ok(Vec::new());
    }

    let recipe_ids: Vec<i32> = db_recipes.iter().map(|recipe| recipe.id).collect();
    let mut tag_map = load_tags_for_recipes(conn, &recipe_ids)?;
    let mut ingredient_map = load_ingredients_for_recipes(conn, &recipe_ids)?;

    let mut recipes = Vec::with_capacity(db_recipes.len());
    for db_recipe in db_recipes {
        let mut domain: DomainRecipe = db_recipe.into();
        domain.tags = tag_map.remove(&domain.id).unwrap_or_default();
        domain.ingredients = ingredient_map.remove(&domain.id).unwrap_or_default();
        recipes.push(domain);
    }

    Ok(recipes)
}
