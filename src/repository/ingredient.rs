use std::collections::{BTreeSet, HashMap};

use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::domain::ingredient::{
    Ingredient as DomainIngredient, IngredientListQuery, NewIngredient as DomainNewIngredient,
    UpdateIngredient as DomainUpdateIngredient,
};
use crate::models::ingredient::{
    Ingredient as DbIngredient, NewIngredient as DbNewIngredient,
    UpdateIngredient as DbUpdateIngredient,
};
use crate::models::recipe_ingredient::NewRecipeIngredient as DbNewRecipeIngredient;
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{
    DieselRepository, IngredientReader, IngredientWriter, LIKE_ESCAPE, contains_pattern,
};

impl IngredientReader for DieselRepository {
    fn get_ingredient_by_id(
        &self,
        id: i32,
        user_id: i32,
    ) -> RepositoryResult<Option<DomainIngredient>> {
        use crate::schema::ingredients;

        let mut conn = self.conn()?;
        let ingredient = ingredients::table
            .filter(ingredients::id.eq(id))
            .filter(ingredients::user_id.eq(user_id))
            .first::<DbIngredient>(&mut conn)
            .optional()?;

        Ok(ingredient.map(Into::into))
    }

    fn list_ingredients(
        &self,
        query: IngredientListQuery,
    ) -> RepositoryResult<Vec<DomainIngredient>> {
        use crate::schema::{ingredients, recipe_ingredients};

        let mut conn = self.conn()?;

        let mut items_query = ingredients::table
            .filter(ingredients::user_id.eq(query.user_id))
            .into_boxed::<diesel::sqlite::Sqlite>();

        // Associations never cross owners, so any referenced ingredient of this
        // user is used by one of the user's own recipes.
        if query.assigned_only {
            items_query = items_query.filter(
                ingredients::id
                    .eq_any(recipe_ingredients::table.select(recipe_ingredients::ingredient_id)),
            );
        }

        if let Some(search) = query.search.as_ref() {
            items_query = items_query
                .filter(ingredients::name.like(contains_pattern(search)).escape(LIKE_ESCAPE));
        }

        items_query = items_query.order((ingredients::name.desc(), ingredients::id.desc()));

        let db_ingredients = items_query.load::<DbIngredient>(&mut conn)?;

        Ok(db_ingredients.into_iter().map(DomainIngredient::from).collect())
    }
}

impl IngredientWriter for DieselRepository {
    fn create_ingredient(
        &self,
        new_ingredient: &DomainNewIngredient,
    ) -> RepositoryResult<DomainIngredient> {
        use crate::schema::ingredients;

        let mut conn = self.conn()?;
        let insertable = DbNewIngredient::from(new_ingredient);

        let created = diesel::insert_into(ingredients::table)
            .values(&insertable)
            .get_result::<DbIngredient>(&mut conn)?;

        Ok(created.into())
    }

    fn update_ingredient(
        &self,
        ingredient_id: i32,
        user_id: i32,
        updates: &DomainUpdateIngredient,
    ) -> RepositoryResult<DomainIngredient> {
        use crate::schema::ingredients;

        let mut conn = self.conn()?;
        let db_updates = DbUpdateIngredient::from(updates);

        let target = ingredients::table
            .filter(ingredients::id.eq(ingredient_id))
            .filter(ingredients::user_id.eq(user_id));

        let updated = diesel::update(target)
            .set(&db_updates)
            .get_result::<DbIngredient>(&mut conn)?;

        Ok(updated.into())
    }

    fn delete_ingredient(&self, ingredient_id: i32, user_id: i32) -> RepositoryResult<()> {
        use crate::schema::{ingredients, recipe_ingredients};

        let mut conn = self.conn()?;

        conn.immediate_transaction(|conn| {
            let target = ingredients::table
                .filter(ingredients::id.eq(ingredient_id))
                .filter(ingredients::user_id.eq(user_id));

            let deleted = diesel::delete(target).execute(conn)?;
            if deleted == 0 {
                return Err(RepositoryError::NotFound);
            }

            diesel::delete(
                recipe_ingredients::table
                    .filter(recipe_ingredients::ingredient_id.eq(ingredient_id)),
            )
            .execute(conn)?;

            Ok(())
        })
    }
}

/// Resolve each name to the id of the owner's ingredient with exactly that name,
/// creating missing ingredients. Duplicate names collapse into one id.
pub(crate) fn resolve_ingredient_ids(
    conn: &mut SqliteConnection,
    user_id: i32,
    names: &[String],
) -> RepositoryResult<BTreeSet<i32>> {
    use crate::schema::ingredients;

    let mut ids = BTreeSet::new();

    for name in names {
        diesel::insert_into(ingredients::table)
            .values(&DbNewIngredient {
                user_id,
                name: name.as_str(),
            })
            .on_conflict((ingredients::user_id, ingredients::name))
            .do_nothing()
            .execute(conn)?;

        let id = ingredients::table
            .filter(ingredients::user_id.eq(user_id))
            .filter(ingredients::name.eq(name.as_str()))
            .select(ingredients::id)
            .first::<i32>(conn)?;

        ids.insert(id);
    }

    Ok(ids)
}

/// Make `ingredient_ids` the complete ingredient set of the recipe.
pub(crate) fn replace_recipe_ingredients(
    conn: &mut SqliteConnection,
    recipe_id: i32,
    ingredient_ids: &BTreeSet<i32>,
) -> RepositoryResult<()> {
    use crate::schema::recipe_ingredients;

    diesel::delete(
        recipe_ingredients::table.filter(recipe_ingredients::recipe_id.eq(recipe_id)),
    )
    .execute(conn)?;

    if ingredient_ids.is_empty() {
        return Ok(());
    }

    let rows: Vec<DbNewRecipeIngredient> = ingredient_ids
        .iter()
        .map(|&ingredient_id| DbNewRecipeIngredient {
            recipe_id,
            ingredient_id,
        })
        .collect();

    diesel::insert_into(recipe_ingredients::table)
        .values(&rows)
        .execute(conn)?;

    Ok(())
}

pub(crate) fn load_ingredients_for_recipes(
    conn: &mut SqliteConnection,
    recipe_ids: &[i32],
) -> RepositoryResult<HashMap<i32, Vec<DomainIngredient>>> {
    use crate::schema::{ingredients, recipe_ingredients};

    if recipe_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = recipe_ingredients::table
        .inner_join(ingredients::table)
        .filter(recipe_ingredients::recipe_id.eq_any(recipe_ids))
        .order(ingredients::name.asc())
        .select((recipe_ingredients::recipe_id, DbIngredient::as_select()))
        .load::<(i32, DbIngredient)>(conn)?;

    let mut map: HashMap<i32, Vec<DomainIngredient>> = HashMap::new();
    for (recipe_id, ingredient) in rows {
        map.entry(recipe_id).or_default().push(ingredient.into());
    }

    Ok(map)
}
