use std::collections::{BTreeSet, HashMap};

use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::domain::tag::{
    NewTag as DomainNewTag, Tag as DomainTag, TagListQuery, UpdateTag as DomainUpdateTag,
};
use crate::models::recipe_tag::NewRecipeTag as DbNewRecipeTag;
use crate::models::tag::{NewTag as DbNewTag, Tag as DbTag, UpdateTag as DbUpdateTag};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, LIKE_ESCAPE, TagReader, TagWriter, contains_pattern};

impl TagReader for DieselRepository {
    fn get_tag_by_id(&self, id: i32, user_id: i32) -> RepositoryResult<Option<DomainTag>> {
        use crate::schema::tags;

        let mut conn = self.conn()?;
        let tag = tags::table
            .filter(tags::id.eq(id))
            .filter(tags::user_id.eq(user_id))
            .first::<DbTag>(&mut conn)
            .optional()?;

        Ok(tag.map(Into::into))
    }

    fn list_tags(&self, query: TagListQuery) -> RepositoryResult<Vec<DomainTag>> {
        use crate::schema::{recipe_tags, tags};

        let mut conn = self.conn()?;

        let mut items_query = tags::table
            .filter(tags::user_id.eq(query.user_id))
            .into_boxed::<diesel::sqlite::Sqlite>();

        // Associations never cross owners, so any referenced tag of this user is
        // referenced by one of the user's own recipes.
        if query.assigned_only {
            items_query =
                items_query.filter(tags::id.eq_any(recipe_tags::table.select(recipe_tags::tag_id)));
        }

        if let Some(search) = query.search.as_ref() {
            items_query = items_query
                .filter(tags::name.like(contains_pattern(search)).escape(LIKE_ESCAPE));
        }

        items_query = items_query.order((tags::name.desc(), tags::id.desc()));

        let db_tags = items_query.load::<DbTag>(&mut conn)?;

        Ok(db_tags.into_iter().map(DomainTag::from).collect())
    }
}

impl TagWriter for DieselRepository {
    fn create_tag(&self, new_tag: &DomainNewTag) -> RepositoryResult<DomainTag> {
        use crate::schema::tags;

        let mut conn = self.conn()?;
        let insertable = DbNewTag::from(new_tag);

        let created = diesel::insert_into(tags::table)
            .values(&insertable)
            .get_result::<DbTag>(&mut conn)?;

        Ok(created.into())
    }

    fn update_tag(
        &self,
        tag_id: i32,
        user_id: i32,
        updates: &DomainUpdateTag,
    ) -> RepositoryResult<DomainTag> {
        use crate::schema::tags;

        let mut conn = self.conn()?;
        let db_updates = DbUpdateTag::from(updates);

        let target = tags::table
            .filter(tags::id.eq(tag_id))
            .filter(tags::user_id.eq(user_id));

        let updated = diesel::update(target)
            .set(&db_updates)
            .get_result::<DbTag>(&mut conn)?;

        Ok(updated.into())
    }

    fn delete_tag(&self, tag_id: i32, user_id: i32) -> RepositoryResult<()> {
        use crate::schema::{recipe_tags, tags};

        let mut conn = self.conn()?;

        conn.immediate_transaction(|conn| {
            let target = tags::table
                .filter(tags::id.eq(tag_id))
                .filter(tags::user_id.eq(user_id));

            let deleted = diesel::delete(target).execute(conn)?;
            if deleted == 0 {
                return Err(RepositoryError::NotFound);
            }

            diesel::delete(recipe_tags::table.filter(recipe_tags::tag_id.eq(tag_id)))
                .execute(conn)?;

            Ok(())
        })
    }
}

/// Resolve each name to the id of the owner's tag with exactly that name,
/// creating missing tags. Duplicate names collapse into one id.
pub(crate) fn resolve_tag_ids(
    conn: &mut SqliteConnection,
    user_id: i32,
    names: &[String],
) -> RepositoryResult<BTreeSet<i32>> {
    use crate::schema::tags;

    let mut ids = BTreeSet::new();

    for name in names {
        diesel::insert_into(tags::table)
            .values(&DbNewTag {
                user_id,
                name: name.as_str(),
            })
            .on_conflict((tags::user_id, tags::name))
            .do_nothing()
            .execute(conn)?;

        let id = tags::table
            .filter(tags::user_id.eq(user_id))
            .filter(tags::name.eq(name.as_str()))
            .select(tags::id)
            .first::<i32>(conn)?;

        ids.insert(id);
    }

    Ok(ids)
}

/// Make `tag_ids` the complete tag set of the recipe.
pub(crate) fn replace_recipe_tags(
    conn: &mut SqliteConnection,
    recipe_id: i32,
    tag_ids: &BTreeSet<i32>,
) -> RepositoryResult<()> {
    use crate::schema::recipe_tags;

    diesel::delete(recipe_tags::table.filter(recipe_tags::recipe_id.eq(recipe_id)))
        .execute(conn)?;

    if tag_ids.is_empty() {
        return Ok(());
    }

    let rows: Vec<DbNewRecipeTag> = tag_ids
        .iter()
        .map(|&tag_id| DbNewRecipeTag { recipe_id, tag_id })
        .collect();

    diesel::insert_into(recipe_tags::table)
        .values(&rows)
        .execute(conn)?;

    Ok(())
}

pub(crate) fn load_tags_for_recipes(
    conn: &mut SqliteConnection,
    recipe_ids: &[i32],
) -> RepositoryResult<HashMap<i32, Vec<DomainTag>>> {
    use crate::schema::{recipe_tags, tags};

    if recipe_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = recipe_tags::table
        .inner_join(tags::table)
        .filter(recipe_tags::recipe_id.eq_any(recipe_ids))
        .order(tags::name.asc())
        .select((recipe_tags::recipe_id, DbTag::as_select()))
        .load::<(i32, DbTag)>(conn)?;

    let mut map: HashMap<i32, Vec<DomainTag>> = HashMap::new();
    for (recipe_id, tag) in rows {
        map.entry(recipe_id).or_default().push(tag.into());
    }

    Ok(map)
}
