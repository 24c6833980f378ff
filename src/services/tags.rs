use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::domain::auth::AuthenticatedUser;
use crate::domain::tag::{Tag, TagListQuery};
use crate::forms::tags::{AddTagForm, EditTagForm};
use crate::repository::{TagReader, TagWriter};
use crate::services::{ServiceError, ServiceResult, is_truthy, normalize_search};

/// Query parameters accepted by the tags listing.
#[derive(Debug, Default, Deserialize)]
pub struct TagQuery {
    /// Only list tags attached to at least one recipe when truthy.
    pub assigned_only: Option<String>,
    /// Optional substring search applied to tag names.
    pub search: Option<String>,
}

/// Public representation of a tag.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TagView {
    pub id: i32,
    pub name: String,
}

impl From<Tag> for TagView {
    fn from(tag: Tag) -> Self {
        Self {
            id: tag.id,
            name: tag.name,
        }
    }
}

/// Lists the authenticated user's tags, ordered by name descending.
pub fn list_tags<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: TagQuery,
) -> ServiceResult<Vec<TagView>>
where
    R: TagReader + ?Sized,
{
    let TagQuery {
        assigned_only,
        search,
    } = query;

    let mut list_query = TagListQuery::new(user.id);

    if assigned_only.as_deref().is_some_and(is_truthy) {
        list_query = list_query.assigned_only();
    }

    if let Some(term) = normalize_search(search) {
        list_query = list_query.search(term);
    }

    let tags = repo.list_tags(list_query).map_err(ServiceError::from)?;

    Ok(tags.into_iter().map(TagView::from).collect())
}

/// Fetches a single tag owned by the authenticated user.
pub fn get_tag<R>(repo: &R, user: &AuthenticatedUser, tag_id: i32) -> ServiceResult<TagView>
where
    R: TagReader + ?Sized,
{
    repo.get_tag_by_id(tag_id, user.id)
        .map_err(ServiceError::from)?
        .map(TagView::from)
        .ok_or(ServiceError::NotFound)
}

/// Creates a new tag for the authenticated user.
pub fn create_tag<R>(repo: &R, user: &AuthenticatedUser, form: AddTagForm) -> ServiceResult<TagView>
where
    R: TagWriter + ?Sized,
{
    let new_tag = form
        .into_new_tag(user.id)
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    repo.create_tag(&new_tag)
        .map(TagView::from)
        .map_err(ServiceError::from)
}

/// Updates an existing tag of the authenticated user.
pub fn modify_tag<R>(
    repo: &R,
    user: &AuthenticatedUser,
    tag_id: i32,
    form: EditTagForm,
) -> ServiceResult<TagView>
where
    R: TagWriter + ?Sized,
{
    let update = form
        .into_update_tag(Utc::now().naive_utc())
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    repo.update_tag(tag_id, user.id, &update)
        .map(TagView::from)
        .map_err(ServiceError::from)
}

/// Deletes a tag of the authenticated user, detaching it from every recipe.
pub fn remove_tag<R>(repo: &R, user: &AuthenticatedUser, tag_id: i32) -> ServiceResult<()>
where
    R: TagWriter + ?Sized,
{
    repo.delete_tag(tag_id, user.id)
        .map_err(ServiceError::from)
}
