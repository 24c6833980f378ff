use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Label owned by a single user that can be attached to many recipes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tag {
    /// Unique identifier of the tag.
    pub id: i32,
    /// Owning user identifier.
    pub user_id: i32,
    /// Name of the tag, unique per owner.
    pub name: String,
    /// Timestamp for when the tag record was created.
    pub created_at: NaiveDateTime,
    /// Timestamp for the last update to the tag record.
    pub updated_at: NaiveDateTime,
}

/// Payload required to insert a new tag for a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTag {
    /// Owning user identifier.
    pub user_id: i32,
    /// Name of the tag.
    pub name: String,
}

impl NewTag {
    /// Construct a new tag payload with a trimmed name.
    pub fn new(user_id: i32, name: impl Into<String>) -> Self {
        let name = name.into().trim().to_string();
        Self { user_id, name }
    }
}

/// Patch data applied when updating an existing tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateTag {
    /// Replacement name, if one was supplied.
    pub name: Option<String>,
    /// Timestamp captured when the patch was created.
    pub updated_at: NaiveDateTime,
}

/// Query definition used to list tags for a user.
#[derive(Debug, Clone, Default)]
pub struct TagListQuery {
    /// Owning user identifier.
    pub user_id: i32,
    /// Restrict the listing to tags attached to at least one recipe.
    pub assigned_only: bool,
    /// Optional substring search applied to the tag name.
    pub search: Option<String>,
}

impl TagListQuery {
    /// Construct a query that targets all tags belonging to `user_id`.
    pub fn new(user_id: i32) -> Self {
        Self {
            user_id,
            ..Self::default()
        }
    }

    /// Only return tags referenced by a recipe.
    pub fn assigned_only(mut self) -> Self {
        self.assigned_only = true;
        self
    }

    /// Filter the results by a search term applied to the tag name.
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }
}
