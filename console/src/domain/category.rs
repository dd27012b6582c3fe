//! Category entity and its create/update payload.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::{Error, Refinement, Resource, UserId};

/// Server-issued category identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CategoryId(String);

impl CategoryId {
    /// Validate and construct a [`CategoryId`].
    pub fn new(id: impl Into<String>) -> Result<Self, Error> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(Error::invalid_request("category id must not be empty")
                .with_details(json!({ "field": "categoryId" })));
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for CategoryId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<CategoryId> for String {
    fn from(value: CategoryId) -> Self {
        value.0
    }
}

impl TryFrom<String> for CategoryId {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Article category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    id: CategoryId,
    name: String,
    #[serde(rename = "userId", default, skip_serializing_if = "Option::is_none")]
    owner_id: Option<UserId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Category {
    /// Build a category from a validated draft, as the server does on create.
    pub fn from_draft(id: CategoryId, draft: &CategoryDraft, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: draft.name.clone(),
            owner_id: None,
            created_at,
            updated_at: created_at,
        }
    }

    /// Display name.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Account that created the category, when reported.
    pub fn owner_id(&self) -> Option<&UserId> {
        self.owner_id.as_ref()
    }

    /// Creation timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Last modification timestamp.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

impl Resource for Category {
    type Id = CategoryId;
    type Draft = CategoryDraft;

    const NAME: &'static str = "category";
    const COLLECTION: &'static str = "categories";

    fn id(&self) -> &CategoryId {
        &self.id
    }

    fn matches(&self, refinement: &Refinement) -> bool {
        refinement.matches_text(&self.name)
    }
}

/// Validated `{name}` payload for category create and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryDraft {
    name: String,
}

impl CategoryDraft {
    /// Validate a category name; surrounding whitespace is trimmed.
    pub fn try_new(name: &str) -> Result<Self, Error> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(Error::invalid_request("category name is required")
                .with_details(json!({ "field": "name" })));
        }
        Ok(Self {
            name: trimmed.to_owned(),
        })
    }

    /// Category name.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }
}
