//! Article entity and its create/update payload.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::{CategoryId, Error, Profile, Refinement, Resource, UserId};

/// Longest accepted article title, in characters.
pub const TITLE_MAX_CHARS: usize = 200;

/// Server-issued article identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ArticleId(String);

impl ArticleId {
    /// Validate and construct an [`ArticleId`].
    pub fn new(id: impl Into<String>) -> Result<Self, Error> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(Error::invalid_request("article id must not be empty"));
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for ArticleId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ArticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<ArticleId> for String {
    fn from(value: ArticleId) -> Self {
        value.0
    }
}

impl TryFrom<String> for ArticleId {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Category snapshot embedded in article responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySnapshot {
    /// Category identifier.
    pub id: CategoryId,
    /// Category display name.
    pub name: String,
}

/// A categorized article.
///
/// Articles are owned by the collection store and replaced wholesale by
/// server responses; there are no setters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    id: ArticleId,
    title: String,
    content: String,
    category_id: CategoryId,
    #[serde(rename = "userId", default, skip_serializing_if = "Option::is_none")]
    author_id: Option<UserId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    category: Option<CategorySnapshot>,
    #[serde(rename = "user", default, skip_serializing_if = "Option::is_none")]
    author: Option<Profile>,
}

impl Article {
    /// Build an article from a validated draft, as the server does on create.
    pub fn from_draft(id: ArticleId, draft: &ArticleDraft, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            title: draft.title.clone(),
            content: draft.content.clone(),
            category_id: draft.category_id.clone(),
            author_id: None,
            created_at,
            updated_at: created_at,
            category: None,
            author: None,
        }
    }

    /// Attach an embedded category snapshot.
    #[must_use]
    pub fn with_category(mut self, snapshot: CategorySnapshot) -> Self {
        self.category = Some(snapshot);
        self
    }

    /// Title.
    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    /// Rich-text body.
    pub fn content(&self) -> &str {
        self.content.as_str()
    }

    /// Owning category.
    pub fn category_id(&self) -> &CategoryId {
        &self.category_id
    }

    /// Author, when reported.
    pub fn author_id(&self) -> Option<&UserId> {
        self.author_id.as_ref()
    }

    /// Creation timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Last modification timestamp.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Embedded category snapshot, when the server included one.
    pub fn category(&self) -> Option<&CategorySnapshot> {
        self.category.as_ref()
    }

    /// Embedded author snapshot, when the server included one.
    pub fn author(&self) -> Option<&Profile> {
        self.author.as_ref()
    }
}

impl Resource for Article {
    type Id = ArticleId;
    type Draft = ArticleDraft;

    const NAME: &'static str = "article";
    const COLLECTION: &'static str = "articles";

    fn id(&self) -> &ArticleId {
        &self.id
    }

    fn matches(&self, refinement: &Refinement) -> bool {
        let text = refinement.matches_text(&self.title) || refinement.matches_text(&self.content);
        let category = refinement.category().is_none_or(|filter| {
            match &self.category {
                Some(snapshot) => snapshot.name == filter.name,
                None => self.category_id == filter.id,
            }
        });
        text && category
    }
}

/// Validated `{title, content, categoryId}` payload for article create and
/// update.
///
/// ## Invariants
/// - `title` is trimmed, non-empty and at most [`TITLE_MAX_CHARS`] long.
/// - `content` is non-blank; it is kept verbatim because it is rich text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleDraft {
    title: String,
    content: String,
    category_id: CategoryId,
}

impl ArticleDraft {
    /// Validate raw form values.
    ///
    /// # Examples
    /// ```
    /// use article_console::domain::ArticleDraft;
    ///
    /// assert!(ArticleDraft::try_new("Hello", "<p>Body</p>", "c-1").is_ok());
    /// assert!(ArticleDraft::try_new("", "<p>Body</p>", "c-1").is_err());
    /// ```
    pub fn try_new(title: &str, content: &str, category_id: &str) -> Result<Self, Error> {
        let trimmed_title = title.trim();
        if trimmed_title.is_empty() {
            return Err(field_error("title", "title is required"));
        }
        if trimmed_title.chars().count() > TITLE_MAX_CHARS {
            return Err(field_error(
                "title",
                format!("title must be less than {TITLE_MAX_CHARS} characters"),
            ));
        }
        if content.trim().is_empty() {
            return Err(field_error("content", "content is required"));
        }
        let category = CategoryId::new(category_id)
            .map_err(|_| field_error("categoryId", "category is required"))?;
        Ok(Self {
            title: trimmed_title.to_owned(),
            content: content.to_owned(),
            category_id: category,
        })
    }

    /// Title.
    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    /// Rich-text body.
    pub fn content(&self) -> &str {
        self.content.as_str()
    }

    /// Target category.
    pub fn category_id(&self) -> &CategoryId {
        &self.category_id
    }
}

fn field_error(field: &str, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({ "field": field }))
}

#[cfg(test)]
mod tests {
    //! Regression coverage for article decoding, drafts and refinement.
    use super::*;
    use crate::domain::{CategoryFilter, Role};
    use rstest::{fixture, rstest};

    #[fixture]
    fn article() -> Article {
        serde_json::from_value(json!({
            "id": "a-1",
            "title": "Getting started with Rust",
            "content": "<p>Ownership and borrowing</p>",
            "userId": "u-1",
            "categoryId": "c-1",
            "createdAt": "2025-04-13T10:00:00.000Z",
            "updatedAt": "2025-04-13T10:00:00.000Z",
            "category": { "id": "c-1", "name": "Technology", "userId": "u-1",
                          "createdAt": "2025-01-01T00:00:00.000Z",
                          "updatedAt": "2025-01-01T00:00:00.000Z" },
            "user": { "id": "u-1", "username": "editor", "role": "Admin" }
        }))
        .expect("decode article")
    }

    fn technology() -> CategoryFilter {
        CategoryFilter {
            id: CategoryId::new("c-1").expect("valid id"),
            name: "Technology".to_owned(),
        }
    }

    #[rstest]
    fn decodes_embedded_snapshots(article: Article) {
        assert_eq!(article.category().map(|c| c.name.as_str()), Some("Technology"));
        assert_eq!(article.author().map(|a| a.role), Some(Role::Admin));
        assert_eq!(article.author_id().map(AsRef::as_ref), Some("u-1"));
    }

    #[rstest]
    #[case("rust", true)]
    #[case("BORROWING", true)]
    #[case("python", false)]
    #[case("", true)]
    fn refinement_searches_title_and_content(
        article: Article,
        #[case] search: &str,
        #[case] expected: bool,
    ) {
        assert_eq!(article.matches(&Refinement::new(search, None)), expected);
    }

    #[rstest]
    fn refinement_matches_category_by_name(article: Article) {
        assert!(article.matches(&Refinement::new("", Some(technology()))));
        let other = CategoryFilter {
            id: CategoryId::new("c-2").expect("valid id"),
            name: "Sport".to_owned(),
        };
        assert!(!article.matches(&Refinement::new("", Some(other))));
    }

    #[test]
    fn refinement_falls_back_to_category_id_without_snapshot() {
        let draft = ArticleDraft::try_new("Title", "Body", "c-1").expect("valid draft");
        let bare = Article::from_draft(ArticleId::new("a-2").expect("valid id"), &draft, Utc::now());
        assert!(bare.matches(&Refinement::new("", Some(technology()))));
    }

    #[rstest]
    #[case("", "body", "c-1", "title")]
    #[case("title", "  ", "c-1", "content")]
    #[case("title", "body", "", "categoryId")]
    fn drafts_report_the_offending_field(
        #[case] title: &str,
        #[case] content: &str,
        #[case] category: &str,
        #[case] field: &str,
    ) {
        let err = ArticleDraft::try_new(title, content, category).expect_err("invalid draft");
        assert_eq!(err.details(), Some(&json!({ "field": field })));
    }

    #[test]
    fn overlong_titles_are_rejected() {
        let title = "x".repeat(TITLE_MAX_CHARS + 1);
        assert!(ArticleDraft::try_new(&title, "body", "c-1").is_err());
        let exact = "x".repeat(TITLE_MAX_CHARS);
        assert!(ArticleDraft::try_new(&exact, "body", "c-1").is_ok());
    }

    #[test]
    fn draft_serialises_to_wire_names() {
        let draft = ArticleDraft::try_new("T", "C", "c-1").expect("valid draft");
        assert_eq!(
            serde_json::to_value(&draft).expect("serialise"),
            json!({ "title": "T", "content": "C", "categoryId": "c-1" })
        );
    }
}
