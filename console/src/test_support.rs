//! Test utilities for the console crate.
//!
//! Shared by unit tests (in `src/`) and integration tests (in `tests/`).
//! Compiled for tests and when the `test-support` feature is enabled.

pub mod collection;
pub mod navigation;

pub mod fixtures {
    //! Entity builders with fixed timestamps.

    use chrono::{DateTime, TimeZone, Utc};
    use pagination::Page;

    use crate::domain::{
        Article, ArticleDraft, ArticleId, Category, CategoryDraft, CategoryId, CategorySnapshot,
        Resource,
    };

    /// Timestamp shared by every fixture entity.
    pub fn created_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 4, 13, 10, 0, 0)
            .single()
            .unwrap_or_default()
    }

    /// Article `id` titled `title` in category `c-1` ("Technology").
    pub fn article(id: &str, title: &str) -> Article {
        article_in(id, title, "c-1", "Technology")
    }

    /// Article `id` titled `title` with an embedded category snapshot.
    pub fn article_in(id: &str, title: &str, category_id: &str, category_name: &str) -> Article {
        let draft = ArticleDraft::try_new(title, &format!("<p>{title}</p>"), category_id)
            .expect("fixture draft is valid");
        let snapshot = CategorySnapshot {
            id: draft.category_id().clone(),
            name: category_name.to_owned(),
        };
        Article::from_draft(
            ArticleId::new(id).expect("fixture id is valid"),
            &draft,
            created_at(),
        )
        .with_category(snapshot)
    }

    /// Category `id` named `name`.
    pub fn category(id: &str, name: &str) -> Category {
        let draft = CategoryDraft::try_new(name).expect("fixture draft is valid");
        Category::from_draft(
            CategoryId::new(id).expect("fixture id is valid"),
            &draft,
            created_at(),
        )
    }

    /// Page `page` of size `limit` holding `items` out of `total`.
    pub fn page<R: Resource>(items: Vec<R>, total: u64, page: u32, limit: u32) -> Page<R> {
        Page::try_new(items, total, page, limit).expect("fixture page is valid")
    }
}
