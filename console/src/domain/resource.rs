//! The contract shared by every entity held in a collection store.

use std::fmt;

use crate::domain::CategoryId;

/// An entity type listed, created, updated and deleted through a collection
/// endpoint.
pub trait Resource: Clone + fmt::Debug + Send + Sync + 'static {
    /// Identifier type.
    type Id: Clone + Eq + fmt::Debug + fmt::Display + Send + Sync + 'static;
    /// Validated create/update payload.
    type Draft: Clone + fmt::Debug + Send + Sync + 'static;

    /// Singular noun used in log fields and messages.
    const NAME: &'static str;
    /// Collection path segment under the API base URL.
    const COLLECTION: &'static str;

    /// Identifier of this entity.
    fn id(&self) -> &Self::Id;

    /// Client-side display refinement applied to an already fetched page.
    fn matches(&self, refinement: &Refinement) -> bool;
}

/// Category selection held by list views.
///
/// The id goes to the server as `categoryId`; the name drives the client-side
/// refinement against embedded category snapshots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryFilter {
    /// Category identifier.
    pub id: CategoryId,
    /// Category display name.
    pub name: String,
}

/// Client-side filter over a fetched page. Display only: it never feeds
/// totals or pagination bounds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Refinement {
    needle: Option<String>,
    category: Option<CategoryFilter>,
}

impl Refinement {
    /// Build a refinement from committed search text and category filter.
    ///
    /// Blank search text matches everything.
    ///
    /// # Examples
    /// ```
    /// use article_console::domain::Refinement;
    ///
    /// let refinement = Refinement::new("  Rust ", None);
    /// assert!(refinement.matches_text("Learning rust in 2024"));
    /// assert!(!refinement.matches_text("Go basics"));
    /// assert!(Refinement::new("", None).matches_text("anything"));
    /// ```
    pub fn new(search: &str, category: Option<CategoryFilter>) -> Self {
        let trimmed = search.trim();
        let needle = (!trimmed.is_empty()).then(|| trimmed.to_lowercase());
        Self { needle, category }
    }

    /// Whether `haystack` contains the search text, ignoring case.
    pub fn matches_text(&self, haystack: &str) -> bool {
        self.needle
            .as_deref()
            .is_none_or(|needle| haystack.to_lowercase().contains(needle))
    }

    /// Selected category, if any.
    pub fn category(&self) -> Option<&CategoryFilter> {
        self.category.as_ref()
    }
}
