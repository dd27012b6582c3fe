//! List query parameters shared by the stores and the list views.

use pagination::{PageRequest, PaginationError};
use url::Url;

use crate::domain::CategoryId;

/// Parameters of a list request: page, page size, server-side search and
/// category filter.
///
/// Changing the search text or the category rewinds to the first page.
///
/// # Examples
/// ```
/// use article_console::domain::Query;
///
/// let query = Query::first(10).unwrap().with_page(3).unwrap();
/// assert_eq!(query.page().page(), 3);
/// assert_eq!(query.with_search("rust").page().page(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    page: PageRequest,
    search: Option<String>,
    category_id: Option<CategoryId>,
}

impl Query {
    /// Query for the first page with no search and no category.
    pub fn first(limit: u32) -> Result<Self, PaginationError> {
        Ok(Self::from_page(PageRequest::first(limit)?))
    }

    /// Query for `page` with no search and no category.
    pub fn from_page(page: PageRequest) -> Self {
        Self::new(page, "", None)
    }

    /// Query with every part given; blank `search` means no search.
    pub fn new(page: PageRequest, search: &str, category_id: Option<CategoryId>) -> Self {
        Self {
            page,
            search: normalize_search(search),
            category_id,
        }
    }

    /// Replace the search text; blank text clears it.
    #[must_use]
    pub fn with_search(self, search: &str) -> Self {
        let search = normalize_search(search);
        if search == self.search {
            return self;
        }
        Self {
            page: self.page.rewind(),
            search,
            ..self
        }
    }

    /// Replace the category filter.
    #[must_use]
    pub fn with_category(self, category_id: Option<CategoryId>) -> Self {
        if category_id == self.category_id {
            return self;
        }
        Self {
            page: self.page.rewind(),
            category_id,
            ..self
        }
    }

    /// Point at another page, keeping search and category.
    pub fn with_page(self, page: u32) -> Result<Self, PaginationError> {
        Ok(Self {
            page: self.page.with_page(page)?,
            ..self
        })
    }

    /// Page number and size.
    pub fn page(&self) -> PageRequest {
        self.page
    }

    /// Server-side search text, if any.
    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    /// Category filter, if any.
    pub fn category_id(&self) -> Option<&CategoryId> {
        self.category_id.as_ref()
    }

    /// Append `page`, `limit`, `search` and `categoryId` to `url`; absent
    /// filters are omitted.
    pub fn append_to(&self, url: &mut Url) {
        self.page.append_to(url);
        let mut pairs = url.query_pairs_mut();
        if let Some(search) = &self.search {
            pairs.append_pair("search", search);
        }
        if let Some(category) = &self.category_id {
            pairs.append_pair("categoryId", category.as_ref());
        }
    }
}

fn normalize_search(search: &str) -> Option<String> {
    let trimmed = search.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

#[cfg(test)]
mod tests {
    //! Regression coverage for query transitions and encoding.
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn third_page() -> Query {
        Query::first(9)
            .and_then(|query| query.with_page(3))
            .expect("valid query")
    }

    fn category(id: &str) -> CategoryId {
        CategoryId::new(id).expect("valid id")
    }

    #[rstest]
    fn search_change_rewinds(third_page: Query) {
        let query = third_page.with_search("rust");
        assert_eq!(query.page().page(), 1);
        assert_eq!(query.search(), Some("rust"));
    }

    #[rstest]
    fn unchanged_search_keeps_page(third_page: Query) {
        let query = third_page.with_search("  ");
        assert_eq!(query.page().page(), 3);
        assert_eq!(query.search(), None);
    }

    #[rstest]
    fn category_change_rewinds(third_page: Query) {
        let query = third_page.with_category(Some(category("c-1")));
        assert_eq!(query.page().page(), 1);
        let same = query.clone().with_page(2).expect("valid page");
        assert_eq!(same.clone().with_category(Some(category("c-1"))), same);
    }

    #[test]
    fn encodes_only_present_filters() {
        let mut url = Url::parse("https://api.invalid/articles").expect("valid url");
        Query::first(10).expect("valid query").append_to(&mut url);
        assert_eq!(url.query(), Some("page=1&limit=10"));

        let mut url = Url::parse("https://api.invalid/articles").expect("valid url");
        Query::first(10)
            .expect("valid query")
            .with_search("hello world")
            .with_category(Some(category("c-9")))
            .append_to(&mut url);
        assert_eq!(
            url.query(),
            Some("page=1&limit=10&search=hello+world&categoryId=c-9")
        );
    }
}
