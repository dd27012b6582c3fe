//! Page request parameters sent to list endpoints.

use url::Url;

use crate::PaginationError;

/// Largest page size accepted by the list endpoints.
pub const MAX_PAGE_LIMIT: u32 = 100;

/// One-based page number and page size for a list request.
///
/// ## Invariants
/// - `page >= 1`.
/// - `1 <= limit <= MAX_PAGE_LIMIT`.
///
/// # Examples
/// ```
/// use pagination::PageRequest;
///
/// let request = PageRequest::first(10).unwrap();
/// assert_eq!(request.page(), 1);
/// assert_eq!(request.with_page(3).unwrap().page(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    /// Validate and construct a page request.
    ///
    /// # Errors
    ///
    /// Returns [`PaginationError`] when `page` or `limit` fall outside their
    /// accepted ranges.
    pub const fn try_new(page: u32, limit: u32) -> Result<Self, PaginationError> {
        if page == 0 {
            return Err(PaginationError::ZeroPage);
        }
        if limit == 0 {
            return Err(PaginationError::ZeroLimit);
        }
        if limit > MAX_PAGE_LIMIT {
            return Err(PaginationError::LimitTooLarge {
                max: MAX_PAGE_LIMIT,
            });
        }
        Ok(Self { page, limit })
    }

    /// Request the first page with the given page size.
    ///
    /// # Errors
    ///
    /// Returns [`PaginationError`] when `limit` is out of range.
    pub const fn first(limit: u32) -> Result<Self, PaginationError> {
        Self::try_new(1, limit)
    }

    /// Return a copy of this request pointing at another page.
    ///
    /// # Errors
    ///
    /// Returns [`PaginationError::ZeroPage`] when `page` is zero.
    pub const fn with_page(self, page: u32) -> Result<Self, PaginationError> {
        Self::try_new(page, self.limit)
    }

    /// Return a copy of this request pointing at the first page.
    #[must_use]
    pub const fn rewind(self) -> Self {
        Self {
            page: 1,
            limit: self.limit,
        }
    }

    /// One-based page number.
    #[must_use]
    pub const fn page(self) -> u32 {
        self.page
    }

    /// Page size.
    #[must_use]
    pub const fn limit(self) -> u32 {
        self.limit
    }

    /// Append `page` and `limit` query parameters to `url`.
    ///
    /// # Examples
    /// ```
    /// use pagination::PageRequest;
    /// use url::Url;
    ///
    /// let mut url = Url::parse("https://api.invalid/articles").unwrap();
    /// PageRequest::try_new(2, 9).unwrap().append_to(&mut url);
    /// assert_eq!(url.query(), Some("page=2&limit=9"));
    /// ```
    pub fn append_to(self, url: &mut Url) {
        url.query_pairs_mut()
            .append_pair("page", &self.page.to_string())
            .append_pair("limit", &self.limit.to_string());
    }
}
