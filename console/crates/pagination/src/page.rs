//! Page envelope decoded from list responses.

use serde::{Deserialize, Serialize};

use crate::{PaginationError, page_count};

/// One page of a server-side collection.
///
/// ## Invariants
/// - `page >= 1` and `limit >= 1`.
/// - `items.len() <= limit`.
/// - `total` is the size of the whole server-side collection, not the number
///   of items on this page.
///
/// On the wire the items travel under `data`:
///
/// ```
/// use pagination::Page;
///
/// let page: Page<String> = serde_json::from_str(
///     r#"{"data":["a","b"],"total":12,"page":1,"limit":2}"#,
/// )
/// .unwrap();
/// assert_eq!(page.items().len(), 2);
/// assert_eq!(page.total(), 12);
/// assert_eq!(page.page_count(), 6);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PageDto<T>", into = "PageDto<T>")]
#[serde(bound(
    serialize = "T: Serialize + Clone",
    deserialize = "T: Deserialize<'de>"
))]
pub struct Page<T> {
    items: Vec<T>,
    total: u64,
    page: u32,
    limit: u32,
}

impl<T> Page<T> {
    /// Validate and construct a page envelope.
    ///
    /// # Errors
    ///
    /// Returns [`PaginationError`] when `page` or `limit` is zero or when
    /// `items` holds more entries than `limit`.
    pub fn try_new(
        items: Vec<T>,
        total: u64,
        page: u32,
        limit: u32,
    ) -> Result<Self, PaginationError> {
        if page == 0 {
            return Err(PaginationError::ZeroPage);
        }
        if limit == 0 {
            return Err(PaginationError::ZeroLimit);
        }
        let overfull = u32::try_from(items.len()).map_or(true, |len| len > limit);
        if overfull {
            return Err(PaginationError::OverfullPage {
                len: items.len(),
                limit,
            });
        }
        Ok(Self {
            items,
            total,
            page,
            limit,
        })
    }

    /// Items on this page, in server order.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Server-reported size of the whole collection.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// One-based page number echoed by the server.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Page size echoed by the server.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of pages implied by `total` and `limit`.
    #[must_use]
    pub fn page_count(&self) -> u64 {
        page_count(self.total, self.limit)
    }

    /// Split the envelope into its items and the authoritative total.
    #[must_use]
    pub fn into_parts(self) -> (Vec<T>, u64) {
        (self.items, self.total)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PageDto<T> {
    #[serde(rename = "data")]
    items: Vec<T>,
    total: u64,
    page: u32,
    limit: u32,
}

impl<T> From<Page<T>> for PageDto<T> {
    fn from(value: Page<T>) -> Self {
        Self {
            items: value.items,
            total: value.total,
            page: value.page,
            limit: value.limit,
        }
    }
}

impl<T> TryFrom<PageDto<T>> for Page<T> {
    type Error = PaginationError;

    fn try_from(value: PageDto<T>) -> Result<Self, Self::Error> {
        let PageDto {
            items,
            total,
            page,
            limit,
        } = value;
        Self::try_new(items, total, page, limit)
    }
}
