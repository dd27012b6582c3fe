//! Validation failures for page requests and page envelopes.

use thiserror::Error;

/// Errors raised when a page request or envelope breaks its invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaginationError {
    /// Page numbers are one-based.
    #[error("page must be at least 1")]
    ZeroPage,
    /// A page must be able to hold at least one item.
    #[error("limit must be at least 1")]
    ZeroLimit,
    /// The requested page size exceeds what list endpoints accept.
    #[error("limit must be at most {max}")]
    LimitTooLarge {
        /// Largest accepted page size.
        max: u32,
    },
    /// The server returned more items than the page size allows.
    #[error("page holds {len} items but its limit is {limit}")]
    OverfullPage {
        /// Number of items received.
        len: usize,
        /// Page size reported alongside the items.
        limit: u32,
    },
}
