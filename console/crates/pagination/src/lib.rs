//! Page envelopes and page-number arithmetic for Article Console list views.
//!
//! List endpoints answer with an offset page: the items for one page plus the
//! server-side `total`. This crate owns the request shape sent to those
//! endpoints ([`PageRequest`]), the decoded envelope ([`Page`]) and the
//! helpers used to render pagination controls ([`page_count`],
//! [`page_slots`]).
//!
//! `total` is always the authority for page counts. Callers must never derive
//! it from the number of items currently held.

mod error;
mod page;
mod request;
mod window;

pub use error::PaginationError;
pub use page::Page;
pub use request::{MAX_PAGE_LIMIT, PageRequest};
pub use window::{PageSlot, contains_page, page_count, page_slots};
