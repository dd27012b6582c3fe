//! Page-count arithmetic and numbered page windows for pagination controls.

/// Number of pages needed to show `total` items, `limit` per page.
///
/// A zero `limit` yields zero pages.
///
/// # Examples
/// ```
/// use pagination::page_count;
///
/// assert_eq!(page_count(0, 10), 0);
/// assert_eq!(page_count(10, 10), 1);
/// assert_eq!(page_count(11, 10), 2);
/// ```
#[must_use]
pub const fn page_count(total: u64, limit: u32) -> u64 {
    if limit == 0 {
        return 0;
    }
    total.div_ceil(limit as u64)
}

/// Whether `page` is a selectable page in `[1, page_count]`.
#[must_use]
pub const fn contains_page(page: u64, page_count: u64) -> bool {
    page >= 1 && page <= page_count
}

/// One entry of a rendered pagination bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSlot {
    /// A selectable page number.
    Page(u64),
    /// A collapsed run of page numbers.
    Ellipsis,
}

const FULL_WINDOW: u64 = 7;

/// Numbered slots for a pagination bar.
///
/// Up to seven pages are listed in full. Longer ranges always show the first
/// and last page, a run around `current`, and ellipses for the gaps.
///
/// # Examples
/// ```
/// use pagination::{PageSlot, page_slots};
///
/// assert_eq!(
///     page_slots(10, 20),
///     vec![
///         PageSlot::Page(1),
///         PageSlot::Ellipsis,
///         PageSlot::Page(8),
///         PageSlot::Page(9),
///         PageSlot::Page(10),
///         PageSlot::Page(11),
///         PageSlot::Page(12),
///         PageSlot::Ellipsis,
///         PageSlot::Page(20),
///     ],
/// );
/// ```
#[must_use]
pub fn page_slots(current: u64, page_count: u64) -> Vec<PageSlot> {
    if page_count == 0 {
        return Vec::new();
    }
    if page_count <= FULL_WINDOW {
        return (1..=page_count).map(PageSlot::Page).collect();
    }

    let current_page = current.clamp(1, page_count);
    let last_inner = page_count - 1;
    let (start, end) = if current_page <= 3 {
        (2, 5)
    } else if current_page + 2 >= page_count {
        (page_count.saturating_sub(4).max(2), last_inner)
    } else {
        (current_page - 2, current_page + 2)
    };

    let mut slots = vec![PageSlot::Page(1)];
    if start > 2 {
        slots.push(PageSlot::Ellipsis);
    }
    slots.extend((start..=end).map(PageSlot::Page));
    if end < last_inner {
        slots.push(PageSlot::Ellipsis);
    }
    slots.push(PageSlot::Page(page_count));
    slots
}
