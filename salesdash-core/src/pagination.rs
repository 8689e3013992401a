use crate::models::{Page, Pagination};

/// Page size used when the request does not supply a usable one.
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Slice an ordered sequence into a single 1-based page.
///
/// `page` and `page_size` are clamped to a minimum of 1. A page past the end
/// of the sequence yields an empty slice with intact metadata rather than an
/// error.
pub fn paginate<T: Clone>(items: &[T], page: u64, page_size: u64) -> Page<T> {
    let page = page.max(1);
    let page_size = page_size.max(1);

    let total_items = items.len() as u64;
    let total_pages = total_items.div_ceil(page_size);

    let start = (page - 1)
        .saturating_mul(page_size)
        .min(total_items) as usize;
    let end = start
        .saturating_add(page_size as usize)
        .min(items.len());

    Page {
        data: items[start..end].to_vec(),
        pagination: Pagination {
            page,
            page_size,
            total_items,
            total_pages,
            has_next_page: page < total_pages,
            has_prev_page: page > 1,
        },
    }
}
