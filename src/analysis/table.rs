//! Year-range table filtering and pagination.

use crate::models::{Record, TablePage, YearRange};

/// Records inside `range`, stably sorted ascending by year.
///
/// Records without a year are never included. An inverted range is simply
/// empty.
pub fn filter_by_range(records: &[Record], range: YearRange) -> Vec<Record> {
    let mut filtered: Vec<Record> = records
        .iter()
        .filter(|r| range.contains(r.year))
        .cloned()
        .collect();
    filtered.sort_by_key(|r| r.year);
    filtered
}

/// Produce the table slice for a 1-based `page`.
///
/// `total_pages` is at least 1 and out-of-range pages are clamped.
pub fn paginate(records: &[Record], range: YearRange, page: usize, page_size: usize) -> TablePage {
    let page_size = page_size.max(1);
    let filtered = filter_by_range(records, range);
    let total_rows = filtered.len();
    let total_pages = total_rows.div_ceil(page_size).max(1);
    let current_page = page.clamp(1, total_pages);

    let rows = filtered
        .into_iter()
        .skip((current_page - 1) * page_size)
        .take(page_size)
        .collect();

    TablePage {
        rows,
        current_page,
        total_pages,
        total_rows,
        page_size,
    }
}
