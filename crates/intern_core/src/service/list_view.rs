//! List view projection: search, entry-date sort and pagination.
//!
//! # Responsibility
//! - Derive the page shown by list screens from a `list()` result.
//!
//! # Invariants
//! - Pure: never touches storage; input order is the persisted order.
//! - Sorting is stable, so equal entry dates keep insertion order.
//! - Pages are 1-based; page size defaults to 10 and clamps to 50.

use crate::model::intern::InternRecord;

pub const PAGE_SIZE_DEFAULT: u32 = 10;
pub const PAGE_SIZE_MAX: u32 = 50;

/// Ordering applied on `entry_date`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryDateOrder {
    /// Undated records first, then oldest entry date.
    Ascending,
    /// Newest entry date first, undated records last.
    Descending,
}

/// Options for one list view request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InternListQuery {
    /// Case-insensitive last-name substring, or id substring.
    pub search: Option<String>,
    pub sort: Option<EntryDateOrder>,
    /// 1-based page number; `0` is treated as `1`.
    pub page: u32,
    pub page_size: Option<u32>,
}

/// One page of the filtered/sorted view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InternListPage {
    pub items: Vec<InternRecord>,
    pub page: u32,
    pub page_size: u32,
    /// Number of records matching the filter across all pages.
    pub total: usize,
    pub has_next: bool,
}

/// Normalizes page size according to list contract.
pub fn normalize_page_size(page_size: Option<u32>) -> u32 {
    match page_size {
        Some(0) | None => PAGE_SIZE_DEFAULT,
        Some(value) if value > PAGE_SIZE_MAX => PAGE_SIZE_MAX,
        Some(value) => value,
    }
}

/// Applies search and sort, keeping every matching record.
///
/// Export flows use this to render "the current view" without pagination.
pub fn filter_and_sort(records: Vec<InternRecord>, query: &InternListQuery) -> Vec<InternRecord> {
    let needle = query
        .search
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty());

    let mut matched: Vec<InternRecord> = match needle {
        Some(needle) => {
            let lowered = needle.to_lowercase();
            records
                .into_iter()
                .filter(|record| {
                    record.last_name.to_lowercase().contains(&lowered)
                        || record.id.contains(needle)
                })
                .collect()
        }
        None => records,
    };

    match query.sort {
        Some(EntryDateOrder::Ascending) => matched.sort_by(|a, b| a.entry_date.cmp(&b.entry_date)),
        Some(EntryDateOrder::Descending) => {
            matched.sort_by(|a, b| b.entry_date.cmp(&a.entry_date))
        }
        None => {}
    }
    matched
}

/// Applies search, sort and pagination.
pub fn apply_list_view(records: Vec<InternRecord>, query: &InternListQuery) -> InternListPage {
    let page = query.page.max(1);
    let page_size = normalize_page_size(query.page_size);
    let matched = filter_and_sort(records, query);
    let total = matched.len();

    let start = (page as usize - 1).saturating_mul(page_size as usize);
    let items: Vec<InternRecord> = matched
        .into_iter()
        .skip(start)
        .take(page_size as usize)
        .collect();
    let has_next = start.saturating_add(page_size as usize) < total;

    InternListPage {
        items,
        page,
        page_size,
        total,
        has_next,
    }
}
