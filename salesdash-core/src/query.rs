use crate::filtering::{apply_filters, normalize_multi, parse_filters};
use crate::models::{AppliedFilters, Page, Pagination, QueryParams, QueryResult, SalesRecord};
use crate::pagination::{paginate, DEFAULT_PAGE_SIZE};
use crate::sorting::sort_records;

/// Run the full query pipeline: filter, then sort, then paginate.
///
/// Pagination always sees the fully filtered-and-sorted sequence. Without a
/// `sortBy` the result is ordered by date descending; with a `sortBy` but no
/// `sortOrder`, date sorts descending and everything else ascending. An
/// empty record set short-circuits to the canonical empty result.
pub fn process_query(records: &[SalesRecord], params: &QueryParams) -> QueryResult {
    if records.is_empty() {
        return QueryResult {
            data: Vec::new(),
            pagination: Pagination {
                page: 1,
                page_size: DEFAULT_PAGE_SIZE,
                total_items: 0,
                total_pages: 0,
                has_next_page: false,
                has_prev_page: false,
            },
            applied_filters: AppliedFilters::default(),
        };
    }

    let mut working = apply_filters(records, &parse_filters(params));

    let (sort_by, sort_order) = resolve_sort(params);
    sort_records(&mut working, &sort_by, &sort_order);

    let page = parse_index(params.page.as_deref(), 1);
    let page_size = parse_index(params.page_size.as_deref(), DEFAULT_PAGE_SIZE);
    let Page { data, pagination } = paginate(&working, page, page_size);

    QueryResult {
        data,
        pagination,
        applied_filters: applied_filters(params, &sort_by, &sort_order),
    }
}

/// Resolve the effective sort key and order for a request.
///
/// When `sortBy` is absent the order defaults to date descending and any
/// supplied `sortOrder` is ignored, so the echo and the actual ordering
/// always agree.
fn resolve_sort(params: &QueryParams) -> (String, String) {
    match params.sort_by.as_deref().filter(|s| !s.is_empty()) {
        None => ("date".to_string(), "desc".to_string()),
        Some(sort_by) => {
            let default_order = if sort_by == "date" { "desc" } else { "asc" };
            let sort_order = params
                .sort_order
                .as_deref()
                .filter(|s| !s.is_empty())
                .unwrap_or(default_order);
            (sort_by.to_string(), sort_order.to_string())
        }
    }
}

/// Coerce a page index parameter; non-numeric or non-positive input falls
/// back to the default.
fn parse_index(value: Option<&str>, default: u64) -> u64 {
    value
        .and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|n| *n > 0)
        .map(|n| n as u64)
        .unwrap_or(default)
}

/// Build the applied-filters echo for a response.
pub fn applied_filters(params: &QueryParams, sort_by: &str, sort_order: &str) -> AppliedFilters {
    AppliedFilters {
        search: params.search.clone().filter(|s| !s.is_empty()),
        regions: normalize_multi(params.regions.as_ref()),
        genders: normalize_multi(params.genders.as_ref()),
        categories: normalize_multi(params.categories.as_ref()),
        tags: normalize_multi(params.tags.as_ref()),
        payment_methods: normalize_multi(params.payment_methods.as_ref()),
        min_age: params.min_age.as_deref().and_then(|v| v.trim().parse().ok()),
        max_age: params.max_age.as_deref().and_then(|v| v.trim().parse().ok()),
        start_date: params.start_date.clone().filter(|s| !s.is_empty()),
        end_date: params.end_date.clone().filter(|s| !s.is_empty()),
        sort_by: sort_by.to_string(),
        sort_order: sort_order.to_string(),
    }
}
