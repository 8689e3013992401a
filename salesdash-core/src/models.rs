use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One normalized sales transaction.
///
/// Numeric and date fields that failed to parse during ingestion are `None`;
/// they never abort a request and are skipped by range filters and numeric
/// aggregates. `tags` is always a list after normalization, even when the
/// source supplied a comma-joined string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SalesRecord {
    pub transaction_id: String,
    pub customer_id: String,
    pub customer_name: String,
    pub phone_number: String,
    pub customer_region: String,
    pub gender: String,
    pub age: Option<i64>,
    pub product_category: String,
    pub tags: Vec<String>,
    pub quantity: Option<f64>,
    pub price_per_unit: Option<f64>,
    pub discount_percentage: Option<f64>,
    pub total_amount: Option<f64>,
    pub final_amount: Option<f64>,
    pub payment_method: String,
    pub date: Option<DateTime<Utc>>,
}

/// A multi-valued query parameter as received from the outside world.
///
/// Clients may send either a single comma-joined string or a native list;
/// both resolve to the same value set through [`MultiValue::values`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MultiValue {
    One(String),
    Many(Vec<String>),
}

impl MultiValue {
    /// Resolve to the canonical list form: the scalar form is comma-split,
    /// every element is trimmed, and empty elements are discarded.
    pub fn values(&self) -> Vec<String> {
        match self {
            MultiValue::One(joined) => joined
                .split(',')
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .collect(),
            MultiValue::Many(list) => list
                .iter()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .collect(),
        }
    }
}

/// Raw query parameters for one request.
///
/// Every field is optional and tolerated in malformed form: numeric and date
/// fields are kept as strings and coerced where they are consumed, so a bad
/// value degrades to "no filter on this dimension" instead of an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QueryParams {
    pub search: Option<String>,
    pub regions: Option<MultiValue>,
    pub genders: Option<MultiValue>,
    pub categories: Option<MultiValue>,
    pub tags: Option<MultiValue>,
    pub payment_methods: Option<MultiValue>,
    pub min_age: Option<String>,
    pub max_age: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    pub page: Option<String>,
    pub page_size: Option<String>,
}

/// Pagination metadata for one result page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u64,
    pub page_size: u64,
    pub total_items: u64,
    pub total_pages: u64,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

/// One page sliced out of an ordered sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub data: Vec<T>,
    pub pagination: Pagination,
}

/// Canonical echo of the resolved query parameters, returned alongside query
/// results so clients can display active filter state without re-deriving it.
/// Multi-valued dimensions are always lists here, numeric fields are coerced
/// or null, and sort key/order carry the resolved defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedFilters {
    pub search: Option<String>,
    pub regions: Vec<String>,
    pub genders: Vec<String>,
    pub categories: Vec<String>,
    pub tags: Vec<String>,
    pub payment_methods: Vec<String>,
    pub min_age: Option<i64>,
    pub max_age: Option<i64>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub sort_by: String,
    pub sort_order: String,
}

impl Default for AppliedFilters {
    fn default() -> Self {
        AppliedFilters {
            search: None,
            regions: Vec::new(),
            genders: Vec::new(),
            categories: Vec::new(),
            tags: Vec::new(),
            payment_methods: Vec::new(),
            min_age: None,
            max_age: None,
            start_date: None,
            end_date: None,
            sort_by: "date".to_string(),
            sort_order: "desc".to_string(),
        }
    }
}

/// Full response for a sales query: the page of records, pagination
/// metadata, and the applied-filters echo.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    pub data: Vec<SalesRecord>,
    pub pagination: Pagination,
    pub applied_filters: AppliedFilters,
}

/// Observed bounds of parseable customer ages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgeRange {
    pub min: i64,
    pub max: i64,
}

/// Observed bounds of parseable record dates, as `YYYY-MM-DD` calendar-date
/// strings; both null when no record carries a parseable date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<String>,
    pub end: Option<String>,
}

/// Filter values still applicable to a (possibly filtered) record sequence,
/// used to populate filter dropdowns in clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    pub regions: Vec<String>,
    pub genders: Vec<String>,
    pub categories: Vec<String>,
    pub tags: Vec<String>,
    pub payment_methods: Vec<String>,
    pub age_range: AgeRange,
    pub date_range: DateRange,
}
