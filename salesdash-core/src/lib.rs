// Public modules
pub mod facets;
pub mod filtering;
pub mod io;
pub mod models;
pub mod pagination;
pub mod query;
pub mod sorting;

// Re-export commonly used types for convenience
pub use facets::filter_options;
pub use filtering::{apply_filters, has_filters, matches_filters, normalize_multi, parse_filters, Filters};
pub use io::{load_sales_data, parse_sales_csv, IngestError};
pub use models::{
    AgeRange, AppliedFilters, DateRange, FilterOptions, MultiValue, Page, Pagination, QueryParams,
    QueryResult, SalesRecord,
};
pub use pagination::{paginate, DEFAULT_PAGE_SIZE};
pub use query::process_query;
pub use sorting::sort_records;
