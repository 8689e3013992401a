use chrono::{DateTime, Utc};
use tracing::debug;

use crate::io::parse_date;
use crate::models::{MultiValue, QueryParams, SalesRecord};

/// Filter criteria resolved from raw query parameters.
///
/// Multi-valued dimensions are held in canonical list form, and age/date
/// bounds are parsed up front so the per-record check stays cheap. A bound
/// that failed to parse is simply absent; malformed input never fails a
/// request, it just stops filtering on that dimension.
///
/// Matching rules per dimension: region, category, and payment method are
/// exact matches on trimmed values; gender and tag matches are
/// case-insensitive; `search` is a case-insensitive substring match over
/// customer name and phone number. Filters combine with AND across
/// dimensions and OR within one.
#[derive(Debug, Clone, Default)]
pub struct Filters {
    pub search: Option<String>,
    pub regions: Vec<String>,
    pub genders: Vec<String>,
    pub categories: Vec<String>,
    pub tags: Vec<String>,
    pub payment_methods: Vec<String>,
    pub min_age: Option<i64>,
    pub max_age: Option<i64>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

/// Normalize a multi-valued parameter into the canonical list form.
///
/// This is the single adapter between the scalar-or-list wire shape and the
/// `Vec<String>` the engine works with; an absent parameter resolves to an
/// empty list, which disables the dimension.
pub fn normalize_multi(param: Option<&MultiValue>) -> Vec<String> {
    param.map(MultiValue::values).unwrap_or_default()
}

/// Resolve raw query parameters into [`Filters`].
pub fn parse_filters(params: &QueryParams) -> Filters {
    Filters {
        search: params
            .search
            .as_ref()
            .map(|s| s.to_lowercase())
            .filter(|s| !s.is_empty()),
        regions: normalize_multi(params.regions.as_ref()),
        genders: normalize_multi(params.genders.as_ref())
            .into_iter()
            .map(|g| g.to_lowercase())
            .collect(),
        categories: normalize_multi(params.categories.as_ref()),
        tags: normalize_multi(params.tags.as_ref())
            .into_iter()
            .map(|t| t.to_lowercase())
            .collect(),
        payment_methods: normalize_multi(params.payment_methods.as_ref()),
        min_age: parse_age_bound(params.min_age.as_deref()),
        max_age: parse_age_bound(params.max_age.as_deref()),
        start_date: parse_start_bound(params.start_date.as_deref()),
        end_date: parse_end_bound(params.end_date.as_deref()),
    }
}

fn parse_age_bound(value: Option<&str>) -> Option<i64> {
    value.and_then(|v| v.trim().parse().ok())
}

/// A start bound is the given instant, or midnight UTC for a bare date.
fn parse_start_bound(value: Option<&str>) -> Option<DateTime<Utc>> {
    value.and_then(parse_date)
}

/// An end bound is inclusive through 23:59:59.999 of the named UTC calendar
/// day, so `endDate=2024-01-15` admits the whole of that day.
fn parse_end_bound(value: Option<&str>) -> Option<DateTime<Utc>> {
    value.and_then(parse_date).and_then(|bound| {
        bound
            .date_naive()
            .and_hms_milli_opt(23, 59, 59, 999)
            .map(|t| t.and_utc())
    })
}

/// Check whether any filter dimension is active.
pub fn has_filters(filters: &Filters) -> bool {
    filters.search.is_some()
        || !filters.regions.is_empty()
        || !filters.genders.is_empty()
        || !filters.categories.is_empty()
        || !filters.tags.is_empty()
        || !filters.payment_methods.is_empty()
        || filters.min_age.is_some()
        || filters.max_age.is_some()
        || filters.start_date.is_some()
        || filters.end_date.is_some()
}

/// Check if a record matches the given filters.
/// AND logic across dimensions, OR logic within a multi-valued dimension.
pub fn matches_filters(record: &SalesRecord, filters: &Filters) -> bool {
    if let Some(term) = &filters.search {
        let name = record.customer_name.to_lowercase();
        let phone = record.phone_number.to_lowercase();
        if !name.contains(term) && !phone.contains(term) {
            return false;
        }
    }

    if !filters.regions.is_empty() {
        let region = record.customer_region.trim();
        if !filters.regions.iter().any(|r| r == region) {
            return false;
        }
    }

    if !filters.genders.is_empty() {
        let gender = record.gender.trim().to_lowercase();
        if !filters.genders.contains(&gender) {
            return false;
        }
    }

    if !filters.categories.is_empty() {
        let category = record.product_category.trim();
        if !filters.categories.iter().any(|c| c == category) {
            return false;
        }
    }

    if !filters.tags.is_empty() {
        let any_tag = record.tags.iter().any(|tag| {
            let tag = tag.trim().to_lowercase();
            filters.tags.contains(&tag)
        });
        if !any_tag {
            return false;
        }
    }

    // Records without a parseable age are excluded once an age bound is active.
    if filters.min_age.is_some() || filters.max_age.is_some() {
        let Some(age) = record.age else {
            return false;
        };
        if filters.min_age.is_some_and(|min| age < min) {
            return false;
        }
        if filters.max_age.is_some_and(|max| age > max) {
            return false;
        }
    }

    // Same rule for dates.
    if filters.start_date.is_some() || filters.end_date.is_some() {
        let Some(date) = record.date else {
            return false;
        };
        if filters.start_date.is_some_and(|start| date < start) {
            return false;
        }
        if filters.end_date.is_some_and(|end| date > end) {
            return false;
        }
    }

    true
}

/// Apply filters to a record sequence, returning the records that match.
pub fn apply_filters(records: &[SalesRecord], filters: &Filters) -> Vec<SalesRecord> {
    let before = records.len();
    let filtered: Vec<SalesRecord> = records
        .iter()
        .filter(|record| matches_filters(record, filters))
        .cloned()
        .collect();

    if has_filters(filters) {
        debug!(before, after = filtered.len(), "applied record filters");
    }

    filtered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MultiValue;

    fn record(name: &str, region: &str, gender: &str, age: Option<i64>) -> SalesRecord {
        SalesRecord {
            customer_name: name.to_string(),
            customer_region: region.to_string(),
            gender: gender.to_string(),
            age,
            ..SalesRecord::default()
        }
    }

    fn region_params(regions: MultiValue) -> QueryParams {
        QueryParams {
            regions: Some(regions),
            ..QueryParams::default()
        }
    }

    #[test]
    fn test_region_filter_keeps_only_matching_records() {
        let records: Vec<SalesRecord> = (0..100)
            .map(|i| {
                let region = if i % 5 < 2 { "North" } else { "South" };
                record(&format!("Customer {i}"), region, "Female", Some(30))
            })
            .collect();

        let params = region_params(MultiValue::One("North".to_string()));
        let filtered = apply_filters(&records, &parse_filters(&params));

        assert_eq!(filtered.len(), 40);
        assert!(filtered.iter().all(|r| r.customer_region == "North"));
    }

    #[test]
    fn test_comma_joined_and_list_forms_filter_identically() {
        let records = vec![
            record("a", "North", "Male", None),
            record("b", "South", "Male", None),
            record("c", "East", "Male", None),
        ];

        let joined = region_params(MultiValue::One("North, East".to_string()));
        let listed = region_params(MultiValue::Many(vec![
            "North".to_string(),
            "East".to_string(),
        ]));

        let by_joined = apply_filters(&records, &parse_filters(&joined));
        let by_list = apply_filters(&records, &parse_filters(&listed));
        assert_eq!(by_joined, by_list);
        assert_eq!(by_joined.len(), 2);
    }

    #[test]
    fn test_filtering_is_idempotent() {
        let records = vec![
            record("Ada", "North", "Female", Some(31)),
            record("Bob", "South", "Male", Some(44)),
        ];
        let params = region_params(MultiValue::One("North".to_string()));
        let filters = parse_filters(&params);

        let once = apply_filters(&records, &filters);
        let twice = apply_filters(&once, &filters);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_filter_dimensions_conjoin() {
        let records = vec![
            record("Ada", "North", "Female", Some(31)),
            record("Bob", "North", "Male", Some(44)),
            record("Cleo", "South", "Female", Some(28)),
        ];

        let combined = QueryParams {
            regions: Some(MultiValue::One("North".to_string())),
            genders: Some(MultiValue::One("female".to_string())),
            ..QueryParams::default()
        };
        let only_region = region_params(MultiValue::One("North".to_string()));
        let only_gender = QueryParams {
            genders: Some(MultiValue::One("female".to_string())),
            ..QueryParams::default()
        };

        let together = apply_filters(&records, &parse_filters(&combined));
        let sequential = apply_filters(
            &apply_filters(&records, &parse_filters(&only_region)),
            &parse_filters(&only_gender),
        );

        assert_eq!(together, sequential);
        assert_eq!(together.len(), 1);
        assert_eq!(together[0].customer_name, "Ada");
    }

    #[test]
    fn test_gender_match_is_case_insensitive() {
        let records = vec![record("Ada", "North", "FEMALE", None)];
        let params = QueryParams {
            genders: Some(MultiValue::One("female".to_string())),
            ..QueryParams::default()
        };
        assert_eq!(apply_filters(&records, &parse_filters(&params)).len(), 1);
    }

    #[test]
    fn test_region_match_is_case_sensitive() {
        let records = vec![record("Ada", "north", "Female", None)];
        let params = region_params(MultiValue::One("North".to_string()));
        assert!(apply_filters(&records, &parse_filters(&params)).is_empty());
    }

    #[test]
    fn test_tag_match_is_case_insensitive_on_both_sides() {
        let mut tagged = record("Ada", "North", "Female", None);
        tagged.tags = vec!["Loyalty ".to_string(), "VIP".to_string()];
        let plain = record("Bob", "North", "Male", None);

        let params = QueryParams {
            tags: Some(MultiValue::One("vip".to_string())),
            ..QueryParams::default()
        };
        let filtered = apply_filters(&[tagged, plain], &parse_filters(&params));
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].customer_name, "Ada");
    }

    #[test]
    fn test_search_covers_name_and_phone() {
        let mut by_phone = record("Ada", "North", "Female", None);
        by_phone.phone_number = "555-0199".to_string();
        let records = vec![by_phone, record("Bob", "South", "Male", None)];

        let by_name = QueryParams {
            search: Some("ADA".to_string()),
            ..QueryParams::default()
        };
        let by_number = QueryParams {
            search: Some("0199".to_string()),
            ..QueryParams::default()
        };

        assert_eq!(apply_filters(&records, &parse_filters(&by_name)).len(), 1);
        assert_eq!(apply_filters(&records, &parse_filters(&by_number)).len(), 1);
    }

    #[test]
    fn test_age_bounds_exclude_unparseable_ages() {
        let records = vec![
            record("Ada", "North", "Female", Some(30)),
            record("Bob", "North", "Male", None),
            record("Cleo", "North", "Female", Some(65)),
        ];
        let params = QueryParams {
            min_age: Some("25".to_string()),
            max_age: Some("40".to_string()),
            ..QueryParams::default()
        };
        let filtered = apply_filters(&records, &parse_filters(&params));
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].customer_name, "Ada");
    }

    #[test]
    fn test_age_bounds_are_inclusive() {
        let records = vec![record("Ada", "North", "Female", Some(30))];
        let params = QueryParams {
            min_age: Some("30".to_string()),
            max_age: Some("30".to_string()),
            ..QueryParams::default()
        };
        assert_eq!(apply_filters(&records, &parse_filters(&params)).len(), 1);
    }

    #[test]
    fn test_malformed_age_bound_disables_the_dimension() {
        let records = vec![record("Ada", "North", "Female", None)];
        let params = QueryParams {
            min_age: Some("not-a-number".to_string()),
            ..QueryParams::default()
        };
        let filters = parse_filters(&params);
        assert!(!has_filters(&filters));
        assert_eq!(apply_filters(&records, &filters).len(), 1);
    }

    #[test]
    fn test_end_date_is_inclusive_through_end_of_day() {
        let mut records = Vec::new();
        for day in 1..=31 {
            let mut r = record(&format!("c{day}"), "North", "Female", None);
            r.date = parse_date(&format!("2024-01-{day:02}T10:30:00Z"));
            records.push(r);
        }

        let params = QueryParams {
            start_date: Some("2024-01-15".to_string()),
            end_date: Some("2024-01-15".to_string()),
            ..QueryParams::default()
        };
        let filtered = apply_filters(&records, &parse_filters(&params));
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].customer_name, "c15");
    }

    #[test]
    fn test_date_bounds_exclude_records_without_dates() {
        let dated = {
            let mut r = record("Ada", "North", "Female", None);
            r.date = parse_date("2024-03-10T00:00:00Z");
            r
        };
        let undated = record("Bob", "North", "Male", None);

        let params = QueryParams {
            start_date: Some("2024-01-01".to_string()),
            ..QueryParams::default()
        };
        let filtered = apply_filters(&[dated, undated], &parse_filters(&params));
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].customer_name, "Ada");
    }

    #[test]
    fn test_empty_params_are_a_no_op() {
        let records = vec![
            record("Ada", "North", "Female", Some(31)),
            record("Bob", "South", "Male", None),
        ];
        let filters = parse_filters(&QueryParams::default());
        assert!(!has_filters(&filters));
        assert_eq!(apply_filters(&records, &filters), records);
    }
}
