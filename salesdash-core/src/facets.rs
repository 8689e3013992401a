use std::collections::BTreeSet;

use crate::filtering::{apply_filters, has_filters, parse_filters};
use crate::models::{AgeRange, DateRange, FilterOptions, QueryParams, SalesRecord};

/// Fallback bounds when no record carries a parseable age.
const DEFAULT_AGE_RANGE: AgeRange = AgeRange { min: 0, max: 100 };

/// Compute the filter values still applicable given the current filters.
///
/// When any filter dimension is active the record set is narrowed first
/// (without pagination), so a client only offers options that can still
/// produce results. Categorical facets are the sorted distinct non-empty
/// values in the reachable records; the tags facet flattens every record's
/// tag list.
pub fn filter_options(records: &[SalesRecord], params: &QueryParams) -> FilterOptions {
    let filters = parse_filters(params);
    let narrowed;
    let records: &[SalesRecord] = if has_filters(&filters) {
        narrowed = apply_filters(records, &filters);
        &narrowed
    } else {
        records
    };

    let mut tags = BTreeSet::new();
    for record in records {
        for tag in &record.tags {
            let tag = tag.trim();
            if !tag.is_empty() {
                tags.insert(tag.to_string());
            }
        }
    }

    FilterOptions {
        regions: distinct_values(records, |r| &r.customer_region),
        genders: distinct_values(records, |r| &r.gender),
        categories: distinct_values(records, |r| &r.product_category),
        tags: tags.into_iter().collect(),
        payment_methods: distinct_values(records, |r| &r.payment_method),
        age_range: age_range(records),
        date_range: date_range(records),
    }
}

/// Sorted distinct non-empty values of one categorical field.
fn distinct_values<'a, F>(records: &'a [SalesRecord], field: F) -> Vec<String>
where
    F: Fn(&'a SalesRecord) -> &'a str,
{
    records
        .iter()
        .map(|r| field(r).trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn age_range(records: &[SalesRecord]) -> AgeRange {
    let ages: Vec<i64> = records.iter().filter_map(|r| r.age).collect();
    match (ages.iter().min(), ages.iter().max()) {
        (Some(&min), Some(&max)) => AgeRange { min, max },
        _ => DEFAULT_AGE_RANGE,
    }
}

fn date_range(records: &[SalesRecord]) -> DateRange {
    let dates = records.iter().filter_map(|r| r.date);
    let start = dates.clone().min();
    let end = dates.max();
    DateRange {
        start: start.map(|d| d.format("%Y-%m-%d").to_string()),
        end: end.map(|d| d.format("%Y-%m-%d").to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::parse_date;
    use crate::models::MultiValue;

    fn record(region: &str, category: &str, age: Option<i64>, date: &str, tags: &[&str]) -> SalesRecord {
        SalesRecord {
            customer_region: region.to_string(),
            product_category: category.to_string(),
            age,
            date: parse_date(date),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            ..SalesRecord::default()
        }
    }

    fn dataset() -> Vec<SalesRecord> {
        vec![
            record("North", "Electronics", Some(31), "2024-01-15", &["loyalty"]),
            record("North", "Clothing", Some(58), "2024-02-01", &["gift", "loyalty"]),
            record("South", "Groceries", Some(24), "2024-03-10", &["bulk"]),
            record("East", "", None, "", &[]),
        ]
    }

    #[test]
    fn test_unfiltered_options_cover_the_whole_dataset() {
        let options = filter_options(&dataset(), &QueryParams::default());

        assert_eq!(options.regions, vec!["East", "North", "South"]);
        assert_eq!(options.categories, vec!["Clothing", "Electronics", "Groceries"]);
        assert_eq!(options.tags, vec!["bulk", "gift", "loyalty"]);
        assert_eq!(options.age_range, AgeRange { min: 24, max: 58 });
        assert_eq!(options.date_range.start.as_deref(), Some("2024-01-15"));
        assert_eq!(options.date_range.end.as_deref(), Some("2024-03-10"));
    }

    #[test]
    fn test_active_filters_narrow_the_reported_options() {
        let params = QueryParams {
            regions: Some(MultiValue::One("North".to_string())),
            ..QueryParams::default()
        };
        let options = filter_options(&dataset(), &params);

        // Only categories that occur among North records, not the global set.
        assert_eq!(options.categories, vec!["Clothing", "Electronics"]);
        assert_eq!(options.regions, vec!["North"]);
        assert_eq!(options.tags, vec!["gift", "loyalty"]);
        assert_eq!(options.age_range, AgeRange { min: 31, max: 58 });
    }

    #[test]
    fn test_empty_fields_are_not_offered_as_options() {
        let options = filter_options(&dataset(), &QueryParams::default());
        assert!(!options.categories.iter().any(|c| c.is_empty()));
    }

    #[test]
    fn test_defaults_when_nothing_is_parseable() {
        let records = vec![record("North", "Electronics", None, "", &[])];
        let options = filter_options(&records, &QueryParams::default());

        assert_eq!(options.age_range, AgeRange { min: 0, max: 100 });
        assert_eq!(options.date_range, DateRange { start: None, end: None });
    }

    #[test]
    fn test_empty_dataset_yields_empty_options() {
        let options = filter_options(&[], &QueryParams::default());
        assert!(options.regions.is_empty());
        assert!(options.tags.is_empty());
        assert_eq!(options.age_range, DEFAULT_AGE_RANGE);
    }
}
