use crate::models::SalesRecord;

/// Sort records in place by one of the supported keys.
///
/// The sort is stable, so records with equal keys keep their original
/// relative order. An unrecognized `sort_by` leaves the input order
/// untouched; any `sort_order` other than a case-insensitive `"desc"` sorts
/// ascending. Missing values rank lowest: a null date compares as the epoch,
/// a null quantity as zero, a missing name as the empty string.
pub fn sort_records(records: &mut [SalesRecord], sort_by: &str, sort_order: &str) {
    let descending = sort_order.eq_ignore_ascii_case("desc");

    match sort_by {
        "date" => sort_by_key(records, descending, |r| {
            r.date.map(|d| d.timestamp_millis()).unwrap_or(0)
        }),
        "quantity" => records.sort_by(|a, b| {
            let ordering = a
                .quantity
                .unwrap_or(0.0)
                .total_cmp(&b.quantity.unwrap_or(0.0));
            if descending {
                ordering.reverse()
            } else {
                ordering
            }
        }),
        "customerName" => sort_by_key(records, descending, |r| r.customer_name.to_lowercase()),
        _ => {}
    }
}

fn sort_by_key<K: Ord>(
    records: &mut [SalesRecord],
    descending: bool,
    key: impl Fn(&SalesRecord) -> K,
) {
    // Reversing the comparator keeps Equal as Equal, so stability holds in
    // both directions.
    records.sort_by(|a, b| {
        let ordering = key(a).cmp(&key(b));
        if descending {
            ordering.reverse()
        } else {
            ordering
        }
    });
}
