use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

use crate::models::SalesRecord;

/// Failure to read a present sales CSV file. A missing file is not an error,
/// it is an empty dataset.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to read sales data from {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Load and normalize the sales dataset from a CSV file.
///
/// Headers are normalized to camelCase attribute names, numeric and date
/// fields are coerced parse-or-null, and tag cells are split into lists.
/// A missing file yields an empty dataset so the service can still start.
pub fn load_sales_data<P: AsRef<Path>>(path: P) -> Result<Vec<SalesRecord>, IngestError> {
    let path = path.as_ref();

    if !path.exists() {
        warn!(path = %path.display(), "sales CSV not found, using empty dataset");
        return Ok(Vec::new());
    }

    let contents = fs::read_to_string(path).map_err(|source| IngestError::Read {
        path: path.display().to_string(),
        source,
    })?;

    let records = parse_sales_csv(&contents);
    info!(count = records.len(), path = %path.display(), "loaded sales records");
    Ok(records)
}

/// Parse CSV text into normalized records. The first row is the header.
pub fn parse_sales_csv(contents: &str) -> Vec<SalesRecord> {
    let mut rows = parse_rows(contents).into_iter();

    let Some(header_row) = rows.next() else {
        return Vec::new();
    };
    let headers: Vec<String> = header_row.iter().map(|h| normalize_header(h)).collect();

    rows.map(|row| record_from_row(&headers, &row)).collect()
}

/// Split CSV text into rows of fields, honoring RFC 4180 quoting: quoted
/// fields may contain commas, doubled quotes, and line breaks. Blank lines
/// are skipped.
fn parse_rows(contents: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;

    let mut chars = contents.chars().peekable();
    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(c);
            }
            continue;
        }

        match c {
            '"' => in_quotes = true,
            ',' => row.push(std::mem::take(&mut field)),
            '\r' => {}
            '\n' => {
                row.push(std::mem::take(&mut field));
                if row.iter().any(|f| !f.trim().is_empty()) {
                    rows.push(std::mem::take(&mut row));
                } else {
                    row.clear();
                }
            }
            _ => field.push(c),
        }
    }

    // Final row without a trailing newline.
    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        if row.iter().any(|f| !f.trim().is_empty()) {
            rows.push(row);
        }
    }

    rows
}

/// Normalize a CSV header to the camelCase attribute name used on the wire,
/// e.g. "Price per Unit" -> "pricePerUnit".
fn normalize_header(name: &str) -> String {
    let mut normalized = String::new();
    for (index, word) in name.split_whitespace().enumerate() {
        let mut chars = word.chars();
        match chars.next() {
            Some(first) if index == 0 => {
                normalized.extend(first.to_lowercase());
            }
            Some(first) => {
                normalized.extend(first.to_uppercase());
            }
            None => continue,
        }
        normalized.extend(chars.flat_map(char::to_lowercase));
    }
    normalized.retain(|c| c.is_ascii_alphanumeric());
    normalized
}

fn record_from_row(headers: &[String], row: &[String]) -> SalesRecord {
    let mut record = SalesRecord::default();

    for (header, value) in headers.iter().zip(row) {
        match header.as_str() {
            "transactionId" => record.transaction_id = value.trim().to_string(),
            "customerId" => record.customer_id = value.trim().to_string(),
            "customerName" => record.customer_name = value.trim().to_string(),
            "phoneNumber" => record.phone_number = value.trim().to_string(),
            "customerRegion" => record.customer_region = value.trim().to_string(),
            "gender" => record.gender = value.trim().to_string(),
            "age" => record.age = parse_int(value),
            "productCategory" => record.product_category = value.trim().to_string(),
            "tags" => record.tags = parse_tags(value),
            "quantity" => record.quantity = parse_number(value),
            "pricePerUnit" => record.price_per_unit = parse_number(value),
            "discountPercentage" => record.discount_percentage = parse_number(value),
            "totalAmount" => record.total_amount = parse_number(value),
            "finalAmount" => record.final_amount = parse_number(value),
            "paymentMethod" => record.payment_method = value.trim().to_string(),
            "date" => record.date = parse_date(value),
            _ => {}
        }
    }

    record
}

/// Parse a record date: RFC 3339, `YYYY-MM-DD HH:MM:SS`, or a bare
/// `YYYY-MM-DD` (midnight UTC). Anything else is null. All dates are
/// interpreted as UTC.
pub fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
        return Some(instant.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    if let Ok(day) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return day.and_hms_opt(0, 0, 0).map(|t| t.and_utc());
    }
    None
}

/// Split a comma-joined tag cell into a trimmed, non-empty list.
pub fn parse_tags(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_number(value: &str) -> Option<f64> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    value.parse().ok()
}

fn parse_int(value: &str) -> Option<i64> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    value.parse().ok()
}
