use clap::Parser;
use colored::Colorize;
use std::process;

use salesdash_core::{
    filter_options, load_sales_data, process_query, MultiValue, QueryParams, SalesRecord,
};

/// Sales data browser - filter, sort, and page through a sales CSV
///
/// Examples:
///   # First page of the dataset, newest sales first
///   sales_cli data/sales.csv
///
///   # Filter by region (OR within the repeated flag)
///   sales_cli data/sales.csv --region North --region South
///
///   # Combine filters (AND between dimensions)
///   sales_cli data/sales.csv --region North --category Electronics
///
///   # Search, sort, and page
///   sales_cli data/sales.csv --search ada --sort customerName --page 2
///
///   # Show which filter values are still applicable
///   sales_cli data/sales.csv --region North --options
#[derive(Parser, Debug)]
#[command(name = "sales_cli")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the sales CSV file
    #[arg(value_name = "FILE")]
    file: String,

    /// Case-insensitive search over customer name and phone number
    #[arg(short, long, value_name = "TERM")]
    search: Option<String>,

    /// Filter by customer region (repeatable for OR logic)
    #[arg(short, long = "region", value_name = "NAME")]
    regions: Vec<String>,

    /// Filter by gender (repeatable, case-insensitive)
    #[arg(short, long = "gender", value_name = "NAME")]
    genders: Vec<String>,

    /// Filter by product category (repeatable)
    #[arg(short, long = "category", value_name = "NAME")]
    categories: Vec<String>,

    /// Filter by tag (repeatable, case-insensitive)
    #[arg(short, long = "tag", value_name = "NAME")]
    tags: Vec<String>,

    /// Filter by payment method (repeatable)
    #[arg(short = 'm', long = "payment", value_name = "NAME")]
    payment_methods: Vec<String>,

    /// Minimum customer age (inclusive)
    #[arg(long, value_name = "YEARS")]
    min_age: Option<i64>,

    /// Maximum customer age (inclusive)
    #[arg(long, value_name = "YEARS")]
    max_age: Option<i64>,

    /// Earliest sale date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    start_date: Option<String>,

    /// Latest sale date, inclusive through end of day (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    end_date: Option<String>,

    /// Sort field: date, quantity, or customerName
    #[arg(long = "sort", value_name = "FIELD")]
    sort_by: Option<String>,

    /// Sort direction: asc or desc
    #[arg(long = "order", value_name = "DIR")]
    sort_order: Option<String>,

    /// Page number (1-based)
    #[arg(long, value_name = "N")]
    page: Option<u64>,

    /// Records per page
    #[arg(long, value_name = "N")]
    page_size: Option<u64>,

    /// Print the applicable filter options instead of records
    #[arg(long)]
    options: bool,
}

fn main() {
    let cli = Cli::parse();

    let records = load_sales_data(&cli.file).unwrap_or_else(|err| {
        eprintln!("Error loading sales data from '{}': {}", cli.file, err);
        process::exit(1);
    });

    let params = build_params(&cli);

    if cli.options {
        print_options(&records, &params);
    } else {
        print_query(&records, &params);
    }
}

fn build_params(cli: &Cli) -> QueryParams {
    let multi = |values: &[String]| {
        if values.is_empty() {
            None
        } else {
            Some(MultiValue::Many(values.to_vec()))
        }
    };

    QueryParams {
        search: cli.search.clone(),
        regions: multi(&cli.regions),
        genders: multi(&cli.genders),
        categories: multi(&cli.categories),
        tags: multi(&cli.tags),
        payment_methods: multi(&cli.payment_methods),
        min_age: cli.min_age.map(|v| v.to_string()),
        max_age: cli.max_age.map(|v| v.to_string()),
        start_date: cli.start_date.clone(),
        end_date: cli.end_date.clone(),
        sort_by: cli.sort_by.clone(),
        sort_order: cli.sort_order.clone(),
        page: cli.page.map(|v| v.to_string()),
        page_size: cli.page_size.map(|v| v.to_string()),
    }
}

fn print_query(records: &[SalesRecord], params: &QueryParams) {
    let result = process_query(records, params);
    let applied = &result.applied_filters;

    println!("{}", "Sales Query Results".bold().underline());
    println!();

    let mut filter_parts = Vec::new();
    if let Some(search) = &applied.search {
        filter_parts.push(format!("search: {search}"));
    }
    for (label, values) in [
        ("regions", &applied.regions),
        ("genders", &applied.genders),
        ("categories", &applied.categories),
        ("tags", &applied.tags),
        ("payment methods", &applied.payment_methods),
    ] {
        if !values.is_empty() {
            filter_parts.push(format!("{label}: {}", values.join(" OR ")));
        }
    }
    if let Some(min) = applied.min_age {
        filter_parts.push(format!("min age: {min}"));
    }
    if let Some(max) = applied.max_age {
        filter_parts.push(format!("max age: {max}"));
    }
    if let Some(start) = &applied.start_date {
        filter_parts.push(format!("from: {start}"));
    }
    if let Some(end) = &applied.end_date {
        filter_parts.push(format!("to: {end}"));
    }

    if !filter_parts.is_empty() {
        println!("{} {}", "Active filters:".cyan(), filter_parts.join("; "));
    }
    println!(
        "{} {} {}",
        "Sorted by:".cyan(),
        applied.sort_by,
        applied.sort_order
    );
    println!();

    if result.data.is_empty() {
        println!("{}", "No records match the specified filters.".yellow());
    } else {
        for record in &result.data {
            print_record(record);
        }
    }

    let p = &result.pagination;
    println!();
    println!(
        "{} page {} of {} ({} records, {} per page)",
        "Summary:".green(),
        p.page,
        p.total_pages,
        p.total_items,
        p.page_size
    );
}

fn print_record(record: &SalesRecord) {
    let date = record
        .date
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "----------".to_string());
    let amount = record
        .final_amount
        .map(|a| format!("{a:.2}"))
        .unwrap_or_else(|| "-".to_string());

    println!(
        "  {}  {}  {} | {} | {} | {}",
        date.dimmed(),
        record.transaction_id,
        record.customer_name.bold(),
        record.customer_region,
        record.product_category,
        amount
    );
    if !record.tags.is_empty() {
        println!("      tags: {}", record.tags.join(", ").dimmed());
    }
}

fn print_options(records: &[SalesRecord], params: &QueryParams) {
    let options = filter_options(records, params);

    println!("{}", "Applicable Filter Options".bold().underline());
    println!();
    for (label, values) in [
        ("Regions", &options.regions),
        ("Genders", &options.genders),
        ("Categories", &options.categories),
        ("Tags", &options.tags),
        ("Payment methods", &options.payment_methods),
    ] {
        println!("{} {}", format!("{label}:").cyan(), values.join(", "));
    }
    println!(
        "{} {} - {}",
        "Age range:".cyan(),
        options.age_range.min,
        options.age_range.max
    );
    println!(
        "{} {} - {}",
        "Date range:".cyan(),
        options.date_range.start.as_deref().unwrap_or("-"),
        options.date_range.end.as_deref().unwrap_or("-")
    );
}
