use analytics::{
    CategoryTotal, ChartSeries, CustomerRfm, DashboardReport, FilterOptions, KpiSummary,
    SegmentationReport,
};
use anyhow::Result;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};
use configuration::OutputFormat;
use rust_decimal::Decimal;
use serde::Serialize;
use std::path::Path;

/// Rows of the segmentation table shown when nothing else is configured.
pub const DEFAULT_PREVIEW_ROWS: usize = 20;

pub fn print_kpis(kpis: &KpiSummary, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(kpis),
        OutputFormat::Table => {
            println!("{}", kpi_table(kpis));
            Ok(())
        }
    }
}

pub fn print_series(series: &ChartSeries, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(series),
        OutputFormat::Table => {
            print_series_tables(series);
            Ok(())
        }
    }
}

pub fn print_segmentation(
    report: &SegmentationReport,
    limit: usize,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(report),
        OutputFormat::Table => {
            print_segmentation_tables(report, limit);
            Ok(())
        }
    }
}

pub fn print_dashboard(report: &DashboardReport, limit: usize, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(report),
        OutputFormat::Table => {
            println!("Executive KPIs ({} matching rows)", report.records_matched);
            println!("{}", kpi_table(&report.kpis));
            print_series_tables(&report.series);
            print_segmentation_tables(&report.segmentation, limit);
            Ok(())
        }
    }
}

pub fn print_options(options: &FilterOptions, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(options),
        OutputFormat::Table => {
            let mut table = new_table(vec!["Filter", "Values"]);
            table.add_row(vec!["Countries".to_string(), options.countries.join(", ")]);
            table.add_row(vec!["Products".to_string(), options.products.join(", ")]);
            let span = match (options.first_order_date, options.last_order_date) {
                (Some(first), Some(last)) => format!("{} to {}", first, last),
                _ => "no orders".to_string(),
            };
            table.add_row(vec!["Order dates".to_string(), span]);
            println!("{table}");
            Ok(())
        }
    }
}

#[derive(Serialize)]
struct ExportRow<'a> {
    customer_id: &'a str,
    recency_days: i64,
    frequency: usize,
    monetary: Decimal,
    r_score: u8,
    f_score: u8,
    m_score: u8,
    rfm_code: String,
    segment: &'a str,
}

/// Writes every customer row, including the RFM code, as CSV.
pub fn export_customers(customers: &[CustomerRfm], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for customer in customers {
        writer.serialize(ExportRow {
            customer_id: &customer.customer_id,
            recency_days: customer.recency_days,
            frequency: customer.frequency,
            monetary: customer.monetary,
            r_score: customer.r_score,
            f_score: customer.f_score,
            m_score: customer.m_score,
            rfm_code: customer.rfm_code(),
            segment: &customer.segment,
        })?;
    }
    writer.flush()?;
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn right(text: String) -> Cell {
    Cell::new(text).set_alignment(CellAlignment::Right)
}

fn kpi_table(kpis: &KpiSummary) -> Table {
    let mut table = new_table(vec!["Metric", "Value"]);
    table.add_row(vec![Cell::new("Total Sales"), right(format_money(kpis.total_sales))]);
    table.add_row(vec![Cell::new("Total Orders"), right(format_count(kpis.order_count))]);
    table.add_row(vec![
        Cell::new("Total Customers"),
        right(format_count(kpis.customer_count)),
    ]);
    table.add_row(vec![
        Cell::new("Avg Order Value"),
        right(format_money(kpis.avg_order_value)),
    ]);
    table
}

fn category_table(title: &str, totals: &[CategoryTotal]) -> Table {
    let mut table = new_table(vec!["#", title, "Sales"]);
    for (i, total) in totals.iter().enumerate() {
        table.add_row(vec![
            right((i + 1).to_string()),
            Cell::new(&total.label),
            right(format_money(total.sales)),
        ]);
    }
    table
}

fn print_series_tables(series: &ChartSeries) {
    let mut trend = new_table(vec!["Period", "Sales"]);
    for point in &series.trend {
        trend.add_row(vec![Cell::new(point.period), right(format_money(point.sales))]);
    }
    println!("Sales Over Time\n{trend}");
    println!("Top Products by Revenue\n{}", category_table("Product", &series.top_products));
    println!("Revenue by Country\n{}", category_table("Country", &series.by_country));
}

fn print_segmentation_tables(report: &SegmentationReport, limit: usize) {
    if let Some(date) = report.analysis_date {
        println!("Customer Segmentation (RFM) as of {}", date);
    } else {
        println!("Customer Segmentation (RFM): no matching orders");
    }

    let mut preview = new_table(vec![
        "Customer", "Recency", "Frequency", "Monetary", "RFM", "Segment",
    ]);
    for customer in report.customers.iter().take(limit) {
        preview.add_row(vec![
            Cell::new(&customer.customer_id),
            right(customer.recency_days.to_string()),
            right(customer.frequency.to_string()),
            right(format_money(customer.monetary)),
            Cell::new(customer.rfm_code()),
            Cell::new(&customer.segment),
        ]);
    }
    println!("{preview}");
    if report.customers.len() > limit {
        println!("({} of {} customers shown)", limit, report.customers.len());
    }

    let mut segments = new_table(vec!["Segment", "Customers", "Monetary"]);
    for segment in &report.segment_counts {
        segments.add_row(vec![
            Cell::new(&segment.segment),
            right(format_count(segment.customers)),
            right(format_money(segment.monetary)),
        ]);
    }
    println!("{segments}");

    let mut distribution = new_table(vec!["RFM Score", "Customers"]);
    for bucket in &report.score_distribution {
        distribution.add_row(vec![
            Cell::new(&bucket.rfm_code),
            right(format_count(bucket.customers)),
        ]);
    }
    println!("RFM Score Distribution\n{distribution}");
}

/// Formats a currency amount as `$1,234.56`.
pub fn format_money(value: Decimal) -> String {
    let rounded = value.round_dp(2);
    let sign = if rounded < Decimal::ZERO { "-" } else { "" };
    let text = format!("{:.2}", rounded.abs());
    let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    format!("{}${}.{}", sign, group_thousands(whole), cents)
}

pub fn format_count(value: usize) -> String {
    group_thousands(&value.to_string())
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
