use chrono::NaiveDate;
use core_types::FilterState;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The four headline metrics of the dashboard.
///
/// Recomputed from scratch for every filter; a filter that matches nothing
/// yields the all-zero summary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KpiSummary {
    pub total_sales: Decimal,
    pub order_count: usize,
    pub customer_count: usize,
    /// `total_sales / order_count`, or zero when there are no orders.
    pub avg_order_value: Decimal,
}

/// Sales of one period of the trend chart. `period` is the first day of the period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub period: NaiveDate,
    pub sales: Decimal,
}

/// Sales attributed to one product or one country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub label: String,
    pub sales: Decimal,
}

/// Every grouped series the dashboard charts, already ordered for display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartSeries {
    /// Ascending by period.
    pub trend: Vec<TrendPoint>,
    /// Descending by sales, ties by label.
    pub top_products: Vec<CategoryTotal>,
    /// Descending by sales, ties by label.
    pub by_country: Vec<CategoryTotal>,
}

/// RFM metrics, scores and segment of one customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerRfm {
    pub customer_id: String,
    pub recency_days: i64,
    pub frequency: usize,
    pub monetary: Decimal,
    pub r_score: u8,
    pub f_score: u8,
    pub m_score: u8,
    pub segment: String,
}

impl CustomerRfm {
    /// The concatenated scores, e.g. `"545"`.
    pub fn rfm_code(&self) -> String {
        format!("{}{}{}", self.r_score, self.f_score, self.m_score)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentCount {
    pub segment: String,
    pub customers: usize,
    pub monetary: Decimal,
}

/// One bar of the RFM score histogram.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreCount {
    pub rfm_code: String,
    pub customers: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentationReport {
    /// The reference date recency was measured against; `None` when no records matched.
    pub analysis_date: Option<NaiveDate>,
    /// Ordered by customer id.
    pub customers: Vec<CustomerRfm>,
    /// Every segment label in rule order, fallback last, including empty ones.
    pub segment_counts: Vec<SegmentCount>,
    /// Ascending by code; only codes that occur.
    pub score_distribution: Vec<ScoreCount>,
}

/// KPIs, series and segmentation computed from a single filter pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardReport {
    pub filter: FilterState,
    pub records_matched: usize,
    pub kpis: KpiSummary,
    pub series: ChartSeries,
    pub segmentation: SegmentationReport,
}

/// The values a filter widget can offer, taken from the unfiltered dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    pub countries: Vec<String>,
    pub products: Vec<String>,
    pub first_order_date: Option<NaiveDate>,
    pub last_order_date: Option<NaiveDate>,
}
