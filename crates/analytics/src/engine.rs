use crate::error::AnalyticsError;
use crate::filter::{apply_filter, filter_options};
use crate::report::{
    ChartSeries, CustomerRfm, DashboardReport, FilterOptions, KpiSummary, ScoreCount,
    SegmentCount, SegmentationReport,
};
use crate::segments::SegmentRules;
use crate::{kpi, rfm, series};
use chrono::NaiveDate;
use configuration::{AnalyticsConfig, SeriesSettings};
use core_types::{FilterState, OrderRecord};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// A stateless calculator for dashboard metrics.
///
/// The engine only holds immutable configuration. Every query takes the full
/// record set and a filter, filters, and recomputes its result from scratch;
/// nothing is cached between calls.
#[derive(Debug, Clone, Default)]
pub struct AnalyticsEngine {
    series: SeriesSettings,
    segments: SegmentRules,
}

impl AnalyticsEngine {
    pub fn new(config: &AnalyticsConfig) -> Result<Self, AnalyticsError> {
        config.validate()?;
        Ok(Self {
            series: config.series.clone(),
            segments: SegmentRules::from_config(&config.segmentation)?,
        })
    }

    /// KPI summary of the records that pass `filter`.
    pub fn compute(
        &self,
        records: &[OrderRecord],
        filter: &FilterState,
    ) -> Result<KpiSummary, AnalyticsError> {
        let filtered = apply_filter(records, filter)?;
        Ok(kpi::summarize(&filtered))
    }

    /// Trend, top-products and by-country series of the records that pass `filter`.
    pub fn series(
        &self,
        records: &[OrderRecord],
        filter: &FilterState,
    ) -> Result<ChartSeries, AnalyticsError> {
        let filtered = apply_filter(records, filter)?;
        Ok(series::build(&filtered, &self.series))
    }

    /// One scored and labelled row per customer, ordered by customer id.
    ///
    /// `analysis_date` defaults to the latest order that passes `filter`.
    pub fn segment(
        &self,
        records: &[OrderRecord],
        filter: &FilterState,
        analysis_date: Option<NaiveDate>,
    ) -> Result<Vec<CustomerRfm>, AnalyticsError> {
        let filtered = apply_filter(records, filter)?;
        let (_, customers) = self.segment_filtered(&filtered, analysis_date)?;
        Ok(customers)
    }

    /// The segmentation rows plus per-segment counts and the score histogram.
    pub fn segmentation_report(
        &self,
        records: &[OrderRecord],
        filter: &FilterState,
        analysis_date: Option<NaiveDate>,
    ) -> Result<SegmentationReport, AnalyticsError> {
        let filtered = apply_filter(records, filter)?;
        self.report_filtered(&filtered, analysis_date)
    }

    /// KPIs, series and segmentation from one filter pass.
    pub fn dashboard(
        &self,
        records: &[OrderRecord],
        filter: &FilterState,
        analysis_date: Option<NaiveDate>,
    ) -> Result<DashboardReport, AnalyticsError> {
        let filtered = apply_filter(records, filter)?;
        tracing::info!(
            total = records.len(),
            matched = filtered.len(),
            "Computing dashboard."
        );

        Ok(DashboardReport {
            filter: filter.clone(),
            records_matched: filtered.len(),
            kpis: kpi::summarize(&filtered),
            series: series::build(&filtered, &self.series),
            segmentation: self.report_filtered(&filtered, analysis_date)?,
        })
    }

    /// The values the filter widgets can offer for `records`.
    pub fn filter_options(&self, records: &[OrderRecord]) -> FilterOptions {
        filter_options(records)
    }

    fn segment_filtered(
        &self,
        filtered: &[&OrderRecord],
        analysis_date: Option<NaiveDate>,
    ) -> Result<(Option<NaiveDate>, Vec<CustomerRfm>), AnalyticsError> {
        let analysis_date = rfm::resolve_analysis_date(filtered, analysis_date)?;
        let Some(reference) = analysis_date else {
            return Ok((None, Vec::new()));
        };

        let metrics = rfm::customer_metrics(filtered, reference);
        tracing::debug!(
            customers = metrics.len(),
            analysis_date = %reference,
            "Scoring customers."
        );
        Ok((analysis_date, rfm::score_customers(metrics, &self.segments)))
    }

    fn report_filtered(
        &self,
        filtered: &[&OrderRecord],
        analysis_date: Option<NaiveDate>,
    ) -> Result<SegmentationReport, AnalyticsError> {
        let (analysis_date, customers) = self.segment_filtered(filtered, analysis_date)?;

        let mut by_segment: BTreeMap<&str, (usize, Decimal)> = BTreeMap::new();
        let mut by_code: BTreeMap<String, usize> = BTreeMap::new();
        for customer in &customers {
            let entry = by_segment.entry(customer.segment.as_str()).or_default();
            entry.0 += 1;
            entry.1 += customer.monetary;
            *by_code.entry(customer.rfm_code()).or_default() += 1;
        }

        let segment_counts = self
            .segments
            .labels()
            .into_iter()
            .map(|label| {
                let (customers, monetary) = by_segment.get(label).copied().unwrap_or_default();
                SegmentCount {
                    segment: label.to_string(),
                    customers,
                    monetary,
                }
            })
            .collect();

        let score_distribution = by_code
            .into_iter()
            .map(|(rfm_code, customers)| ScoreCount { rfm_code, customers })
            .collect();

        Ok(SegmentationReport {
            analysis_date,
            customers,
            segment_counts,
            score_distribution,
        })
    }
}
