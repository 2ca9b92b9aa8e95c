use crate::error::AnalyticsError;
use crate::report::CustomerRfm;
use crate::scoring::{inverse_quantile_scores, quantile_scores};
use crate::segments::SegmentRules;
use chrono::NaiveDate;
use core_types::OrderRecord;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashSet};

/// Raw recency, frequency and monetary value of one customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RfmMetrics {
    pub customer_id: String,
    pub recency_days: i64,
    pub frequency: usize,
    pub monetary: Decimal,
}

#[derive(Default)]
struct CustomerActivity<'a> {
    last_order: Option<NaiveDate>,
    orders: HashSet<&'a str>,
    monetary: Decimal,
}

/// Picks the date recency is measured against.
///
/// Defaults to the latest order in `records`. A requested date before that
/// order would produce negative recency and is rejected. Returns `None` only
/// for an empty record set.
pub fn resolve_analysis_date(
    records: &[&OrderRecord],
    requested: Option<NaiveDate>,
) -> Result<Option<NaiveDate>, AnalyticsError> {
    let Some(latest) = records.iter().map(|r| r.order_date).max() else {
        return Ok(requested);
    };

    match requested {
        Some(requested) if requested < latest => {
            Err(AnalyticsError::InvalidAnalysisDate { requested, latest })
        }
        Some(requested) => Ok(Some(requested)),
        None => Ok(Some(latest)),
    }
}

/// Aggregates the RFM metrics of every customer, ordered by customer id.
pub fn customer_metrics(records: &[&OrderRecord], analysis_date: NaiveDate) -> Vec<RfmMetrics> {
    let mut activity: BTreeMap<&str, CustomerActivity<'_>> = BTreeMap::new();
    for record in records {
        let entry = activity.entry(record.customer_id.as_str()).or_default();
        entry.last_order = entry.last_order.max(Some(record.order_date));
        entry.orders.insert(record.order_id.as_str());
        entry.monetary += record.line_total();
    }

    activity
        .into_iter()
        .map(|(customer_id, a)| RfmMetrics {
            customer_id: customer_id.to_string(),
            recency_days: a
                .last_order
                .map_or(0, |last| (analysis_date - last).num_days()),
            frequency: a.orders.len(),
            monetary: a.monetary,
        })
        .collect()
}

/// Scores `metrics` against each other and labels every customer.
///
/// The quantile boundaries come from `metrics` alone, so the same customer can
/// score differently under a different filter.
pub fn score_customers(metrics: Vec<RfmMetrics>, rules: &SegmentRules) -> Vec<CustomerRfm> {
    let recency: Vec<i64> = metrics.iter().map(|m| m.recency_days).collect();
    let frequency: Vec<usize> = metrics.iter().map(|m| m.frequency).collect();
    let monetary: Vec<Decimal> = metrics.iter().map(|m| m.monetary).collect();

    let r_scores = inverse_quantile_scores(&recency);
    let f_scores = quantile_scores(&frequency);
    let m_scores = quantile_scores(&monetary);

    metrics
        .into_iter()
        .enumerate()
        .map(|(i, m)| {
            let (r_score, f_score, m_score) = (r_scores[i], f_scores[i], m_scores[i]);
            CustomerRfm {
                segment: rules.classify(r_score, f_score, m_score).to_string(),
                customer_id: m.customer_id,
                recency_days: m.recency_days,
                frequency: m.frequency,
                monetary: m.monetary,
                r_score,
                f_score,
                m_score,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn line(customer: &str, order: &str, day: u32, amount: Decimal) -> OrderRecord {
        OrderRecord::new(customer, order, date(2024, 6, day), 1, amount, "France", "Mug").unwrap()
    }

    fn two_customers() -> Vec<OrderRecord> {
        vec![
            line("A", "O1", 1, dec!(60)),
            line("A", "O1", 1, dec!(40)),
            line("A", "O2", 10, dec!(50)),
            line("B", "O3", 4, dec!(10)),
        ]
    }

    #[test]
    fn metrics_follow_the_worked_example() {
        let records = two_customers();
        let refs: Vec<_> = records.iter().collect();
        let metrics = customer_metrics(&refs, date(2024, 6, 10));

        assert_eq!(
            metrics,
            vec![
                RfmMetrics {
                    customer_id: "A".to_string(),
                    recency_days: 0,
                    frequency: 2,
                    monetary: dec!(150),
                },
                RfmMetrics {
                    customer_id: "B".to_string(),
                    recency_days: 6,
                    frequency: 1,
                    monetary: dec!(10),
                },
            ]
        );
    }

    #[test]
    fn analysis_date_defaults_to_latest_order() {
        let records = two_customers();
        let refs: Vec<_> = records.iter().collect();
        assert_eq!(resolve_analysis_date(&refs, None).unwrap(), Some(date(2024, 6, 10)));
        assert_eq!(
            resolve_analysis_date(&refs, Some(date(2024, 7, 1))).unwrap(),
            Some(date(2024, 7, 1))
        );
        assert_eq!(resolve_analysis_date(&[], None).unwrap(), None);
    }

    #[test]
    fn analysis_date_before_latest_order_is_rejected() {
        let records = two_customers();
        let refs: Vec<_> = records.iter().collect();
        let err = resolve_analysis_date(&refs, Some(date(2024, 6, 9))).unwrap_err();
        assert!(matches!(err, AnalyticsError::InvalidAnalysisDate { .. }));
    }

    #[test]
    fn better_customer_scores_higher() {
        let records = two_customers();
        let refs: Vec<_> = records.iter().collect();
        let metrics = customer_metrics(&refs, date(2024, 6, 10));
        let scored = score_customers(metrics, &SegmentRules::default());

        let (a, b) = (&scored[0], &scored[1]);
        assert_eq!((a.r_score, a.f_score, a.m_score), (5, 5, 5));
        assert_eq!((b.r_score, b.f_score, b.m_score), (1, 1, 1));
        assert_eq!(a.segment, "Champions");
        assert_eq!(b.segment, "Lost");
        assert_eq!(a.rfm_code(), "555");
    }
}
