use analytics::{AnalyticsEngine, KpiSummary};
use chrono::NaiveDate;
use core_types::{DateRange, FilterState, OrderRecord};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashSet;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// A small but uneven shop: several countries, repeat buyers, multi-line orders.
fn shop() -> Vec<OrderRecord> {
    let countries = ["France", "Germany", "Spain", "Italy"];
    let products = ["Mug", "Lamp", "Desk", "Chair", "Rug", "Vase"];
    let mut records = Vec::new();

    for i in 0..60u32 {
        let customer = format!("C{:02}", i % 17);
        let order = format!("INV-{:03}", i / 2);
        let day = date(2024, 1, 1) + chrono::Duration::days(i64::from((i * 7) % 90));
        let quantity = 1 + (i % 4);
        let price = Decimal::new(i64::from(250 + (i * 37) % 900), 2);
        records.push(
            OrderRecord::new(
                customer,
                order,
                day,
                quantity,
                price,
                countries[(i % 4) as usize],
                products[(i % 6) as usize],
            )
            .unwrap(),
        );
    }
    records
}

fn filters() -> Vec<FilterState> {
    vec![
        FilterState::all(),
        FilterState::all().with_country("France"),
        FilterState::all().with_country("Germany").with_country("Italy"),
        FilterState::all().with_product("Lamp"),
        FilterState::all()
            .with_date_range(DateRange::new(date(2024, 2, 1), date(2024, 2, 29)).unwrap()),
        FilterState::all()
            .with_country("Spain")
            .with_product("Desk")
            .with_date_range(DateRange::new(date(2024, 1, 1), date(2024, 3, 1)).unwrap()),
    ]
}

#[test]
fn order_count_never_exceeds_unfiltered_orders() {
    let records = shop();
    let engine = AnalyticsEngine::default();
    let all_orders: HashSet<_> = records.iter().map(|r| r.order_id.as_str()).collect();

    for filter in filters() {
        let kpis = engine.compute(&records, &filter).unwrap();
        assert!(kpis.order_count <= all_orders.len(), "{:?}", filter);
    }
}

#[test]
fn total_sales_equals_sum_of_customer_monetary() {
    let records = shop();
    let engine = AnalyticsEngine::default();

    for filter in filters() {
        let kpis = engine.compute(&records, &filter).unwrap();
        let rows = engine.segment(&records, &filter, None).unwrap();
        let monetary: Decimal = rows.iter().map(|r| r.monetary).sum();
        assert_eq!(kpis.total_sales, monetary, "{:?}", filter);
        assert_eq!(kpis.customer_count, rows.len(), "{:?}", filter);
    }
}

#[test]
fn average_order_value_is_consistent() {
    let records = shop();
    let engine = AnalyticsEngine::default();

    for filter in filters() {
        let kpis = engine.compute(&records, &filter).unwrap();
        if kpis.order_count == 0 {
            assert_eq!(kpis.avg_order_value, Decimal::ZERO);
        } else {
            let recovered = kpis.avg_order_value * Decimal::from(kpis.order_count);
            assert!((recovered - kpis.total_sales).abs() < dec!(0.0000001), "{:?}", filter);
        }
    }
}

#[test]
fn every_customer_gets_valid_scores_and_one_known_label() {
    let records = shop();
    let engine = AnalyticsEngine::default();

    for filter in filters() {
        let report = engine.segmentation_report(&records, &filter, None).unwrap();
        let labels: Vec<_> = report.segment_counts.iter().map(|s| s.segment.clone()).collect();

        for row in &report.customers {
            for score in [row.r_score, row.f_score, row.m_score] {
                assert!((1..=5).contains(&score));
            }
            assert!(labels.contains(&row.segment));
        }
        let counted: usize = report.segment_counts.iter().map(|s| s.customers).sum();
        assert_eq!(counted, report.customers.len());
    }
}

#[test]
fn unmatched_country_yields_zero_kpis_and_no_customers() {
    let records = shop();
    let engine = AnalyticsEngine::default();
    let filter = FilterState::all().with_country("Atlantis");

    assert_eq!(engine.compute(&records, &filter).unwrap(), KpiSummary::default());
    assert!(engine.segment(&records, &filter, None).unwrap().is_empty());
}

#[test]
fn repeated_runs_are_identical() {
    let records = shop();
    let engine = AnalyticsEngine::default();

    for filter in filters() {
        let first = engine.dashboard(&records, &filter, None).unwrap();
        let second = engine.dashboard(&records, &filter, None).unwrap();
        assert_eq!(first, second);
    }
}

#[test]
fn scores_follow_the_filtered_population() {
    let records = shop();
    let engine = AnalyticsEngine::default();

    let everyone = engine.segment(&records, &FilterState::all(), None).unwrap();
    let france = engine
        .segment(&records, &FilterState::all().with_country("France"), None)
        .unwrap();

    // France holds a subset of customers, scored only against each other.
    assert!(france.len() < everyone.len());
    let top_m = france.iter().map(|r| r.m_score).max().unwrap();
    assert_eq!(top_m, 5);
}
