use crate::report::{CategoryTotal, ChartSeries, TrendPoint};
use configuration::SeriesSettings;
use core_types::{Granularity, OrderRecord};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};

/// Builds every chart series from an already-filtered record set.
pub fn build(records: &[&OrderRecord], settings: &SeriesSettings) -> ChartSeries {
    let country_limit = (settings.top_countries > 0).then_some(settings.top_countries);

    ChartSeries {
        trend: sales_trend(records, settings.granularity, settings.fill_gaps),
        top_products: top_products(records, settings.top_products),
        by_country: sales_by_country(records, country_limit),
    }
}

/// Sales per period in ascending order.
///
/// With `fill_gaps`, every period between the first and the last sale is
/// present, periods without sales carrying zero.
pub fn sales_trend(
    records: &[&OrderRecord],
    granularity: Granularity,
    fill_gaps: bool,
) -> Vec<TrendPoint> {
    let mut totals: BTreeMap<_, Decimal> = BTreeMap::new();
    for record in records {
        *totals
            .entry(granularity.period_start(record.order_date))
            .or_default() += record.line_total();
    }

    let bounds = totals.keys().next().copied().zip(totals.keys().next_back().copied());
    if let (true, Some((first, last))) = (fill_gaps, bounds) {
        let mut period = first;
        while period < last {
            let Some(next) = granularity.next_period(period) else {
                break;
            };
            totals.entry(next).or_default();
            period = next;
        }
    }

    totals
        .into_iter()
        .map(|(period, sales)| TrendPoint { period, sales })
        .collect()
}

/// The `limit` best-selling products.
pub fn top_products(records: &[&OrderRecord], limit: usize) -> Vec<CategoryTotal> {
    ranked_totals(records, |r| r.product.as_str(), Some(limit))
}

/// Sales per country, best first; `None` keeps every country.
pub fn sales_by_country(records: &[&OrderRecord], limit: Option<usize>) -> Vec<CategoryTotal> {
    ranked_totals(records, |r| r.country.as_str(), limit)
}

/// Groups sales by `key`, sorts descending by total with ascending label as
/// the tie-break, then truncates.
fn ranked_totals<F>(records: &[&OrderRecord], key: F, limit: Option<usize>) -> Vec<CategoryTotal>
where
    F: Fn(&OrderRecord) -> &str,
{
    let mut totals: HashMap<&str, Decimal> = HashMap::new();
    for record in records {
        *totals.entry(key(*record)).or_default() += record.line_total();
    }

    let mut ranked: Vec<CategoryTotal> = totals
        .into_iter()
        .map(|(label, sales)| CategoryTotal {
            label: label.to_string(),
            sales,
        })
        .collect();
    ranked.sort_by(|a, b| b.sales.cmp(&a.sales).then_with(|| a.label.cmp(&b.label)));

    if let Some(limit) = limit {
        ranked.truncate(limit);
    }
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn line(day: NaiveDate, amount: Decimal, country: &str, product: &str) -> OrderRecord {
        OrderRecord::new("C1", "O1", day, 1, amount, country, product).unwrap()
    }

    fn sample() -> Vec<OrderRecord> {
        vec![
            line(date(2024, 1, 3), dec!(30), "France", "Mug"),
            line(date(2024, 1, 1), dec!(10), "Germany", "Lamp"),
            line(date(2024, 1, 3), dec!(5), "Germany", "Desk"),
            line(date(2024, 2, 10), dec!(30), "Spain", "Lamp"),
        ]
    }

    #[test]
    fn daily_trend_is_ascending_and_fills_gaps() {
        let records = sample();
        let refs: Vec<_> = records.iter().collect();
        let trend = sales_trend(&refs, Granularity::Day, true);

        assert_eq!(trend.first().unwrap().period, date(2024, 1, 1));
        assert_eq!(trend.last().unwrap().period, date(2024, 2, 10));
        // 31 days of January plus 10 of February.
        assert_eq!(trend.len(), 41);
        assert_eq!(trend[1], TrendPoint { period: date(2024, 1, 2), sales: Decimal::ZERO });
        assert_eq!(trend[2].sales, dec!(35));
    }

    #[test]
    fn sparse_trend_skips_empty_days() {
        let records = sample();
        let refs: Vec<_> = records.iter().collect();
        let trend = sales_trend(&refs, Granularity::Day, false);
        let periods: Vec<_> = trend.iter().map(|p| p.period).collect();
        assert_eq!(periods, vec![date(2024, 1, 1), date(2024, 1, 3), date(2024, 2, 10)]);
    }

    #[test]
    fn monthly_trend_groups_by_first_day() {
        let records = sample();
        let refs: Vec<_> = records.iter().collect();
        let trend = sales_trend(&refs, Granularity::Month, true);
        assert_eq!(
            trend,
            vec![
                TrendPoint { period: date(2024, 1, 1), sales: dec!(45) },
                TrendPoint { period: date(2024, 2, 1), sales: dec!(30) },
            ]
        );
    }

    #[test]
    fn top_products_ranks_and_truncates() {
        let records = sample();
        let refs: Vec<_> = records.iter().collect();
        let top = top_products(&refs, 2);

        assert_eq!(top.len(), 2);
        assert_eq!(top[0], CategoryTotal { label: "Lamp".to_string(), sales: dec!(40) });
        assert_eq!(top[1], CategoryTotal { label: "Mug".to_string(), sales: dec!(30) });
    }

    #[test]
    fn equal_totals_are_ordered_by_label() {
        let records = sample();
        let refs: Vec<_> = records.iter().collect();
        let countries = sales_by_country(&refs, None);
        let labels: Vec<_> = countries.iter().map(|c| c.label.as_str()).collect();

        // France and Spain both sold 30.
        assert_eq!(labels, vec!["France", "Spain", "Germany"]);
    }

    #[test]
    fn empty_input_gives_empty_series() {
        let series = build(&[], &SeriesSettings::default());
        assert_eq!(series, ChartSeries::default());
    }
}
