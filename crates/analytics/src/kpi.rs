use crate::report::KpiSummary;
use core_types::OrderRecord;
use rust_decimal::Decimal;
use std::collections::HashSet;

/// Computes the headline KPIs of an already-filtered record set.
///
/// Every record's line total is bounded by `MAX_LINE_TOTAL`, so the running
/// sum cannot overflow for any dataset that fits in memory.
pub fn summarize(records: &[&OrderRecord]) -> KpiSummary {
    let mut orders = HashSet::new();
    let mut customers = HashSet::new();
    let mut total_sales = Decimal::ZERO;

    for record in records {
        total_sales += record.line_total();
        orders.insert(record.order_id.as_str());
        customers.insert(record.customer_id.as_str());
    }

    let order_count = orders.len();
    let avg_order_value = if order_count > 0 {
        total_sales / Decimal::from(order_count)
    } else {
        Decimal::ZERO
    };

    KpiSummary {
        total_sales,
        order_count,
        customer_count: customers.len(),
        avg_order_value,
    }
}
