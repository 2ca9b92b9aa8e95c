use crate::report::FilterOptions;
use core_types::{CoreError, FilterState, OrderRecord};
use std::collections::BTreeSet;

/// Returns the records that satisfy every predicate of `filter`, in input order.
///
/// The filter is validated first; an ambiguous filter is an error rather than
/// a best-effort match.
pub fn apply_filter<'a>(
    records: &'a [OrderRecord],
    filter: &FilterState,
) -> Result<Vec<&'a OrderRecord>, CoreError> {
    filter.validate()?;

    if filter.is_unrestricted() {
        return Ok(records.iter().collect());
    }

    Ok(records.iter().filter(|r| matches(r, filter)).collect())
}

/// Whether a single record passes `filter`. Does not validate the filter.
pub fn matches(record: &OrderRecord, filter: &FilterState) -> bool {
    let country_ok =
        filter.countries.is_empty() || filter.countries.iter().any(|c| *c == record.country);
    let product_ok =
        filter.products.is_empty() || filter.products.iter().any(|p| *p == record.product);
    let date_ok = filter
        .date_range
        .is_none_or(|range| range.contains(record.order_date));

    country_ok && product_ok && date_ok
}

/// Collects the distinct countries and products and the date bounds of `records`.
pub fn filter_options(records: &[OrderRecord]) -> FilterOptions {
    let countries: BTreeSet<&str> = records.iter().map(|r| r.country.as_str()).collect();
    let products: BTreeSet<&str> = records.iter().map(|r| r.product.as_str()).collect();

    FilterOptions {
        countries: countries.into_iter().map(String::from).collect(),
        products: products.into_iter().map(String::from).collect(),
        first_order_date: records.iter().map(|r| r.order_date).min(),
        last_order_date: records.iter().map(|r| r.order_date).max(),
    }
}
