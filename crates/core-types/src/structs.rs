use crate::error::CoreError;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The largest line total a record may carry, 10^15.
///
/// With every line at or below this bound, sums over any in-memory dataset
/// stay far inside the `Decimal` range.
pub const MAX_LINE_TOTAL: Decimal = Decimal::from_parts(2_764_472_320, 232_830, 0, false, 0);

/// Decimal places kept in a line total.
pub const LINE_TOTAL_DP: u32 = 12;

/// A single product line of an order.
///
/// One order (`order_id`) may span several records, one per product bought.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub customer_id: String,
    pub order_id: String,
    pub order_date: NaiveDate,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub country: String,
    pub product: String,
}

impl OrderRecord {
    /// Builds a record, rejecting blank identifiers, negative prices and line
    /// totals above [`MAX_LINE_TOTAL`].
    pub fn new(
        customer_id: impl Into<String>,
        order_id: impl Into<String>,
        order_date: NaiveDate,
        quantity: u32,
        unit_price: Decimal,
        country: impl Into<String>,
        product: impl Into<String>,
    ) -> Result<Self, CoreError> {
        let customer_id = customer_id.into();
        let order_id = order_id.into();

        if customer_id.trim().is_empty() {
            return Err(CoreError::InvalidRecord("customer id is blank".to_string()));
        }
        if order_id.trim().is_empty() {
            return Err(CoreError::InvalidRecord("order id is blank".to_string()));
        }
        if unit_price < Decimal::ZERO {
            return Err(CoreError::InvalidRecord(format!(
                "unit price {} is negative",
                unit_price
            )));
        }
        if checked_line_total(quantity, unit_price).is_none() {
            return Err(CoreError::InvalidRecord(format!(
                "line total of {} x {} exceeds {}",
                quantity, unit_price, MAX_LINE_TOTAL
            )));
        }

        Ok(Self {
            customer_id,
            order_id,
            order_date,
            quantity,
            unit_price,
            country: country.into(),
            product: product.into(),
        })
    }

    /// The revenue of this line: `quantity × unit_price`, rounded to
    /// [`LINE_TOTAL_DP`] places with trailing zeros dropped.
    pub fn line_total(&self) -> Decimal {
        (Decimal::from(self.quantity) * self.unit_price)
            .round_dp(LINE_TOTAL_DP)
            .normalize()
    }
}

/// `quantity × unit_price`, or `None` when it overflows or exceeds [`MAX_LINE_TOTAL`].
pub fn checked_line_total(quantity: u32, unit_price: Decimal) -> Option<Decimal> {
    Decimal::from(quantity)
        .checked_mul(unit_price)
        .filter(|total| *total <= MAX_LINE_TOTAL)
}

/// An inclusive range of order dates.
///
/// The bounds are private so that `start <= end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawDateRange")]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

#[derive(Deserialize)]
struct RawDateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl TryFrom<RawDateRange> for DateRange {
    type Error = CoreError;

    fn try_from(raw: RawDateRange) -> Result<Self, Self::Error> {
        DateRange::new(raw.start, raw.end)
    }
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, CoreError> {
        if start > end {
            return Err(CoreError::InvalidFilter(format!(
                "date range start {} is after end {}",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// The interactive filter selection of the dashboard.
///
/// Every populated field is a predicate and all predicates must hold. An empty
/// list places no restriction on that field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    #[serde(default)]
    pub countries: Vec<String>,
    #[serde(default)]
    pub products: Vec<String>,
    #[serde(default)]
    pub date_range: Option<DateRange>,
}

impl FilterState {
    /// A filter that keeps every record.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.countries.push(country.into());
        self
    }

    pub fn with_product(mut self, product: impl Into<String>) -> Self {
        self.products.push(product.into());
        self
    }

    pub fn with_date_range(mut self, range: DateRange) -> Self {
        self.date_range = Some(range);
        self
    }

    /// Checks that no predicate is ambiguous.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.countries.iter().any(|c| c.trim().is_empty()) {
            return Err(CoreError::InvalidFilter("country must not be blank".to_string()));
        }
        if self.products.iter().any(|p| p.trim().is_empty()) {
            return Err(CoreError::InvalidFilter("product must not be blank".to_string()));
        }
        Ok(())
    }

    pub fn is_unrestricted(&self) -> bool {
        self.countries.is_empty() && self.products.is_empty() && self.date_range.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn line_total_multiplies_quantity_and_price() {
        let record =
            OrderRecord::new("C1", "INV-1", date(2024, 1, 5), 3, dec!(12.50), "France", "Mug")
                .unwrap();
        assert_eq!(record.line_total(), dec!(37.50));
    }

    #[test]
    fn record_rejects_blank_ids_and_negative_prices() {
        let d = date(2024, 1, 5);
        assert!(OrderRecord::new(" ", "INV-1", d, 1, dec!(1), "FR", "Mug").is_err());
        assert!(OrderRecord::new("C1", "", d, 1, dec!(1), "FR", "Mug").is_err());
        assert!(OrderRecord::new("C1", "INV-1", d, 1, dec!(-0.01), "FR", "Mug").is_err());
        assert!(OrderRecord::new("C1", "INV-1", d, 0, dec!(0), "FR", "Mug").is_ok());
    }

    #[test]
    fn record_rejects_line_totals_above_the_bound() {
        let d = date(2024, 1, 5);
        let huge = Decimal::MAX;
        let err = OrderRecord::new("C1", "INV-1", d, 2, huge, "FR", "Mug").unwrap_err();
        assert!(matches!(err, CoreError::InvalidRecord(_)));

        assert!(OrderRecord::new("C1", "INV-1", d, 1, MAX_LINE_TOTAL, "FR", "Mug").is_ok());
        assert!(OrderRecord::new("C1", "INV-1", d, 2, MAX_LINE_TOTAL, "FR", "Mug").is_err());
        // Zero items carry no revenue whatever the price.
        assert!(OrderRecord::new("C1", "INV-1", d, 0, huge, "FR", "Mug").is_ok());
    }

    #[test]
    fn line_total_drops_division_noise() {
        let price = dec!(10) / dec!(3);
        let record = OrderRecord::new("C1", "INV-1", date(2024, 1, 5), 3, price, "FR", "Mug").unwrap();
        assert_eq!(record.line_total().to_string(), "10");
    }

    #[test]
    fn date_range_rejects_reversed_bounds() {
        let err = DateRange::new(date(2024, 2, 1), date(2024, 1, 1)).unwrap_err();
        assert!(matches!(err, CoreError::InvalidFilter(_)));

        let single_day = DateRange::new(date(2024, 1, 1), date(2024, 1, 1)).unwrap();
        assert!(single_day.contains(date(2024, 1, 1)));
        assert!(!single_day.contains(date(2024, 1, 2)));
    }

    #[test]
    fn date_range_deserialization_is_validated() {
        let ok: Result<DateRange, _> =
            serde_json::from_str(r#"{"start":"2024-01-01","end":"2024-01-31"}"#);
        assert!(ok.is_ok());

        let reversed: Result<DateRange, _> =
            serde_json::from_str(r#"{"start":"2024-02-01","end":"2024-01-31"}"#);
        assert!(reversed.is_err());
    }

    #[test]
    fn blank_filter_values_are_invalid() {
        assert!(FilterState::all().with_country("Germany").validate().is_ok());
        assert!(FilterState::all().with_country("  ").validate().is_err());
        assert!(FilterState::all().with_product("").validate().is_err());
    }
}
