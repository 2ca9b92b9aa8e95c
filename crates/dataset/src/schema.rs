use crate::error::DatasetError;
use configuration::ColumnMap;
use csv::StringRecord;

/// Where a row's unit price comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceSource {
    /// A per-unit price column.
    UnitPrice(usize),
    /// A line-total column; the unit price is `amount / quantity`.
    Amount(usize),
}

/// Positions of the configured columns within a header row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnIndex {
    pub order_id: usize,
    pub order_date: usize,
    pub customer_id: usize,
    pub quantity: usize,
    pub price: PriceSource,
    pub country: Option<usize>,
    pub product: Option<usize>,
}

impl ColumnIndex {
    /// Matches `headers` against the configured names, case-insensitively.
    pub fn resolve(headers: &StringRecord, columns: &ColumnMap) -> Result<Self, DatasetError> {
        if headers.iter().all(|h| normalize(h).is_empty()) {
            return Err(DatasetError::EmptyHeader);
        }

        let find = |name: &str| {
            headers
                .iter()
                .position(|h| normalize(h).eq_ignore_ascii_case(name.trim()))
        };
        let require = |name: &str| find(name).ok_or_else(|| DatasetError::MissingColumn(name.to_string()));

        let price = match (find(&columns.unit_price), find(&columns.amount)) {
            (Some(i), _) => PriceSource::UnitPrice(i),
            (None, Some(i)) => PriceSource::Amount(i),
            (None, None) => {
                return Err(DatasetError::MissingColumn(format!(
                    "{}' or '{}",
                    columns.unit_price, columns.amount
                )));
            }
        };

        Ok(Self {
            order_id: require(&columns.order_id)?,
            order_date: require(&columns.order_date)?,
            customer_id: require(&columns.customer_id)?,
            quantity: require(&columns.quantity)?,
            price,
            country: find(&columns.country),
            product: find(&columns.product),
        })
    }
}

fn normalize(header: &str) -> &str {
    header.trim_start_matches('\u{feff}').trim()
}
