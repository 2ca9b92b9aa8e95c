use crate::error::DatasetError;
use crate::schema::{ColumnIndex, PriceSource};
use chrono::{NaiveDate, NaiveDateTime};
use configuration::DatasetSettings;
use core_types::{checked_line_total, CoreError, OrderRecord};
use csv::StringRecord;
use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use serde::Serialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

/// Value used for the optional text columns when the column or the cell is empty.
pub const UNKNOWN: &str = "Unknown";

/// Time suffixes accepted after any configured date format.
const TIME_SUFFIXES: [&str; 2] = [" %H:%M:%S", " %H:%M"];

/// Why a row was skipped.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
pub enum RejectReason {
    #[error("malformed CSV record: {0}")]
    Malformed(String),

    #[error("missing value for '{0}'")]
    MissingField(String),

    #[error("unparsable date '{0}'")]
    InvalidDate(String),

    #[error("invalid quantity '{0}'")]
    InvalidQuantity(String),

    #[error("invalid price '{0}'")]
    InvalidPrice(String),

    #[error("{0}")]
    InvalidRecord(String),
}

impl From<CoreError> for RejectReason {
    fn from(err: CoreError) -> Self {
        RejectReason::InvalidRecord(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedRow {
    /// 1-based line number in the source file, when known.
    pub line: Option<u64>,
    pub reason: RejectReason,
}

/// The result of a load: every accepted record and every skipped row.
#[derive(Debug, Clone, Default)]
pub struct LoadOutcome {
    pub records: Vec<OrderRecord>,
    pub rejected: Vec<RejectedRow>,
}

impl LoadOutcome {
    pub fn rows_read(&self) -> usize {
        self.records.len() + self.rejected.len()
    }

    pub fn skipped(&self) -> usize {
        self.rejected.len()
    }
}

/// Loads the order file at `path`.
pub fn load_orders(path: &Path, settings: &DatasetSettings) -> Result<LoadOutcome, DatasetError> {
    let file = File::open(path).map_err(|source| DatasetError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let outcome = read_orders(file, settings)?;
    tracing::info!(
        path = %path.display(),
        rows = outcome.rows_read(),
        accepted = outcome.records.len(),
        skipped = outcome.skipped(),
        "Order file loaded."
    );
    Ok(outcome)
}

/// Reads orders from `reader`, which must start with a header row.
pub fn read_orders<R: Read>(reader: R, settings: &DatasetSettings) -> Result<LoadOutcome, DatasetError> {
    let delimiter = u8::try_from(settings.delimiter).map_err(|_| {
        DatasetError::InvalidSettings(format!(
            "delimiter '{}' is not a single-byte character",
            settings.delimiter
        ))
    })?;

    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let index = ColumnIndex::resolve(&headers, &settings.columns)?;
    tracing::debug!(?index, "Resolved order file columns.");

    let mut outcome = LoadOutcome::default();
    for result in csv_reader.records() {
        let (line, parsed) = match result {
            Ok(row) => (
                row.position().map(|p| p.line()),
                parse_row(&row, &index, &settings.date_formats),
            ),
            Err(e) => (
                e.position().map(|p| p.line()),
                Err(RejectReason::Malformed(e.to_string())),
            ),
        };

        match parsed {
            Ok(record) => outcome.records.push(record),
            Err(reason) => {
                tracing::warn!(line = ?line, %reason, "Skipping order row.");
                outcome.rejected.push(RejectedRow { line, reason });
            }
        }
    }

    Ok(outcome)
}

fn parse_row(
    row: &StringRecord,
    index: &ColumnIndex,
    date_formats: &[String],
) -> Result<OrderRecord, RejectReason> {
    let field = |i: usize| row.get(i).map(str::trim).filter(|v| !v.is_empty());
    let required = |i: usize, name: &str| {
        field(i).ok_or_else(|| RejectReason::MissingField(name.to_string()))
    };

    let order_id = required(index.order_id, "order id")?;
    let customer_id = required(index.customer_id, "customer id")?;
    let raw_date = required(index.order_date, "order date")?;
    let order_date = parse_date(raw_date, date_formats)
        .ok_or_else(|| RejectReason::InvalidDate(raw_date.to_string()))?;

    let raw_quantity = required(index.quantity, "quantity")?;
    let quantity = parse_quantity(raw_quantity)
        .ok_or_else(|| RejectReason::InvalidQuantity(raw_quantity.to_string()))?;

    let (raw_price, unit_price) = match index.price {
        PriceSource::UnitPrice(i) => {
            let raw = required(i, "unit price")?;
            (raw, parse_money(raw))
        }
        PriceSource::Amount(i) => {
            let raw = required(i, "amount")?;
            let price =
                parse_money(raw).and_then(|amount| unit_price_from_amount(amount, quantity));
            (raw, price)
        }
    };
    // The line total must stay within the bound every later sum relies on.
    let unit_price = unit_price
        .filter(|price| checked_line_total(quantity, *price).is_some())
        .ok_or_else(|| RejectReason::InvalidPrice(raw_price.to_string()))?;

    let text = |column: Option<usize>| column.and_then(field).unwrap_or(UNKNOWN);

    Ok(OrderRecord::new(
        customer_id,
        order_id,
        order_date,
        quantity,
        unit_price,
        text(index.country),
        text(index.product),
    )?)
}

/// Parses a date with the first matching format, ignoring any time of day.
fn parse_date(raw: &str, formats: &[String]) -> Option<NaiveDate> {
    formats.iter().find_map(|format| {
        NaiveDate::parse_from_str(raw, format).ok().or_else(|| {
            TIME_SUFFIXES.iter().find_map(|suffix| {
                NaiveDateTime::parse_from_str(raw, &format!("{}{}", format, suffix))
                    .ok()
                    .map(|dt| dt.date())
            })
        })
    })
}

/// Accepts whole numbers, including decimal spellings such as `3.0`.
fn parse_quantity(raw: &str) -> Option<u32> {
    if let Ok(q) = raw.parse::<u32>() {
        return Some(q);
    }
    let value = Decimal::from_str(raw).ok()?;
    if value.fract().is_zero() { value.to_u32() } else { None }
}

/// Parses a non-negative amount, tolerating a leading `$`.
fn parse_money(raw: &str) -> Option<Decimal> {
    let cleaned = raw.trim_start_matches('$').trim();
    let value = Decimal::from_str(cleaned)
        .or_else(|_| Decimal::from_scientific(cleaned))
        .ok()?;
    (value >= Decimal::ZERO).then_some(value)
}

/// A line of zero items can only carry a zero amount.
fn unit_price_from_amount(amount: Decimal, quantity: u32) -> Option<Decimal> {
    if quantity == 0 {
        return amount.is_zero().then_some(Decimal::ZERO);
    }
    amount.checked_div(Decimal::from(quantity))
}
