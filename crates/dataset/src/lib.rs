//! # Shoplens Dataset Crate
//!
//! Reads order line items from a delimited file and turns them into typed
//! `OrderRecord`s. This is the only place that knows about column names and
//! textual date or number formats.
//!
//! Rows with missing or malformed critical fields are skipped, never fatal;
//! each is reported as a `RejectedRow` with its line number and reason.
//!
//! ## Public API
//!
//! - `load_orders`: Reads an order file from disk.
//! - `read_orders`: Reads orders from any `std::io::Read`.
//! - `LoadOutcome`: The accepted records plus the rejected rows.
//! - `DatasetError`: Errors that abort a load (I/O, missing columns, ...).

pub mod error;
pub mod loader;
pub mod schema;

pub use error::DatasetError;
pub use loader::{load_orders, read_orders, LoadOutcome, RejectReason, RejectedRow};
pub use schema::{ColumnIndex, PriceSource};
