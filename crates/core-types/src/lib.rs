pub mod enums;
pub mod error;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::Granularity;
pub use error::CoreError;
pub use structs::{checked_line_total, DateRange, FilterState, OrderRecord, LINE_TOTAL_DP, MAX_LINE_TOTAL};
