//! # Shoplens Analytics Engine
//!
//! This crate computes everything the sales dashboard shows: headline KPIs,
//! the grouped series behind its charts, and RFM customer segmentation.
//!
//! ## Architectural Principles
//!
//! - **Pure Logic:** No I/O. It depends only on `core-types` for its inputs
//!   and on `configuration` for the series shape and segment rule table.
//! - **Stateless Calculation:** Every query filters the full record set and
//!   recomputes from scratch. Quantile boundaries in particular always come
//!   from the current filtered population.
//!
//! ## Public API
//!
//! - `AnalyticsEngine`: `compute`, `series`, `segment`, `segmentation_report`,
//!   `dashboard` and `filter_options`.
//! - `KpiSummary`, `ChartSeries`, `CustomerRfm`, `SegmentationReport`,
//!   `DashboardReport`: the result structs.
//! - `AnalyticsError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod engine;
pub mod error;
pub mod filter;
pub mod kpi;
pub mod report;
pub mod rfm;
pub mod scoring;
pub mod segments;
pub mod series;

// Re-export the key components to create a clean, public-facing API.
pub use engine::AnalyticsEngine;
pub use error::AnalyticsError;
pub use report::{
    CategoryTotal, ChartSeries, CustomerRfm, DashboardReport, FilterOptions, KpiSummary,
    ScoreCount, SegmentCount, SegmentationReport, TrendPoint,
};
pub use segments::SegmentRules;
