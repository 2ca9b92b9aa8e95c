use chrono::NaiveDate;
use configuration::error::ConfigError;
use core_types::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    /// The filter is ambiguous (e.g. a reversed date range or a blank value).
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Analysis date {requested} is before the latest order on {latest}")]
    InvalidAnalysisDate {
        requested: NaiveDate,
        latest: NaiveDate,
    },

    #[error("Invalid analytics configuration: {0}")]
    Config(#[from] ConfigError),
}
