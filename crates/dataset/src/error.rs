use thiserror::Error;

/// Failures that prevent a file from being loaded at all.
///
/// Problems with individual rows are not errors; they are reported as
/// [`crate::RejectedRow`]s and the load carries on.
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Failed to open order file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read CSV data: {0}")]
    Csv(#[from] csv::Error),

    #[error("The order file has no header row.")]
    EmptyHeader,

    #[error("Required column '{0}' is missing from the header.")]
    MissingColumn(String),

    #[error("Invalid dataset settings: {0}")]
    InvalidSettings(String),
}
