use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    #[error("Invalid order record: {0}")]
    InvalidRecord(String),
}
