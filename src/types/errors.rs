use std::num::ParseIntError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MoneyError {
    #[error("Money error: {0}")]
    InvalidFormat(String),
    #[error("Money error: {0}")]
    ParseInt(#[from] ParseIntError),
    #[error("Money error: Value has too many decimal places: {0}")]
    Precision(String),
    #[error("Money error: Overflow")]
    Overflow
}
