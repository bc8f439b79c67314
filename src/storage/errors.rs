use crate::models::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("Seed file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Seed CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    InvalidAccount(#[from] ModelError),
    #[error("Identifier [{0}] is used more than once")]
    DuplicateId(String),
    #[error("Invalid transfer policy: {0}")]
    InvalidPolicy(String)
}
