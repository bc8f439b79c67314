mod simulated;

use std::future::Future;

use thiserror::Error;

use crate::models::{TransferRequest, TransferResult};

pub use simulated::SimulatedProcessor;

#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum ProcessingError {
    #[error("Transfer was rejected: {reason}")]
    Rejected {
        reason: String
    }
}

/// Executes a confirmed transfer. The only place where a real backend call would go.
pub trait Processor: Send + Sync + 'static {
    fn submit(&self, request: TransferRequest) -> impl Future<Output = Result<TransferResult, ProcessingError>> + Send;
}
