use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;
use tracing::debug;

use crate::models::{TransferRequest, TransferResult};
use crate::processing::{ProcessingError, Processor};

const DEFAULT_DELAY: Duration = Duration::from_millis(1500);

/// Books transfers after a fixed delay, standing in for backend latency.
///
/// Like a real ledger it refuses a debit the source account cannot cover.
#[derive(Debug, Clone)]
pub struct SimulatedProcessor {
    delay: Duration
}

impl SimulatedProcessor {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

}

impl Default for SimulatedProcessor {
    fn default() -> Self {
        Self::new(DEFAULT_DELAY)
    }
}

impl Processor for SimulatedProcessor {
    fn submit(&self, request: TransferRequest) -> impl Future<Output = Result<TransferResult, ProcessingError>> + Send {
        let delay = self.delay;

        async move {
            sleep(delay).await;

            let remaining = request.source.available_balance.checked_sub(request.summary.total)
                .filter(|remaining| !remaining.is_negative());

            if remaining.is_none() {
                return Err(ProcessingError::Rejected {
                    reason: format!("Account [{}] cannot cover {}", request.source.id, request.summary.total)
                })
            }

            debug!("Transfer of {} from [{}] to [{}] processed after {delay:?}", request.summary.total, request.source.id, request.recipient.name());
            Ok(TransferResult::confirmed(&request))
        }
    }
}
