use chrono::{DateTime, Utc};
use std::fmt;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

use crate::models::{Execution, TransferRequest};
use crate::types::Money;

const REFERENCE_PREFIX: &str = "TRF";
const REFERENCE_LENGTH: usize = 10;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum TransferStatus {
    Confirmed
}

impl Display for TransferStatus {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            TransferStatus::Confirmed => write!(formatter, "confirmed")
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ProcessingEstimate {
    Minutes,
    BusinessDays
}

impl From<Execution> for ProcessingEstimate {
    fn from(execution: Execution) -> Self {
        match execution {
            Execution::Immediate => ProcessingEstimate::Minutes,
            Execution::Scheduled(_) => ProcessingEstimate::BusinessDays
        }
    }
}

impl Display for ProcessingEstimate {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ProcessingEstimate::Minutes => write!(formatter, "minutes"),
            ProcessingEstimate::BusinessDays => write!(formatter, "1–2 business days")
        }
    }
}

/// Terminal record of a confirmed transfer. Immutable once built.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TransferResult {
    pub id: Uuid,
    /// Short human-readable transaction code, e.g. `TRF3FA91C02BE`.
    pub reference: String,
    pub status: TransferStatus,
    pub estimated_processing_time: ProcessingEstimate,
    pub amount: Money,
    pub fee: Money,
    pub total: Money,
    pub created_at: DateTime<Utc>
}

impl TransferResult {
    /// Builds the confirmation record for an accepted request.
    pub fn confirmed(request: &TransferRequest) -> Self {
        let id = Uuid::new_v4();

        Self {
            id,
            reference: reference_code(&id),
            status: TransferStatus::Confirmed,
            estimated_processing_time: ProcessingEstimate::from(request.details.execution),
            amount: request.summary.amount,
            fee: request.summary.fee,
            total: request.summary.total,
            created_at: Utc::now()
        }
    }
}

fn reference_code(id: &Uuid) -> String {
    let code: String = id.simple().to_string().chars().take(REFERENCE_LENGTH).collect();
    format!("{REFERENCE_PREFIX}{}", code.to_ascii_uppercase())
}
