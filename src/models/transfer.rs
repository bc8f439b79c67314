use chrono::NaiveDate;
use serde::Deserialize;
use std::fmt;
use std::fmt::{Display, Formatter};

use crate::models::{Account, Recipient};
use crate::types::Money;

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    #[default]
    Immediate,
    Scheduled
}

impl Display for ExecutionMode {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionMode::Immediate => write!(formatter, "immediate"),
            ExecutionMode::Scheduled => write!(formatter, "scheduled")
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurringFrequency {
    Weekly,
    Monthly,
    Quarterly,
    Yearly
}

impl Display for RecurringFrequency {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecurringFrequency::Weekly => "weekly",
            RecurringFrequency::Monthly => "monthly",
            RecurringFrequency::Quarterly => "quarterly",
            RecurringFrequency::Yearly => "yearly"
        };
        write!(formatter, "{name}")
    }
}

/// The details form exactly as the user filled it in.
///
/// Nothing here is trusted; it only becomes [`TransferDetails`] after validation.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct TransferDraft {
    pub amount: String,
    pub reference: String,
    pub execution_mode: ExecutionMode,
    /// `YYYY-MM-DD`, only read for scheduled transfers.
    pub scheduled_date: Option<String>,
    pub is_recurring: bool,
    pub recurring_frequency: Option<RecurringFrequency>
}

impl TransferDraft {
    pub fn immediate(amount: impl Into<String>, reference: impl Into<String>) -> Self {
        Self {
            amount: amount.into(),
            reference: reference.into(),
            ..Self::default()
        }
    }

    pub fn scheduled_on(mut self, date: impl Into<String>) -> Self {
        self.execution_mode = ExecutionMode::Scheduled;
        self.scheduled_date = Some(date.into());
        self
    }

    pub fn recurring(mut self, frequency: Option<RecurringFrequency>) -> Self {
        self.is_recurring = true;
        self.recurring_frequency = frequency;
        self
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Execution {
    Immediate,
    Scheduled(NaiveDate)
}

impl Execution {
    pub fn mode(&self) -> ExecutionMode {
        match self {
            Execution::Immediate => ExecutionMode::Immediate,
            Execution::Scheduled(_) => ExecutionMode::Scheduled
        }
    }
}

/// A validated transfer payload.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TransferDetails {
    pub amount: Money,
    /// Trimmed, 1 to 140 characters.
    pub reference: String,
    pub execution: Execution,
    pub recurrence: Option<RecurringFrequency>
}

/// Amount, fee and total debit shown on the review step.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct TransferSummary {
    pub amount: Money,
    pub fee: Money,
    pub total: Money
}

/// Everything needed to execute a confirmed transfer.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TransferRequest {
    pub source: Account,
    pub recipient: Recipient,
    pub details: TransferDetails,
    pub summary: TransferSummary
}
