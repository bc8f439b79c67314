use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::models::{Account, Execution, ExecutionMode, Recipient, RecurringFrequency, TransferDetails, TransferDraft};
use crate::rules::{fees, FieldError, TransferPolicy};
use crate::types::Money;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Field {
    Amount,
    Reference,
    ScheduledDate,
    RecurringFrequency
}

impl Display for Field {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Amount => "amount",
            Field::Reference => "reference",
            Field::ScheduledDate => "scheduled_date",
            Field::RecurringFrequency => "recurring_frequency"
        };
        write!(formatter, "{name}")
    }
}

/// Field name to error. Empty means the draft is valid.
pub type FieldErrors = BTreeMap<Field, FieldError>;

/// What a draft is checked against: the chosen accounts, the current date and the policy.
#[derive(Debug, Clone, Copy)]
pub struct ValidationContext<'a> {
    pub source: &'a Account,
    pub recipient: &'a Recipient,
    pub today: NaiveDate,
    pub policy: &'a TransferPolicy
}

/// Runs every rule over the draft and reports all failing fields together.
///
/// At most one error is kept per field. For the amount, `InvalidAmount` wins over
/// `InsufficientFunds`, which wins over `LimitExceeded`.
pub fn validate(draft: &TransferDraft, context: &ValidationContext<'_>) -> Result<TransferDetails, FieldErrors> {
    let mut errors = FieldErrors::new();

    let amount = record(&mut errors, Field::Amount, check_amount(&draft.amount, context));
    let reference = record(&mut errors, Field::Reference, check_reference(&draft.reference, context.policy));
    let execution = record(&mut errors, Field::ScheduledDate, check_execution(draft, context.today));
    let recurrence = record(&mut errors, Field::RecurringFrequency, check_recurrence(draft));

    match (amount, reference, execution, recurrence) {
        (Some(amount), Some(reference), Some(execution), Some(recurrence)) => Ok(TransferDetails {
            amount,
            reference,
            execution,
            recurrence
        }),
        _ => Err(errors)
    }
}

fn record<T>(errors: &mut FieldErrors, field: Field, outcome: Result<T, FieldError>) -> Option<T> {
    match outcome {
        Ok(value) => Some(value),
        Err(error) => {
            errors.insert(field, error);
            None
        }
    }
}

fn check_amount(raw: &str, context: &ValidationContext<'_>) -> Result<Money, FieldError> {
    let amount = Money::from_str(raw).map_err(|_| FieldError::InvalidAmount)?;

    if !amount.is_positive() {
        return Err(FieldError::InvalidAmount)
    }

    let fee = fees::compute_fee(context.recipient, amount, context.policy);
    let total = fees::compute_total(amount, fee).ok_or(FieldError::InvalidAmount)?;

    if total > context.source.available_balance {
        return Err(FieldError::InsufficientFunds)
    }

    if amount > context.policy.daily_limit {
        return Err(FieldError::LimitExceeded)
    }

    Ok(amount)
}

fn check_reference(raw: &str, policy: &TransferPolicy) -> Result<String, FieldError> {
    let reference = raw.trim();

    if reference.is_empty() {
        return Err(FieldError::MissingReference)
    }

    if reference.chars().count() > policy.reference_max_length {
        return Err(FieldError::ReferenceTooLong)
    }

    Ok(reference.to_string())
}

fn check_execution(draft: &TransferDraft, today: NaiveDate) -> Result<Execution, FieldError> {
    if draft.execution_mode == ExecutionMode::Immediate {
        return Ok(Execution::Immediate)
    }

    let raw = draft.scheduled_date.as_deref()
        .map(str::trim)
        .filter(|date| !date.is_empty())
        .ok_or(FieldError::MissingDate)?;

    let date = NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| FieldError::InvalidDate)?;

    if date < today {
        return Err(FieldError::DateInPast)
    }

    Ok(Execution::Scheduled(date))
}

fn check_recurrence(draft: &TransferDraft) -> Result<Option<RecurringFrequency>, FieldError> {
    if !draft.is_recurring {
        return Ok(None)
    }

    draft.recurring_frequency.map(Some).ok_or(FieldError::MissingFrequency)
}
