use crate::rules::{FieldErrors, SecurityError};
use crate::types::{AccountId, RecipientId};
use crate::wizard::Step;
use thiserror::Error;

#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum WizardError {
    #[error("Requirements of step [{step}] are not met")]
    GuardFailed {
        step: Step
    },
    #[error("The review step is left only by confirming the transfer")]
    ConfirmRequired,
    #[error("Confirmation requires the review step, current step is [{step}]")]
    NotReviewing {
        step: Step
    },
    #[error("Recipient [{recipient_id}] is the selected source account")]
    SelfTransfer {
        recipient_id: RecipientId
    },
    #[error("No source account is selected")]
    MissingSource,
    #[error("No recipient is selected")]
    MissingRecipient,
    #[error("Transfer details have not been validated")]
    MissingDetails,
    #[error("Transfer details are invalid: {0:?}")]
    Validation(FieldErrors),
    #[error(transparent)]
    Security(#[from] SecurityError),
    #[error("Transfer total overflowed")]
    Overflow,
    #[error("Another operation is still pending")]
    Busy,
    #[error("No operation is pending")]
    NotPending,
    #[error("The transfer is completed, start a new one")]
    Completed,
    #[error("Account [{0}] was not found")]
    UnknownAccount(AccountId),
    #[error("Recipient [{0}] was not found")]
    UnknownRecipient(RecipientId),
    #[error("Processing failed: {0}")]
    Processing(String),
    #[error("The wizard is no longer running")]
    Closed
}
