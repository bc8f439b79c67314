mod account;
mod errors;
mod recipient;
mod result;
mod session;
mod transfer;

pub use account::{Account, AccountKind};
pub use errors::ModelError;
pub use recipient::{Beneficiary, BeneficiaryCategory, Recipient};
pub use result::TransferResult;
pub use session::SessionContext;
pub use transfer::{
    Execution, ExecutionMode, RecurringFrequency, TransferDetails, TransferDraft, TransferRequest,
    TransferSummary
};
