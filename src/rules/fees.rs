use crate::models::{Recipient, TransferSummary};
use crate::rules::TransferPolicy;
use crate::types::Money;

/// Fee charged for a transfer. Own-account transfers are always free.
pub fn compute_fee(recipient: &Recipient, amount: Money, policy: &TransferPolicy) -> Money {
    match recipient {
        Recipient::Internal(_) => Money::ZERO,
        Recipient::External(_) if amount > policy.fee_threshold => policy.flat_fee,
        Recipient::External(_) => Money::ZERO
    }
}

/// Total debit for the source account; `None` on overflow.
pub fn compute_total(amount: Money, fee: Money) -> Option<Money> {
    amount.checked_add(fee)
}

pub fn summarize(recipient: &Recipient, amount: Money, policy: &TransferPolicy) -> Option<TransferSummary> {
    let fee = compute_fee(recipient, amount, policy);
    let total = compute_total(amount, fee)?;

    Some(TransferSummary { amount, fee, total })
}
