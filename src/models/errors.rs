use crate::models::Account;
use crate::types::AccountId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Available balance of account [{account_id}] is negative")]
    NegativeAvailableBalance {
        account_id: AccountId
    },
    #[error("Available balance of account [{account_id}] exceeds its booked balance")]
    AvailableExceedsBalance {
        account_id: AccountId
    }
}

impl ModelError {
    pub fn negative_available_balance(account: &Account) -> Self {
        Self::NegativeAvailableBalance { account_id: account.id.clone() }
    }

    pub fn available_exceeds_balance(account: &Account) -> Self {
        Self::AvailableExceedsBalance { account_id: account.id.clone() }
    }
}
