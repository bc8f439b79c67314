use serde::Deserialize;
use std::fmt;
use std::fmt::{Display, Formatter};

use crate::models::errors::ModelError;
use crate::types::{AccountId, Money};

#[derive(Debug, Clone, Copy, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    Checking,
    Savings,
    Business
}

impl Display for AccountKind {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            AccountKind::Checking => "checking",
            AccountKind::Savings => "savings",
            AccountKind::Business => "business"
        };
        write!(formatter, "{name}")
    }
}

/// An account held by the signed-in user.
///
/// Accounts are the only valid transfer sources, and double as recipients when
/// money moves between the user's own accounts.
#[derive(Debug, Clone, Eq, PartialEq, Deserialize)]
pub struct Account {
    /// Opaque identifier, unique within the account set.
    pub id: AccountId,
    /// Display label.
    pub name: String,
    pub kind: AccountKind,
    /// Display-only masked account number.
    #[serde(rename = "number")]
    pub masked_number: String,
    /// Booked balance.
    pub balance: Money,
    /// Funds usable for a transfer; never above `balance`.
    #[serde(rename = "available")]
    pub available_balance: Money
}

impl Account {
    /// Creates an account whose full balance is available.
    pub fn new(id: impl Into<AccountId>, name: impl Into<String>, kind: AccountKind, masked_number: impl Into<String>, balance: Money) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            masked_number: masked_number.into(),
            balance,
            available_balance: balance
        }
    }

    pub fn with_available_balance(mut self, available_balance: Money) -> Self {
        self.available_balance = available_balance;
        self
    }

    /// Verifies `0 <= available_balance <= balance`.
    pub fn check(&self) -> Result<(), ModelError> {
        if self.available_balance.is_negative() {
            return Err(ModelError::negative_available_balance(self))
        }

        if self.available_balance > self.balance {
            return Err(ModelError::available_exceeds_balance(self))
        }

        Ok(())
    }
}
