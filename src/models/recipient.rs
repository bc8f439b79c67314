use serde::Deserialize;
use std::fmt;
use std::fmt::{Display, Formatter};

use crate::models::Account;
use crate::types::RecipientId;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BeneficiaryCategory {
    Personal,
    Business
}

impl Display for BeneficiaryCategory {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            BeneficiaryCategory::Personal => write!(formatter, "personal"),
            BeneficiaryCategory::Business => write!(formatter, "business")
        }
    }
}

/// A third party saved in the user's address book, identified by IBAN.
#[derive(Debug, Clone, Eq, PartialEq, Deserialize)]
pub struct Beneficiary {
    pub id: RecipientId,
    pub name: String,
    pub iban: String,
    #[serde(rename = "bank")]
    pub bank_name: String,
    pub category: BeneficiaryCategory,
    pub verified: bool,
    pub favorite: bool
}

impl Beneficiary {
    /// IBAN in upper case, grouped by four characters.
    pub fn formatted_iban(&self) -> String {
        let compact: Vec<char> = self.iban.chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| c.to_ascii_uppercase())
            .collect();

        compact.chunks(4)
            .map(|group| group.iter().collect::<String>())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Destination of a transfer.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Recipient {
    /// Another account owned by the same user.
    Internal(Account),
    External(Beneficiary)
}

impl Recipient {
    pub fn id(&self) -> &str {
        match self {
            Recipient::Internal(account) => &account.id,
            Recipient::External(beneficiary) => &beneficiary.id
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Recipient::Internal(account) => &account.name,
            Recipient::External(beneficiary) => &beneficiary.name
        }
    }

    pub fn is_own(&self) -> bool {
        matches!(self, Recipient::Internal(_))
    }

    pub fn is_favorite(&self) -> bool {
        match self {
            Recipient::Internal(_) => false,
            Recipient::External(beneficiary) => beneficiary.favorite
        }
    }
}
