use crate::models::{Account, AccountKind, Beneficiary, BeneficiaryCategory, Recipient};
use crate::storage::{Directory, DirectoryError};
use crate::types::{AccountId, Money, RecipientId};
use csv::{ReaderBuilder, Trim};
use dashmap::DashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

pub const ACCOUNTS_FILE: &str = "accounts.csv";
pub const BENEFICIARIES_FILE: &str = "recipients.csv";

/// In-memory directory seeded once at start-up.
pub struct SeedDirectory {
    accounts: DashMap<AccountId, Account>,
    beneficiaries: DashMap<RecipientId, Beneficiary>
}

impl SeedDirectory {
    pub fn new() -> Self {
        Self {
            accounts: DashMap::new(),
            beneficiaries: DashMap::new()
        }
    }

    /// The mock accounts and beneficiaries the demo portal ships with.
    pub fn demo() -> Result<Self, DirectoryError> {
        let directory = Self::new();

        directory.insert_account(Account::new("acc-1", "Main Checking", AccountKind::Checking, "****4521", Money::from_minor(245_075)))?;
        directory.insert_account(Account::new("acc-2", "Savings Account", AccountKind::Savings, "****8834", Money::from_minor(1_575_000)))?;
        directory.insert_account(
            Account::new("acc-3", "Business Account", AccountKind::Business, "****2290", Money::from_minor(892_050))
                .with_available_balance(Money::from_minor(842_050))
        )?;

        directory.insert_beneficiary(Beneficiary {
            id: "ben-1".to_string(),
            name: "Maria Schmidt".to_string(),
            iban: "DE89370400440532013000".to_string(),
            bank_name: "Commerzbank".to_string(),
            category: BeneficiaryCategory::Personal,
            verified: true,
            favorite: true
        })?;
        directory.insert_beneficiary(Beneficiary {
            id: "ben-2".to_string(),
            name: "Thomas Müller".to_string(),
            iban: "DE12500105170648489890".to_string(),
            bank_name: "Deutsche Bank".to_string(),
            category: BeneficiaryCategory::Personal,
            verified: true,
            favorite: false
        })?;
        directory.insert_beneficiary(Beneficiary {
            id: "ben-3".to_string(),
            name: "Acme Supplies GmbH".to_string(),
            iban: "DE44500105175407324931".to_string(),
            bank_name: "Sparkasse".to_string(),
            category: BeneficiaryCategory::Business,
            verified: false,
            favorite: false
        })?;

        Ok(directory)
    }

    /// Loads `accounts.csv` and `recipients.csv` from a directory.
    pub fn from_dir(path: &Path) -> Result<Self, DirectoryError> {
        let accounts = BufReader::new(File::open(path.join(ACCOUNTS_FILE))?);
        let beneficiaries = BufReader::new(File::open(path.join(BENEFICIARIES_FILE))?);

        Self::from_csv(accounts, beneficiaries)
    }

    /// Any malformed row or inconsistent account rejects the whole seed.
    pub fn from_csv<A: Read, B: Read>(accounts: A, beneficiaries: B) -> Result<Self, DirectoryError> {
        let directory = Self::new();

        for account in ReaderBuilder::new().trim(Trim::All).from_reader(accounts).deserialize::<Account>() {
            directory.insert_account(account?)?;
        }

        for beneficiary in ReaderBuilder::new().trim(Trim::All).from_reader(beneficiaries).deserialize::<Beneficiary>() {
            directory.insert_beneficiary(beneficiary?)?;
        }

        Ok(directory)
    }

    pub fn insert_account(&self, account: Account) -> Result<(), DirectoryError> {
        account.check()?;

        if self.accounts.contains_key(&account.id) || self.beneficiaries.contains_key(&account.id) {
            return Err(DirectoryError::DuplicateId(account.id))
        }

        self.accounts.insert(account.id.clone(), account);

        Ok(())
    }

    pub fn insert_beneficiary(&self, beneficiary: Beneficiary) -> Result<(), DirectoryError> {
        if self.accounts.contains_key(&beneficiary.id) || self.beneficiaries.contains_key(&beneficiary.id) {
            return Err(DirectoryError::DuplicateId(beneficiary.id))
        }

        self.beneficiaries.insert(beneficiary.id.clone(), beneficiary);

        Ok(())
    }
}

impl Directory for SeedDirectory {
    fn account(&self, account_id: &str) -> Option<Account> {
        self.accounts.get(account_id).map(|entry| entry.value().clone())
    }

    fn recipient(&self, recipient_id: &str) -> Option<Recipient> {
        if let Some(account) = self.account(recipient_id) {
            return Some(Recipient::Internal(account))
        }

        self.beneficiaries.get(recipient_id).map(|entry| Recipient::External(entry.value().clone()))
    }

    fn accounts(&self) -> Vec<Account> {
        let mut accounts: Vec<Account> = self.accounts.iter().map(|entry| entry.value().clone()).collect();
        accounts.sort_by(|left, right| left.id.cmp(&right.id));
        accounts
    }

    fn recipients(&self) -> Vec<Recipient> {
        let mut beneficiaries: Vec<Beneficiary> = self.beneficiaries.iter().map(|entry| entry.value().clone()).collect();
        beneficiaries.sort_by(|left, right| left.id.cmp(&right.id));

        self.accounts().into_iter()
            .map(Recipient::Internal)
            .chain(beneficiaries.into_iter().map(Recipient::External))
            .collect()
    }
}
