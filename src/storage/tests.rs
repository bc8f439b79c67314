use super::policy_file::load_policy;
use super::{policy_from_dir, Directory, DirectoryError, SeedDirectory};
use crate::models::{Account, AccountKind, Recipient};
use crate::rules::TransferPolicy;
use crate::types::Money;
use anyhow::{anyhow, Result};
use std::fs;
use std::str::FromStr;
use std::time::Duration;
use tempfile::tempdir;

const ACCOUNTS_CSV: &str = "id,name,kind,number,balance,available
acc-1,Main Checking,checking,****4521,2450.75,2450.75
acc-2, Savings Account ,savings,****8834,15750.00,15000.5";

const BENEFICIARIES_CSV: &str = "id,name,iban,bank,category,verified,favorite
ben-1,Maria Schmidt,DE89370400440532013000,Commerzbank,personal,true,true
ben-2,Acme Supplies GmbH,DE44500105175407324931,Sparkasse,business,false,false";

#[test]
fn test_directory_loads_seed_csv() -> Result<()> {
    let directory = SeedDirectory::from_csv(ACCOUNTS_CSV.as_bytes(), BENEFICIARIES_CSV.as_bytes())?;

    let savings = directory.account("acc-2").ok_or_else(|| anyhow!("Account acc-2 missing"))?;

    assert_eq!(savings.name, "Savings Account");
    assert_eq!(savings.kind, AccountKind::Savings);
    assert_eq!(savings.balance.to_string(), "15750.00");
    assert_eq!(savings.available_balance.to_string(), "15000.50");
    assert_eq!(directory.accounts().len(), 2);
    assert_eq!(directory.recipients().len(), 4);

    Ok(())
}

#[test]
fn test_directory_resolves_recipient_variants() -> Result<()> {
    let directory = SeedDirectory::from_csv(ACCOUNTS_CSV.as_bytes(), BENEFICIARIES_CSV.as_bytes())?;

    assert!(matches!(directory.recipient("acc-1"), Some(Recipient::Internal(_))));
    assert!(matches!(directory.recipient("ben-2"), Some(Recipient::External(_))));
    assert!(directory.recipient("missing").is_none());
    assert!(directory.account("ben-1").is_none());

    Ok(())
}

#[test]
fn test_directory_lists_accounts_before_beneficiaries_in_id_order() -> Result<()> {
    let directory = SeedDirectory::demo()?;

    let ids: Vec<String> = directory.recipients().iter().map(|recipient| recipient.id().to_string()).collect();

    assert_eq!(ids, vec!["acc-1", "acc-2", "acc-3", "ben-1", "ben-2", "ben-3"]);

    Ok(())
}

#[test]
fn test_directory_rejects_duplicate_identifiers() -> Result<()> {
    let directory = SeedDirectory::demo()?;
    let duplicate = Account::new("ben-1", "Clash", AccountKind::Checking, "****0000", Money::ZERO);

    assert!(matches!(directory.insert_account(duplicate), Err(DirectoryError::DuplicateId(id)) if id == "ben-1"));

    Ok(())
}

#[test]
fn test_directory_rejects_inconsistent_balances() -> Result<()> {
    let accounts = "id,name,kind,number,balance,available\nacc-1,Main,checking,****4521,10.00,20.00";
    let result = SeedDirectory::from_csv(accounts.as_bytes(), "id,name,iban,bank,category,verified,favorite".as_bytes());

    assert!(matches!(result, Err(DirectoryError::InvalidAccount(_))));

    let directory = SeedDirectory::new();
    let negative = Account::new("acc-9", "Main", AccountKind::Checking, "****0001", Money::from_str("-1")?);

    assert!(directory.insert_account(negative).is_err());

    Ok(())
}

#[test]
fn test_directory_rejects_malformed_amounts() {
    let accounts = "id,name,kind,number,balance,available\nacc-1,Main,checking,****4521,10.001,10.001";
    let result = SeedDirectory::from_csv(accounts.as_bytes(), "id,name,iban,bank,category,verified,favorite".as_bytes());

    assert!(matches!(result, Err(DirectoryError::Csv(_))));
}

#[test]
fn test_directory_loads_from_seed_folder() -> Result<()> {
    let folder = tempdir()?;
    fs::write(folder.path().join("accounts.csv"), ACCOUNTS_CSV)?;
    fs::write(folder.path().join("recipients.csv"), BENEFICIARIES_CSV)?;

    let directory = SeedDirectory::from_dir(folder.path())?;

    assert_eq!(directory.accounts().len(), 2);
    assert!(matches!(SeedDirectory::from_dir(&folder.path().join("missing")), Err(DirectoryError::Io(_))));

    Ok(())
}

#[test]
fn test_policy_file_overrides_only_given_columns() -> Result<()> {
    let csv = "daily_limit,fee_threshold,flat_fee,security_threshold,security_code,lockout_attempts,lockout_seconds
5000.00,,1.00,,654321,3,45";

    let policy = load_policy(csv.as_bytes())?;
    let defaults = TransferPolicy::default();

    assert_eq!(policy.daily_limit.to_string(), "5000.00");
    assert_eq!(policy.fee_threshold, defaults.fee_threshold);
    assert_eq!(policy.flat_fee.to_string(), "1.00");
    assert_eq!(policy.security_threshold, defaults.security_threshold);
    assert_eq!(policy.security_code, "654321");
    assert_eq!(policy.lockout.map(|lockout| (lockout.max_attempts, lockout.cooldown)), Some((3, Duration::from_secs(45))));

    Ok(())
}

#[test]
fn test_policy_file_rejects_zero_lockout_attempts() {
    let csv = "daily_limit,lockout_attempts\n,0";

    assert!(matches!(load_policy(csv.as_bytes()), Err(DirectoryError::InvalidPolicy(_))));
}

#[test]
fn test_policy_defaults_when_seed_folder_has_no_policy() -> Result<()> {
    let folder = tempdir()?;

    assert_eq!(policy_from_dir(folder.path())?, TransferPolicy::default());

    fs::write(folder.path().join("policy.csv"), "security_code,lockout_attempts\n999999,2")?;
    let policy = policy_from_dir(folder.path())?;

    assert_eq!(policy.security_code, "999999");
    assert_eq!(policy.lockout.map(|lockout| lockout.cooldown), Some(Duration::from_secs(30)));

    Ok(())
}
