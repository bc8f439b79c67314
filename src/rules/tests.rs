use super::fees::{compute_fee, compute_total, summarize};
use super::security::requires_security_code;
use super::policy::DEFAULT_SECURITY_CODE;
use super::validation::{validate, Field};
use super::{FieldError, FieldErrors, SecurityError, SecurityGate, TransferPolicy, ValidationContext};

use anyhow::{anyhow, Result};
use chrono::{Days, NaiveDate};
use std::str::FromStr;
use std::time::{Duration, Instant};

use crate::models::{Account, AccountKind, Beneficiary, BeneficiaryCategory, Execution, RecurringFrequency, Recipient, TransferDraft};
use crate::types::Money;

fn today() -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(2026, 5, 20).ok_or_else(|| anyhow!("invalid date"))
}

fn create_account(id: &str, available: &str) -> Result<Account> {
    Ok(Account::new(id, "Main Checking", AccountKind::Checking, "****4521", Money::from_str(available)?))
}

fn own_recipient() -> Result<Recipient> {
    Ok(Recipient::Internal(Account::new("acc-2", "Savings", AccountKind::Savings, "****8834", Money::from_str("15000")?)))
}

fn external_recipient() -> Recipient {
    Recipient::External(Beneficiary {
        id: "ben-1".to_string(),
        name: "Maria Schmidt".to_string(),
        iban: "DE89370400440532013000".to_string(),
        bank_name: "Commerzbank".to_string(),
        category: BeneficiaryCategory::Personal,
        verified: true,
        favorite: false
    })
}

fn money(value: &str) -> Result<Money> {
    Ok(Money::from_str(value)?)
}

fn field_errors(draft: &TransferDraft, context: &ValidationContext<'_>) -> FieldErrors {
    validate(draft, context).err().unwrap_or_default()
}

#[test]
fn test_fee_is_zero_for_own_accounts_regardless_of_amount() -> Result<()> {
    let policy = TransferPolicy::default();
    let recipient = own_recipient()?;

    for amount in ["0.01", "1000", "1000.01", "9999.99"] {
        assert_eq!(compute_fee(&recipient, money(amount)?, &policy), Money::ZERO);
    }

    Ok(())
}

#[test]
fn test_fee_applies_to_external_transfers_above_threshold() -> Result<()> {
    let policy = TransferPolicy::default();
    let recipient = external_recipient();

    assert_eq!(compute_fee(&recipient, money("1000")?, &policy), Money::ZERO);
    assert_eq!(compute_fee(&recipient, money("1000.01")?, &policy).to_string(), "2.50");
    assert_eq!(compute_fee(&recipient, money("1500")?, &policy), compute_fee(&recipient, money("1500")?, &policy));

    Ok(())
}

#[test]
fn test_total_adds_fee_to_amount() -> Result<()> {
    let summary = summarize(&external_recipient(), money("1500")?, &TransferPolicy::default())
        .ok_or_else(|| anyhow!("summary overflowed"))?;

    assert_eq!(summary.fee.to_string(), "2.50");
    assert_eq!(summary.total.to_string(), "1502.50");
    assert!(compute_total(Money::from_minor(i64::MAX), Money::from_minor(1)).is_none());

    Ok(())
}

#[test]
fn test_security_code_requirement() -> Result<()> {
    let policy = TransferPolicy::default();

    assert!(!requires_security_code(money("100")?, &own_recipient()?, &policy));
    assert!(!requires_security_code(money("1000")?, &own_recipient()?, &policy));
    assert!(requires_security_code(money("1000.01")?, &own_recipient()?, &policy));
    assert!(requires_security_code(money("1")?, &external_recipient(), &policy));

    Ok(())
}

#[test]
fn test_valid_draft_produces_details_and_no_errors() -> Result<()> {
    let policy = TransferPolicy::default();
    let source = create_account("acc-1", "2450.75")?;
    let recipient = own_recipient()?;
    let context = ValidationContext { source: &source, recipient: &recipient, today: today()?, policy: &policy };
    let draft = TransferDraft::immediate("100,00", "  Rent  ");

    let details = validate(&draft, &context).map_err(|errors| anyhow!("{errors:?}"))?;

    assert_eq!(details.amount.to_string(), "100.00");
    assert_eq!(details.reference, "Rent");
    assert_eq!(details.execution, Execution::Immediate);
    assert!(field_errors(&draft, &context).is_empty());

    Ok(())
}

#[test]
fn test_amount_errors() -> Result<()> {
    let policy = TransferPolicy::default();
    let rich = create_account("acc-1", "50000")?;
    let poor = create_account("acc-1", "50")?;
    let recipient = own_recipient()?;
    let today = today()?;

    let test_cases = vec![
        (&rich, "abc", FieldError::InvalidAmount),
        (&rich, "0", FieldError::InvalidAmount),
        (&rich, "-5", FieldError::InvalidAmount),
        (&rich, "10.001", FieldError::InvalidAmount),
        (&poor, "100", FieldError::InsufficientFunds),
        (&rich, "10000.01", FieldError::LimitExceeded),
    ];

    for (source, amount, expected) in test_cases {
        let context = ValidationContext { source, recipient: &recipient, today, policy: &policy };
        let errors = field_errors(&TransferDraft::immediate(amount, "Rent"), &context);

        assert_eq!(errors.len(), 1, "amount {amount}");
        assert_eq!(errors.get(&Field::Amount), Some(&expected), "amount {amount}");
    }

    Ok(())
}

#[test]
fn test_insufficient_funds_accounts_for_external_fee() -> Result<()> {
    let policy = TransferPolicy::default();
    let source = create_account("acc-1", "1501")?;
    let recipient = external_recipient();
    let context = ValidationContext { source: &source, recipient: &recipient, today: today()?, policy: &policy };

    let errors = field_errors(&TransferDraft::immediate("1500", "Invoice"), &context);

    assert_eq!(errors.get(&Field::Amount), Some(&FieldError::InsufficientFunds));

    Ok(())
}

#[test]
fn test_reference_errors() -> Result<()> {
    let policy = TransferPolicy::default();
    let source = create_account("acc-1", "2450.75")?;
    let recipient = own_recipient()?;
    let context = ValidationContext { source: &source, recipient: &recipient, today: today()?, policy: &policy };

    let blank = field_errors(&TransferDraft::immediate("10", "   "), &context);
    let long = field_errors(&TransferDraft::immediate("10", "x".repeat(141)), &context);
    let limit = field_errors(&TransferDraft::immediate("10", "é".repeat(140)), &context);

    assert_eq!(blank.get(&Field::Reference), Some(&FieldError::MissingReference));
    assert_eq!(long.get(&Field::Reference), Some(&FieldError::ReferenceTooLong));
    assert!(limit.is_empty());

    Ok(())
}

#[test]
fn test_scheduled_date_errors() -> Result<()> {
    let policy = TransferPolicy::default();
    let source = create_account("acc-1", "2450.75")?;
    let recipient = own_recipient()?;
    let today = today()?;
    let yesterday = today.checked_sub_days(Days::new(1)).ok_or_else(|| anyhow!("invalid date"))?;
    let context = ValidationContext { source: &source, recipient: &recipient, today, policy: &policy };

    let mut missing = TransferDraft::immediate("10", "Rent").scheduled_on("");
    missing.scheduled_date = None;

    let past = field_errors(&TransferDraft::immediate("10", "Rent").scheduled_on(yesterday.to_string()), &context);
    let malformed = field_errors(&TransferDraft::immediate("10", "Rent").scheduled_on("20/05/2026"), &context);
    let blank = field_errors(&TransferDraft::immediate("10", "Rent").scheduled_on("  "), &context);

    assert_eq!(past.len(), 1);
    assert_eq!(past.get(&Field::ScheduledDate), Some(&FieldError::DateInPast));
    assert_eq!(malformed.get(&Field::ScheduledDate), Some(&FieldError::InvalidDate));
    assert_eq!(blank.get(&Field::ScheduledDate), Some(&FieldError::MissingDate));
    assert_eq!(field_errors(&missing, &context).get(&Field::ScheduledDate), Some(&FieldError::MissingDate));

    let same_day = validate(&TransferDraft::immediate("10", "Rent").scheduled_on(today.to_string()), &context)
        .map_err(|errors| anyhow!("{errors:?}"))?;

    assert_eq!(same_day.execution, Execution::Scheduled(today));

    Ok(())
}

#[test]
fn test_immediate_transfer_ignores_stale_date_input() -> Result<()> {
    let policy = TransferPolicy::default();
    let source = create_account("acc-1", "2450.75")?;
    let recipient = own_recipient()?;
    let context = ValidationContext { source: &source, recipient: &recipient, today: today()?, policy: &policy };

    let mut draft = TransferDraft::immediate("10", "Rent");
    draft.scheduled_date = Some("1999-01-01".to_string());

    assert!(field_errors(&draft, &context).is_empty());

    Ok(())
}

#[test]
fn test_recurring_transfers_require_a_frequency() -> Result<()> {
    let policy = TransferPolicy::default();
    let source = create_account("acc-1", "2450.75")?;
    let recipient = own_recipient()?;
    let context = ValidationContext { source: &source, recipient: &recipient, today: today()?, policy: &policy };

    let missing = field_errors(&TransferDraft::immediate("10", "Rent").recurring(None), &context);
    let monthly = validate(&TransferDraft::immediate("10", "Rent").recurring(Some(RecurringFrequency::Monthly)), &context)
        .map_err(|errors| anyhow!("{errors:?}"))?;

    assert_eq!(missing.get(&Field::RecurringFrequency), Some(&FieldError::MissingFrequency));
    assert_eq!(monthly.recurrence, Some(RecurringFrequency::Monthly));

    Ok(())
}

#[test]
fn test_all_failing_fields_are_reported_together() -> Result<()> {
    let policy = TransferPolicy::default();
    let source = create_account("acc-1", "2450.75")?;
    let recipient = own_recipient()?;
    let context = ValidationContext { source: &source, recipient: &recipient, today: today()?, policy: &policy };

    let draft = TransferDraft::immediate("", "").scheduled_on("").recurring(None);
    let errors = field_errors(&draft, &context);

    assert_eq!(errors.len(), 4);
    assert_eq!(errors.get(&Field::Amount), Some(&FieldError::InvalidAmount));
    assert_eq!(errors.get(&Field::Reference), Some(&FieldError::MissingReference));
    assert_eq!(errors.get(&Field::ScheduledDate), Some(&FieldError::MissingDate));
    assert_eq!(errors.get(&Field::RecurringFrequency), Some(&FieldError::MissingFrequency));

    assert_eq!(field_errors(&draft, &context), errors);

    Ok(())
}

#[test]
fn test_security_gate_accepts_the_configured_code() {
    let policy = TransferPolicy::default();
    let mut gate = SecurityGate::new();

    assert_eq!(gate.verify(Some(DEFAULT_SECURITY_CODE), &policy, Instant::now()), Ok(()));
    assert_eq!(gate.verify(Some(" 123456 "), &policy, Instant::now()), Ok(()));
}

#[test]
fn test_security_gate_rejects_missing_and_wrong_codes_without_lockout() {
    let policy = TransferPolicy::default();
    let mut gate = SecurityGate::new();
    let now = Instant::now();

    assert_eq!(gate.verify(None, &policy, now), Err(SecurityError::InvalidSecurityCode));

    for _ in 0..10 {
        assert_eq!(gate.verify(Some("000000"), &policy, now), Err(SecurityError::InvalidSecurityCode));
    }

    assert_eq!(gate.verify(Some("123456"), &policy, now), Ok(()));
}

#[test]
fn test_security_gate_does_not_count_missing_codes_towards_lockout() {
    let policy = TransferPolicy::default().with_security_lockout(2, Duration::from_secs(30));
    let mut gate = SecurityGate::new();
    let now = Instant::now();

    for input in [None, Some(""), Some("   ")] {
        assert_eq!(gate.verify(input, &policy, now), Err(SecurityError::InvalidSecurityCode));
    }

    assert_eq!(gate.verify(Some("000000"), &policy, now), Err(SecurityError::InvalidSecurityCode));
    assert_eq!(gate.verify(Some("123456"), &policy, now), Ok(()));
    assert_eq!(gate.verify(Some("000000"), &policy, now), Err(SecurityError::InvalidSecurityCode));
}

#[test]
fn test_security_gate_locks_after_repeated_failures_and_recovers_after_cooldown() {
    let cooldown = Duration::from_secs(30);
    let policy = TransferPolicy::default().with_security_lockout(3, cooldown);
    let mut gate = SecurityGate::new();
    let start = Instant::now();

    assert_eq!(gate.verify(Some("1"), &policy, start), Err(SecurityError::InvalidSecurityCode));
    assert_eq!(gate.verify(Some("2"), &policy, start), Err(SecurityError::InvalidSecurityCode));
    assert_eq!(gate.verify(Some("3"), &policy, start), Err(SecurityError::LockedOut { retry_after: cooldown }));

    let during = start + Duration::from_secs(10);

    assert_eq!(gate.verify(Some("123456"), &policy, during), Err(SecurityError::LockedOut { retry_after: Duration::from_secs(20) }));

    let after = start + cooldown;

    assert_eq!(gate.verify(Some("123456"), &policy, after), Ok(()));
}

#[test]
fn test_security_gate_with_unbounded_cooldown_stays_locked() {
    let policy = TransferPolicy::default().with_security_lockout(1, Duration::MAX);
    let mut gate = SecurityGate::new();
    let now = Instant::now();

    assert_eq!(gate.verify(Some("000000"), &policy, now), Err(SecurityError::LockedOut { retry_after: Duration::MAX }));
    assert_eq!(gate.verify(Some("123456"), &policy, now + Duration::from_secs(86_400)), Err(SecurityError::LockedOut { retry_after: Duration::MAX }));
}

#[test]
fn test_policy_builders_override_defaults() -> Result<()> {
    let policy = TransferPolicy::default()
        .with_daily_limit(money("500")?)
        .with_fee(money("100")?, money("1.00")?)
        .with_security_threshold(money("50")?)
        .with_security_code("654321");

    let source = create_account("acc-1", "10000")?;
    let recipient = external_recipient();
    let context = ValidationContext { source: &source, recipient: &recipient, today: today()?, policy: &policy };

    assert_eq!(field_errors(&TransferDraft::immediate("600", "Rent"), &context).get(&Field::Amount), Some(&FieldError::LimitExceeded));
    assert_eq!(compute_fee(&recipient, money("101")?, &policy).to_string(), "1.00");
    assert!(requires_security_code(money("51")?, &own_recipient()?, &policy));
    assert_eq!(SecurityGate::new().verify(Some("654321"), &policy, Instant::now()), Ok(()));

    Ok(())
}
