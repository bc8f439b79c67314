use chrono::NaiveDate;
use std::time::Instant;
use tracing::{debug, info};

use crate::models::{Account, Recipient, TransferDetails, TransferDraft, TransferRequest, TransferResult, TransferSummary};
use crate::rules::{fees, security, validation, FieldErrors, SecurityGate, TransferPolicy, ValidationContext};
use crate::wizard::{Step, WizardError};

/// Everything collected by one walk through the transfer wizard.
///
/// Moving backwards never clears collected data, so stepping forward again shows
/// the previous inputs.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct WizardState {
    pub current_step: Step,
    pub source_account: Option<Account>,
    pub recipient: Option<Recipient>,
    /// Last details form as typed, kept even when it failed validation.
    pub draft: Option<TransferDraft>,
    /// Present only when the last validation of `draft` succeeded.
    pub transfer_details: Option<TransferDetails>,
    pub field_errors: FieldErrors,
    /// A confirmation is being processed.
    pub pending: bool,
    pub result: Option<TransferResult>
}

/// Step flow controller for the money transfer wizard.
///
/// All operations are synchronous and leave the state untouched when they fail.
#[derive(Debug, Clone)]
pub struct Wizard {
    state: WizardState,
    policy: TransferPolicy,
    gate: SecurityGate,
    /// Scheduled dates are validated against this day.
    today: NaiveDate
}

impl Wizard {
    pub fn new(policy: TransferPolicy, today: NaiveDate) -> Self {
        Self {
            state: WizardState::default(),
            policy,
            gate: SecurityGate::new(),
            today
        }
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn current_step(&self) -> Step {
        self.state.current_step
    }

    /// Selects the account to debit. Does not advance.
    ///
    /// A recipient equal to the new source is dropped, and any stored details are
    /// validated again against the new available balance.
    pub fn select_source(&mut self, account: Account) -> Result<(), WizardError> {
        self.ensure_editable()?;

        if self.state.recipient.as_ref().is_some_and(|recipient| recipient.id() == account.id) {
            debug!("Recipient [{}] cleared, it is now the source account", account.id);
            self.state.recipient = None;
        }

        self.state.source_account = Some(account);
        self.revalidate();

        Ok(())
    }

    /// Selects the destination. The source account itself is refused.
    pub fn set_recipient(&mut self, recipient: Recipient) -> Result<(), WizardError> {
        self.ensure_editable()?;

        if self.state.source_account.as_ref().is_some_and(|source| source.id == recipient.id()) {
            return Err(WizardError::SelfTransfer { recipient_id: recipient.id().to_string() })
        }

        self.state.recipient = Some(recipient);
        self.revalidate();

        Ok(())
    }

    /// Validates and stores the details form.
    ///
    /// # Errors
    /// `Validation` carries the field errors, which are also kept in the state for
    /// display. Previously validated details are discarded in that case.
    pub fn set_transfer_details(&mut self, draft: TransferDraft) -> Result<(), WizardError> {
        self.ensure_editable()?;

        let source = self.state.source_account.as_ref().ok_or(WizardError::MissingSource)?;
        let recipient = self.state.recipient.as_ref().ok_or(WizardError::MissingRecipient)?;
        let context = ValidationContext {
            source,
            recipient,
            today: self.today,
            policy: &self.policy
        };

        let outcome = validation::validate(&draft, &context);
        self.state.draft = Some(draft);

        match outcome {
            Ok(details) => {
                self.state.transfer_details = Some(details);
                self.state.field_errors.clear();
                Ok(())
            }
            Err(errors) => {
                self.state.transfer_details = None;
                self.state.field_errors = errors.clone();
                self.clamp_step();
                Err(WizardError::Validation(errors))
            }
        }
    }

    /// Whether the current step's requirements hold.
    pub fn can_advance(&self) -> bool {
        self.state.current_step != Step::ReviewConfirm && self.guard(self.state.current_step)
    }

    /// Moves one step forward when the current step's requirements hold.
    pub fn advance(&mut self) -> Result<Step, WizardError> {
        self.ensure_editable()?;

        let step = self.state.current_step;

        if step == Step::ReviewConfirm {
            return Err(WizardError::ConfirmRequired)
        }

        if !self.guard(step) {
            debug!("Advance from step [{step}] refused");
            return Err(WizardError::GuardFailed { step })
        }

        self.state.current_step = step.next();

        Ok(self.state.current_step)
    }

    /// Moves one step back, never below the first. Keeps all collected data.
    pub fn retreat(&mut self) -> Result<Step, WizardError> {
        self.ensure_editable()?;

        self.state.current_step = self.state.current_step.previous();

        Ok(self.state.current_step)
    }

    /// Amount, fee and total for the current selection.
    pub fn summary(&self) -> Option<TransferSummary> {
        let recipient = self.state.recipient.as_ref()?;
        let details = self.state.transfer_details.as_ref()?;

        fees::summarize(recipient, details.amount, &self.policy)
    }

    pub fn requires_security_code(&self) -> Option<bool> {
        let recipient = self.state.recipient.as_ref()?;
        let details = self.state.transfer_details.as_ref()?;

        Some(security::requires_security_code(details.amount, recipient, &self.policy))
    }

    /// Recipients selectable for the current source, favourites first.
    pub fn eligible_recipients<'a>(&self, recipients: &'a [Recipient]) -> Vec<&'a Recipient> {
        let source_id = self.state.source_account.as_ref().map(|account| account.id.as_str());
        let mut eligible: Vec<&Recipient> = recipients.iter()
            .filter(|recipient| Some(recipient.id()) != source_id)
            .collect();

        eligible.sort_by_key(|recipient| !recipient.is_favorite());
        eligible
    }

    /// Collects the request that would be submitted on confirmation.
    pub fn request(&self) -> Result<TransferRequest, WizardError> {
        let source = self.state.source_account.as_ref().ok_or(WizardError::MissingSource)?;
        let recipient = self.state.recipient.as_ref().ok_or(WizardError::MissingRecipient)?;
        let details = self.state.transfer_details.as_ref().ok_or(WizardError::MissingDetails)?;
        let summary = fees::summarize(recipient, details.amount, &self.policy).ok_or(WizardError::Overflow)?;

        Ok(TransferRequest {
            source: source.clone(),
            recipient: recipient.clone(),
            details: details.clone(),
            summary
        })
    }

    /// Passes the security gate if needed and enters the pending sub-state.
    ///
    /// The returned request must be settled with [`Wizard::complete`] or [`Wizard::abandon`].
    pub fn begin_confirm(&mut self, security_code: Option<&str>) -> Result<TransferRequest, WizardError> {
        self.begin_confirm_at(security_code, Instant::now())
    }

    pub fn begin_confirm_at(&mut self, security_code: Option<&str>, now: Instant) -> Result<TransferRequest, WizardError> {
        self.ensure_editable()?;

        let step = self.state.current_step;

        if step != Step::ReviewConfirm {
            return Err(WizardError::NotReviewing { step })
        }

        let request = self.request()?;

        if security::requires_security_code(request.details.amount, &request.recipient, &self.policy) {
            self.gate.verify(security_code, &self.policy, now)?;
        }

        self.state.pending = true;

        Ok(request)
    }

    /// Stores the result of the pending confirmation and completes the wizard.
    pub fn complete(&mut self, result: TransferResult) -> Result<&TransferResult, WizardError> {
        if !self.state.pending {
            return Err(WizardError::NotPending)
        }

        info!("Transfer [{}] confirmed: {} EUR to [{}]", result.reference, result.total.to_localized(), self.state.recipient.as_ref().map_or("", |recipient| recipient.name()));

        self.state.pending = false;
        self.state.current_step = Step::Completed;

        Ok(&*self.state.result.insert(result))
    }

    /// Leaves the pending sub-state without a result. Returns whether anything was pending.
    pub fn abandon(&mut self) -> bool {
        std::mem::replace(&mut self.state.pending, false)
    }

    /// Starts a new transfer. Security gate failures are kept.
    pub fn reset(&mut self) {
        self.state = WizardState::default();
    }

    fn ensure_editable(&self) -> Result<(), WizardError> {
        if self.state.pending {
            return Err(WizardError::Busy)
        }

        if self.state.current_step == Step::Completed {
            return Err(WizardError::Completed)
        }

        Ok(())
    }

    fn guard(&self, step: Step) -> bool {
        match step {
            Step::SelectSource => self.state.source_account.is_some(),
            Step::SelectRecipient => match (&self.state.source_account, &self.state.recipient) {
                (Some(source), Some(recipient)) => recipient.id() != source.id,
                _ => false
            },
            Step::EnterDetails => self.state.transfer_details.is_some(),
            Step::ReviewConfirm => self.state.result.is_some(),
            Step::Completed => false
        }
    }

    /// Re-runs validation after the source or recipient changed.
    fn revalidate(&mut self) {
        let (Some(source), Some(recipient), Some(draft)) = (&self.state.source_account, &self.state.recipient, &self.state.draft) else {
            self.state.transfer_details = None;
            self.state.field_errors.clear();
            self.clamp_step();
            return
        };

        let context = ValidationContext {
            source,
            recipient,
            today: self.today,
            policy: &self.policy
        };

        match validation::validate(draft, &context) {
            Ok(details) => {
                self.state.transfer_details = Some(details);
                self.state.field_errors.clear();
            }
            Err(errors) => {
                self.state.transfer_details = None;
                self.state.field_errors = errors;
            }
        }

        self.clamp_step();
    }

    /// Pulls the current step back to the first one whose requirements fail.
    fn clamp_step(&mut self) {
        let mut reachable = Step::SelectSource;

        while reachable < self.state.current_step && self.guard(reachable) {
            reachable = reachable.next();
        }

        if reachable < self.state.current_step {
            debug!("Step moved back from [{}] to [{reachable}]", self.state.current_step);
            self.state.current_step = reachable;
        }
    }
}
