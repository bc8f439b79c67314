mod controller;
mod errors;

use std::fmt;
use std::fmt::{Display, Formatter};

pub use controller::{Wizard, WizardState};
pub use errors::WizardError;

/// Wizard steps in the order they are walked through.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Step {
    #[default]
    SelectSource,
    SelectRecipient,
    EnterDetails,
    ReviewConfirm,
    Completed
}

impl Step {
    /// One-based position, as shown in the progress bar.
    pub fn number(self) -> u8 {
        match self {
            Step::SelectSource => 1,
            Step::SelectRecipient => 2,
            Step::EnterDetails => 3,
            Step::ReviewConfirm => 4,
            Step::Completed => 5
        }
    }

    fn next(self) -> Self {
        match self {
            Step::SelectSource => Step::SelectRecipient,
            Step::SelectRecipient => Step::EnterDetails,
            Step::EnterDetails => Step::ReviewConfirm,
            Step::ReviewConfirm | Step::Completed => Step::Completed
        }
    }

    fn previous(self) -> Self {
        match self {
            Step::SelectSource | Step::SelectRecipient => Step::SelectSource,
            Step::EnterDetails => Step::SelectRecipient,
            Step::ReviewConfirm => Step::EnterDetails,
            Step::Completed => Step::ReviewConfirm
        }
    }
}

impl Display for Step {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::SelectSource => "select_source",
            Step::SelectRecipient => "select_recipient",
            Step::EnterDetails => "enter_details",
            Step::ReviewConfirm => "review_confirm",
            Step::Completed => "completed"
        };
        write!(formatter, "{name}")
    }
}
