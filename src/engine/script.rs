use serde::Deserialize;

use crate::actors::Intent;
use crate::engine::ScriptError;
use crate::models::{ExecutionMode, RecurringFrequency, TransferDraft};

#[derive(Debug, Clone, Copy, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    SelectSource,
    SetRecipient,
    SetDetails,
    Advance,
    Retreat,
    Confirm,
    Wait,
    Reset
}

/// One row of a session script. Only the columns an action needs are read.
#[derive(Debug, Clone, Deserialize)]
pub struct ScriptRow {
    pub action: Action,
    /// Account id for `select_source`, recipient id for `set_recipient`.
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub amount: Option<String>,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub mode: Option<ExecutionMode>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub recurring: Option<bool>,
    #[serde(default)]
    pub frequency: Option<RecurringFrequency>,
    #[serde(default)]
    pub code: Option<String>
}

impl TryFrom<ScriptRow> for Intent {
    type Error = ScriptError;

    fn try_from(row: ScriptRow) -> Result<Self, Self::Error> {
        let action = row.action;
        let target = |target: Option<String>| target.ok_or(ScriptError::MissingField { action, field: "target" });

        let intent = match action {
            Action::SelectSource => Intent::SelectSource(target(row.target)?),
            Action::SetRecipient => Intent::SetRecipient(target(row.target)?),
            Action::SetDetails => {
                let mut draft = TransferDraft::immediate(row.amount.unwrap_or_default(), row.reference.unwrap_or_default());

                if row.mode == Some(ExecutionMode::Scheduled) {
                    draft = draft.scheduled_on(row.date.unwrap_or_default());
                }

                if row.recurring == Some(true) {
                    draft = draft.recurring(row.frequency);
                }

                Intent::SetDetails(draft)
            }
            Action::Advance => Intent::Advance,
            Action::Retreat => Intent::Retreat,
            Action::Confirm => Intent::Confirm(row.code),
            Action::Wait => Intent::Wait,
            Action::Reset => Intent::Reset
        };

        Ok(intent)
    }
}
