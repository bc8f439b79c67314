use crate::engine::Action;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Script row could not be read: {0}")]
    Csv(#[from] csv::Error),
    #[error("Action [{action:?}] requires the [{field}] column")]
    MissingField {
        action: Action,
        field: &'static str
    }
}
