mod wizard_actor;

pub use wizard_actor::{Intent, WizardActor};
