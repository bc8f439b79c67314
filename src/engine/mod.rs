mod errors;
mod script;
mod session_engine;

pub use errors::ScriptError;
pub use script::{Action, ScriptRow};
pub use session_engine::{SessionEngine, SessionReport};
