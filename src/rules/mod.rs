mod errors;
pub mod fees;
mod policy;
pub mod security;
#[cfg(test)]
mod tests;
pub mod validation;

pub use errors::{FieldError, SecurityError};
pub use policy::TransferPolicy;
pub use security::SecurityGate;
pub use validation::{FieldErrors, ValidationContext};
