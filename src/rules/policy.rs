use std::time::Duration;

use crate::types::Money;

pub const DEFAULT_SECURITY_CODE: &str = "123456";
const DEFAULT_REFERENCE_MAX_LENGTH: usize = 140;

/// Repeated-failure lockout for the security gate, mirroring the login form.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Lockout {
    pub max_attempts: u32,
    pub cooldown: Duration
}

/// Every tunable number and code the transfer rules read.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TransferPolicy {
    /// Largest single transfer accepted per day.
    pub daily_limit: Money,
    /// External transfers strictly above this amount pay `flat_fee`.
    pub fee_threshold: Money,
    pub flat_fee: Money,
    /// Transfers strictly above this amount need a security code, whatever the recipient.
    pub security_threshold: Money,
    pub reference_max_length: usize,
    /// Fixed code accepted by the gate. Stand-in for a real one-time password.
    pub security_code: String,
    /// `None` leaves the gate open for unlimited retries.
    pub lockout: Option<Lockout>
}

impl Default for TransferPolicy {
    fn default() -> Self {
        Self {
            daily_limit: Money::from_major(10_000),
            fee_threshold: Money::from_major(1_000),
            flat_fee: Money::from_minor(250),
            security_threshold: Money::from_major(1_000),
            reference_max_length: DEFAULT_REFERENCE_MAX_LENGTH,
            security_code: DEFAULT_SECURITY_CODE.to_string(),
            lockout: None
        }
    }
}

impl TransferPolicy {
    pub fn with_daily_limit(mut self, daily_limit: Money) -> Self {
        self.daily_limit = daily_limit;
        self
    }

    pub fn with_fee(mut self, fee_threshold: Money, flat_fee: Money) -> Self {
        self.fee_threshold = fee_threshold;
        self.flat_fee = flat_fee;
        self
    }

    pub fn with_security_threshold(mut self, security_threshold: Money) -> Self {
        self.security_threshold = security_threshold;
        self
    }

    pub fn with_security_code(mut self, security_code: impl Into<String>) -> Self {
        self.security_code = security_code.into();
        self
    }

    pub fn with_security_lockout(mut self, max_attempts: u32, cooldown: Duration) -> Self {
        self.lockout = Some(Lockout { max_attempts, cooldown });
        self
    }
}
