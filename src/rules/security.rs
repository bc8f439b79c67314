use std::time::{Duration, Instant};

use tracing::warn;

use crate::models::Recipient;
use crate::rules::{SecurityError, TransferPolicy};
use crate::types::Money;

/// Large transfers and every transfer leaving the user's own accounts need a code.
pub fn requires_security_code(amount: Money, recipient: &Recipient, policy: &TransferPolicy) -> bool {
    amount > policy.security_threshold || !recipient.is_own()
}

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
enum Lock {
    #[default]
    Open,
    Until(Instant),
    /// The cooldown does not fit into an `Instant`.
    Indefinite
}

/// Checks security codes and tracks consecutive failures for the optional lockout.
///
/// The gate outlives a single transfer attempt so that starting a new transfer
/// does not clear an active lockout.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct SecurityGate {
    failures: u32,
    lock: Lock
}

impl SecurityGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Verifies `input` against the policy's code.
    ///
    /// # Errors
    /// - `InvalidSecurityCode` when the code is missing or wrong. A missing code is not counted as an attempt.
    /// - `LockedOut` while a cooldown is running, and on the failure that starts one.
    pub fn verify(&mut self, input: Option<&str>, policy: &TransferPolicy, now: Instant) -> Result<(), SecurityError> {
        match self.lock {
            Lock::Until(until) if now < until => return Err(SecurityError::LockedOut { retry_after: until - now }),
            Lock::Indefinite => return Err(SecurityError::LockedOut { retry_after: Duration::MAX }),
            Lock::Until(_) => {
                self.lock = Lock::Open;
                self.failures = 0;
            }
            Lock::Open => {}
        }

        let Some(code) = input.map(str::trim).filter(|code| !code.is_empty()) else {
            return Err(SecurityError::InvalidSecurityCode)
        };

        if code == policy.security_code {
            self.failures = 0;
            return Ok(())
        }

        self.failures = self.failures.saturating_add(1);

        if let Some(lockout) = policy.lockout {
            if self.failures >= lockout.max_attempts {
                warn!("Security code rejected {} times, locking for {:?}", self.failures, lockout.cooldown);
                self.lock = now.checked_add(lockout.cooldown).map_or(Lock::Indefinite, Lock::Until);
                self.failures = 0;
                return Err(SecurityError::LockedOut { retry_after: lockout.cooldown })
            }
        }

        Err(SecurityError::InvalidSecurityCode)
    }
}
