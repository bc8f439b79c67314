use crate::rules::TransferPolicy;
use crate::storage::DirectoryError;
use crate::types::Money;
use csv::{ReaderBuilder, Trim};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::Path;
use std::time::Duration;

pub const POLICY_FILE: &str = "policy.csv";
const DEFAULT_LOCKOUT_SECONDS: u64 = 30;

/// Overrides for the built-in transfer policy. Blank columns keep the default.
#[derive(Debug, Deserialize)]
struct PolicyRow {
    #[serde(default)]
    daily_limit: Option<Money>,
    #[serde(default)]
    fee_threshold: Option<Money>,
    #[serde(default)]
    flat_fee: Option<Money>,
    #[serde(default)]
    security_threshold: Option<Money>,
    #[serde(default)]
    security_code: Option<String>,
    #[serde(default)]
    lockout_attempts: Option<u32>,
    #[serde(default)]
    lockout_seconds: Option<u64>
}

impl PolicyRow {
    fn apply(self, mut policy: TransferPolicy) -> Result<TransferPolicy, DirectoryError> {
        if let Some(daily_limit) = self.daily_limit {
            policy = policy.with_daily_limit(daily_limit);
        }

        if self.fee_threshold.is_some() || self.flat_fee.is_some() {
            let fee_threshold = self.fee_threshold.unwrap_or(policy.fee_threshold);
            let flat_fee = self.flat_fee.unwrap_or(policy.flat_fee);
            policy = policy.with_fee(fee_threshold, flat_fee);
        }

        if let Some(security_threshold) = self.security_threshold {
            policy = policy.with_security_threshold(security_threshold);
        }

        if let Some(security_code) = self.security_code {
            policy = policy.with_security_code(security_code);
        }

        match self.lockout_attempts {
            Some(0) => return Err(DirectoryError::InvalidPolicy("lockout_attempts must be at least 1".to_string())),
            Some(attempts) => {
                let cooldown = Duration::from_secs(self.lockout_seconds.unwrap_or(DEFAULT_LOCKOUT_SECONDS));
                policy = policy.with_security_lockout(attempts, cooldown);
            }
            None => {}
        }

        Ok(policy)
    }
}

/// Reads policy overrides. Later rows override earlier ones.
pub fn load_policy<R: Read>(reader: R) -> Result<TransferPolicy, DirectoryError> {
    let mut policy = TransferPolicy::default();

    for row in ReaderBuilder::new().trim(Trim::All).from_reader(reader).deserialize::<PolicyRow>() {
        policy = row?.apply(policy)?;
    }

    Ok(policy)
}

/// Loads `policy.csv` from a seed directory; the default policy when the file is absent.
pub fn policy_from_dir(path: &Path) -> Result<TransferPolicy, DirectoryError> {
    match File::open(path.join(POLICY_FILE)) {
        Ok(file) => load_policy(BufReader::new(file)),
        Err(error) if error.kind() == ErrorKind::NotFound => Ok(TransferPolicy::default()),
        Err(error) => Err(error.into())
    }
}
