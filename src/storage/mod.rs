mod errors;
mod policy_file;
mod seed_directory;
#[cfg(test)]
mod tests;

use crate::models::{Account, Recipient};

pub use errors::DirectoryError;
pub use policy_file::policy_from_dir;
pub use seed_directory::SeedDirectory;

/// Read-only source of the user's accounts and saved beneficiaries.
pub trait Directory: Send + Sync + 'static {
    fn account(&self, account_id: &str) -> Option<Account>;
    /// Own accounts resolve to [`Recipient::Internal`], beneficiaries to [`Recipient::External`].
    fn recipient(&self, recipient_id: &str) -> Option<Recipient>;
    fn accounts(&self) -> Vec<Account>;
    fn recipients(&self) -> Vec<Recipient>;
}
