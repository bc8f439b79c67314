use crate::actors::{Intent, WizardActor};
use crate::engine::{ScriptError, ScriptRow};
use crate::models::{SessionContext, TransferSummary};
use crate::processing::Processor;
use crate::rules::TransferPolicy;
use crate::storage::Directory;
use crate::types::RecipientId;
use crate::wizard::{Wizard, WizardError, WizardState};
use anyhow::bail;
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::io::BufReader;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::{spawn_blocking, JoinHandle};
use tracing::{error, info};

/// Outcome of replaying one session script, as the review screen would show it.
#[derive(Debug, Clone)]
pub struct SessionReport {
    pub state: WizardState,
    pub summary: Option<TransferSummary>,
    pub requires_security_code: Option<bool>,
    pub can_advance: bool,
    /// Recipients offered for the selected source, favourites first.
    pub eligible_recipients: Vec<RecipientId>,
    pub applied: usize,
    pub rejected: usize
}

/// Drives a fresh transfer wizard with the intents recorded in a CSV script.
pub struct SessionEngine<D, P> {
    directory: Arc<D>,
    processor: Arc<P>,
    policy: TransferPolicy,
    backpressure: usize
}

impl<D: Directory, P: Processor> SessionEngine<D, P> {
    pub fn new(directory: Arc<D>, processor: Arc<P>) -> Self {
        Self {
            directory,
            processor,
            policy: TransferPolicy::default(),
            backpressure: 64
        }
    }

    pub fn with_policy(mut self, policy: TransferPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Replays the script at `path` through a new wizard owned by `session`.
    ///
    /// Unreadable rows are skipped and refused intents are counted; neither stops
    /// the replay. A confirmation still pending at the end is awaited.
    pub async fn run(&self, path: &str, session: &SessionContext) -> anyhow::Result<SessionReport> {
        if !session.is_authenticated() {
            bail!("Session [{}] is not authenticated", session.user());
        }

        let (sender, receiver) = mpsc::channel::<Intent>(self.backpressure);
        let csv_handle = self.spawn_script_reader(path.to_string(), sender);

        let wizard = Wizard::new(self.policy.clone(), session.business_date());
        let actor = WizardActor::new(wizard, self.directory.clone(), self.processor.clone());
        let (applied, rejected) = self.replay(&actor, receiver).await;

        if let Err(error) = csv_handle.await {
            error!("Script ingestion failed: {error}");
        }

        if let Err(error) = actor.send(Intent::Wait).await {
            error!("Pending transfer did not settle: {error}");
        }

        let wizard = actor.despawn().await?;
        let recipients = self.directory.recipients();
        let eligible_recipients = wizard.eligible_recipients(&recipients).into_iter()
            .map(|recipient| recipient.id().to_string())
            .collect();

        info!("Session for [{}] replayed: {applied} applied, {rejected} rejected, final step [{}]", session.user(), wizard.current_step());

        Ok(SessionReport {
            state: wizard.state().clone(),
            summary: wizard.summary(),
            requires_security_code: wizard.requires_security_code(),
            can_advance: wizard.can_advance(),
            eligible_recipients,
            applied,
            rejected
        })
    }

    fn spawn_script_reader(&self, path: String, sender: mpsc::Sender<Intent>) -> JoinHandle<()> {
        spawn_blocking(move || {
            let file = match File::open(&path) {
                Ok(file) => file,
                Err(error) => {
                    error!("Error opening session script at path: {path} | {error}");
                    return;
                }
            };

            let mut reader = ReaderBuilder::new()
                .trim(Trim::All)
                .flexible(true)
                .from_reader(BufReader::new(file));

            for result in reader.deserialize::<ScriptRow>() {
                match result.map_err(ScriptError::from).and_then(Intent::try_from) {
                    Ok(intent) => {
                        if sender.blocking_send(intent).is_err() {
                            break;
                        }
                    }
                    Err(error) => {
                        error!("Script row skipped: {error}");
                    }
                }
            }
        })
    }

    async fn replay(&self, actor: &WizardActor, mut receiver: mpsc::Receiver<Intent>) -> (usize, usize) {
        let mut applied = 0;
        let mut rejected = 0;

        while let Some(intent) = receiver.recv().await {
            match actor.send(intent).await {
                Ok(_) => applied += 1,
                Err(WizardError::Closed) => {
                    error!("Wizard actor stopped before the script ended");
                    break;
                }
                Err(_) => rejected += 1
            }
        }

        (applied, rejected)
    }
}
