use std::future::pending;
use std::sync::Arc;

use tokio::spawn;
use tokio::sync::{mpsc, oneshot};
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, error, warn};

use crate::models::{TransferDraft, TransferResult};
use crate::processing::{ProcessingError, Processor};
use crate::storage::Directory;
use crate::types::{AccountId, RecipientId};
use crate::wizard::{Wizard, WizardError, WizardState};

/// A user action on the wizard, as emitted by the presentation layer.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Intent {
    SelectSource(AccountId),
    SetRecipient(RecipientId),
    SetDetails(TransferDraft),
    Advance,
    Retreat,
    /// Starts processing; the reply arrives while the transfer is still pending.
    Confirm(Option<String>),
    /// Replies once no confirmation is pending.
    Wait,
    Reset
}

/// State after the intent was applied, or why it was refused.
pub type Reply = Result<WizardState, WizardError>;

type Processing = Result<TransferResult, ProcessingError>;

struct Command {
    intent: Intent,
    reply: oneshot::Sender<Reply>
}

/// Owns one wizard on its own task and applies intents strictly one at a time.
///
/// At most one confirmation is processed at once. The actor keeps serving intents
/// while it runs, refusing those that would change the wizard.
pub struct WizardActor {
    sender: mpsc::UnboundedSender<Command>,
    handle: JoinHandle<Wizard>
}

impl WizardActor {
    pub fn new<D: Directory, P: Processor>(wizard: Wizard, directory: Arc<D>, processor: Arc<P>) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let worker = Worker {
            wizard,
            directory,
            processor,
            pending: None,
            waiters: Vec::new()
        };

        let handle = spawn(worker.run(receiver));

        Self { sender, handle }
    }

    pub async fn send(&self, intent: Intent) -> Reply {
        let (reply, response) = oneshot::channel();

        if self.sender.send(Command { intent, reply }).is_err() {
            return Err(WizardError::Closed)
        }

        response.await.unwrap_or(Err(WizardError::Closed))
    }

    /// Stops the actor and hands back its wizard. A pending confirmation is cancelled.
    pub async fn despawn(self) -> anyhow::Result<Wizard> {
        drop(self.sender);

        Ok(self.handle.await?)
    }
}

enum Event {
    Command(Option<Command>),
    Settled(Result<Processing, JoinError>)
}

struct Worker<D, P> {
    wizard: Wizard,
    directory: Arc<D>,
    processor: Arc<P>,
    pending: Option<JoinHandle<Processing>>,
    waiters: Vec<oneshot::Sender<Reply>>
}

impl<D: Directory, P: Processor> Worker<D, P> {
    async fn run(mut self, mut receiver: mpsc::UnboundedReceiver<Command>) -> Wizard {
        loop {
            let event = tokio::select! {
                command = receiver.recv() => Event::Command(command),
                outcome = settle(&mut self.pending) => Event::Settled(outcome)
            };

            match event {
                Event::Command(Some(command)) => self.handle(command),
                Event::Command(None) => break,
                Event::Settled(outcome) => self.on_settled(outcome)
            }
        }

        if let Some(processing) = self.pending.take() {
            processing.abort();
            self.wizard.abandon();
            debug!("Pending transfer cancelled on shutdown");
        }

        self.wizard
    }

    fn handle(&mut self, command: Command) {
        let Command { intent, reply } = command;

        if intent == Intent::Wait && self.pending.is_some() {
            self.waiters.push(reply);
            return
        }

        let description = format!("{intent:?}");
        let outcome = self.apply(intent).map(|()| self.wizard.state().clone());

        match &outcome {
            Ok(state) => debug!("Intent {description} applied, step [{}]", state.current_step),
            Err(error) => warn!("Intent {description} rejected: {error}")
        }

        //NOTE: The caller may have stopped listening, the state change stands either way
        let _ = reply.send(outcome);
    }

    fn apply(&mut self, intent: Intent) -> Result<(), WizardError> {
        match intent {
            Intent::SelectSource(account_id) => {
                let account = self.directory.account(&account_id)
                    .ok_or(WizardError::UnknownAccount(account_id))?;
                self.wizard.select_source(account)
            }
            Intent::SetRecipient(recipient_id) => {
                let recipient = self.directory.recipient(&recipient_id)
                    .ok_or(WizardError::UnknownRecipient(recipient_id))?;
                self.wizard.set_recipient(recipient)
            }
            Intent::SetDetails(draft) => self.wizard.set_transfer_details(draft),
            Intent::Advance => self.wizard.advance().map(|_| ()),
            Intent::Retreat => self.wizard.retreat().map(|_| ()),
            Intent::Confirm(security_code) => {
                let request = self.wizard.begin_confirm(security_code.as_deref())?;
                let processor = Arc::clone(&self.processor);

                self.pending = Some(spawn(async move { processor.submit(request).await }));

                Ok(())
            }
            Intent::Reset => {
                if let Some(processing) = self.pending.take() {
                    processing.abort();
                    debug!("Pending transfer cancelled by reset");
                }

                self.wizard.reset();
                let state = self.wizard.state().clone();
                self.release_waiters(Ok(state));

                Ok(())
            }
            Intent::Wait => Ok(())
        }
    }

    fn on_settled(&mut self, outcome: Result<Processing, JoinError>) {
        self.pending = None;

        let reply = match outcome {
            Ok(Ok(result)) => self.wizard.complete(result).map(|_| ()),
            Ok(Err(failure)) => {
                warn!("Transfer processing failed: {failure}");
                self.wizard.abandon();
                Err(WizardError::Processing(failure.to_string()))
            }
            Err(failure) => {
                error!("Transfer processing task failed: {failure}");
                self.wizard.abandon();
                Err(WizardError::Processing(failure.to_string()))
            }
        };

        if let Err(failure) = &reply {
            if !matches!(failure, WizardError::Processing(_)) {
                error!("Processed transfer could not be recorded: {failure}");
            }
        }

        let reply = reply.map(|()| self.wizard.state().clone());
        self.release_waiters(reply);
    }

    fn release_waiters(&mut self, reply: Reply) {
        for waiter in self.waiters.drain(..) {
            let _ = waiter.send(reply.clone());
        }
    }
}

/// Resolves with the pending task's outcome, or never when nothing is pending.
async fn settle<T>(pending_task: &mut Option<JoinHandle<T>>) -> Result<T, JoinError> {
    match pending_task {
        Some(handle) => handle.await,
        None => pending().await
    }
}
