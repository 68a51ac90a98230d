//! Background task driving a [`FeedLoader`] for the dashboard.

use super::loader::{FeedLoader, Liveness, LoadOutcome};
use crate::error::{Error, Result};
use crate::state::Action;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

/// Requests the dashboard can make of the loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedCommand {
    Load,
    LoadMore,
    Refresh,
}

impl FeedCommand {
    /// The command behind a store action, if any.
    pub fn from_action(action: &Action) -> Option<Self> {
        match action {
            Action::LoadFeed => Some(Self::Load),
            Action::LoadMore => Some(Self::LoadMore),
            Action::RefreshFeed => Some(Self::Refresh),
            _ => None,
        }
    }
}

/// Owns the loader task and forwards every state change to the store as
/// [`Action::FeedUpdated`].
///
/// Dropping the worker unmounts the loader: whatever is in flight is
/// discarded.
pub struct FeedWorker {
    commands: mpsc::UnboundedSender<FeedCommand>,
    liveness: Liveness,
    tasks: [JoinHandle<()>; 2],
}

impl FeedWorker {
    /// Spawn the loader and forwarding tasks on the current runtime.
    pub fn spawn(loader: FeedLoader, action_tx: mpsc::UnboundedSender<Action>) -> Self {
        let liveness = loader.liveness();
        let (commands, command_rx) = mpsc::unbounded_channel();

        let mut updates = loader.subscribe();
        let forward_liveness = liveness.clone();
        let forwarder = tokio::spawn(async move {
            while updates.changed().await.is_ok() {
                if !forward_liveness.is_mounted() {
                    break;
                }
                let snapshot = updates.borrow_and_update().clone();
                if action_tx.send(Action::FeedUpdated(Box::new(snapshot))).is_err() {
                    break;
                }
            }
        });

        let runner = tokio::spawn(run(loader, command_rx));

        Self {
            commands,
            liveness,
            tasks: [runner, forwarder],
        }
    }

    /// Queue a command for the loader.
    pub fn send(&self, command: FeedCommand) -> Result<()> {
        self.commands
            .send(command)
            .map_err(|e| Error::channel(format!("feed worker stopped: {e}")))
    }

    pub fn liveness(&self) -> Liveness {
        self.liveness.clone()
    }
}

impl Drop for FeedWorker {
    fn drop(&mut self) {
        self.liveness.unmount();
        for task in &self.tasks {
            task.abort();
        }
    }
}

async fn run(mut loader: FeedLoader, mut commands: mpsc::UnboundedReceiver<FeedCommand>) {
    while let Some(command) = commands.recv().await {
        let outcome = match command {
            FeedCommand::Load => loader.load().await,
            FeedCommand::LoadMore => loader.load_more().await,
            FeedCommand::Refresh => loader.refresh().await,
        };
        debug!(?command, ?outcome, "feed command finished");

        if outcome == LoadOutcome::Discarded {
            break;
        }
    }
}
