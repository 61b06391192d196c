//! Presenter selection and the UI driver thread.

use crate::application::events::Event;
use crate::ports::outbound::{Presenter, RunStatus};
use crate::shared::Result;
use std::io::IsTerminal;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};

/// Which presenter renders bus events for this run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenterKind {
    /// Nothing is rendered
    None,
    /// Plain log lines, one per event
    Log,
    /// Live progress display
    Interactive,
}

/// Picks the presenter for a run.
///
/// Quiet always wins. Verbose output is log lines, never a live display, so
/// that the progress display and the log stream do not fight over the
/// terminal. Otherwise a live display is used when the terminal supports it.
pub fn select_presenter(interactive_terminal: bool, quiet: bool, verbose: bool) -> PresenterKind {
    if quiet {
        PresenterKind::None
    } else if verbose || !interactive_terminal {
        PresenterKind::Log
    } else {
        PresenterKind::Interactive
    }
}

/// True when both stdin and stderr are attached to a terminal
pub fn is_interactive_terminal() -> bool {
    std::io::stdin().is_terminal() && std::io::stderr().is_terminal()
}

enum UiMessage {
    Event(Event, Option<oneshot::Sender<()>>),
    Stop(RunStatus),
}

/// Handle to a presenter running on its own thread.
///
/// The thread is detached: if the presenter hangs, stopping gives up after
/// a bounded wait and the process can still exit.
pub struct UiHandle {
    tx: mpsc::UnboundedSender<UiMessage>,
    ack: oneshot::Receiver<Result<()>>,
}

impl UiHandle {
    pub fn spawn(mut presenter: Box<dyn Presenter>) -> Result<Self> {
        let (tx, mut rx) = mpsc::unbounded_channel::<UiMessage>();
        let (ack_tx, ack) = oneshot::channel();

        std::thread::Builder::new()
            .name("ui".to_string())
            .spawn(move || {
                let mut first_error: Option<anyhow::Error> = None;
                let mut status = RunStatus::Failed;

                while let Some(message) = rx.blocking_recv() {
                    match message {
                        UiMessage::Event(event, delivered) => {
                            if let Err(e) = presenter.handle(&event) {
                                tracing::debug!(event = event.name(), error = %e, "presenter failed");
                                first_error.get_or_insert(e);
                            }
                            if let Some(delivered) = delivered {
                                let _ = delivered.send(());
                            }
                        }
                        UiMessage::Stop(final_status) => {
                            status = final_status;
                            break;
                        }
                    }
                }

                let torn_down = presenter.teardown(status);
                let result = match first_error {
                    Some(e) => Err(e),
                    None => torn_down,
                };
                let _ = ack_tx.send(result);
            })
            .map_err(|e| anyhow::anyhow!("failed to start the UI thread: {}", e))?;

        Ok(Self { tx, ack })
    }

    /// Queues an event for the presenter
    pub fn send(&self, event: Event) {
        let _ = self.tx.send(UiMessage::Event(event, None));
    }

    /// Queues an event and waits until the presenter has handled it
    pub async fn deliver(&self, event: Event, timeout: Duration) -> Result<()> {
        let (delivered_tx, delivered) = oneshot::channel();
        if self
            .tx
            .send(UiMessage::Event(event, Some(delivered_tx)))
            .is_err()
        {
            anyhow::bail!("UI is no longer running");
        }
        match tokio::time::timeout(timeout, delivered).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(_)) => anyhow::bail!("UI stopped before handling the event"),
            Err(_) => anyhow::bail!("UI did not handle the event within {:?}", timeout),
        }
    }

    /// Asks the presenter to finish and waits at most `timeout` for it
    pub async fn stop(self, status: RunStatus, timeout: Duration) -> Result<()> {
        let _ = self.tx.send(UiMessage::Stop(status));
        match tokio::time::timeout(timeout, self.ack).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => anyhow::bail!("UI exited without acknowledging shutdown"),
            Err(_) => anyhow::bail!("UI did not shut down within {:?}", timeout),
        }
    }
}
