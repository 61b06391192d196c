//! The coordinator that owns a run from start to teardown.
//!
//! It multiplexes three inputs (worker errors, the cancellation signal and
//! bus events) and moves through these states:
//!
//! ```text
//! Running ──worker error──────────────▶ Failed ──┐
//!    │ ────cancellation───────────────▶ Cancelled├─▶ Done (teardown)
//!    └─────worker closed cleanly──────▶ Draining ┘
//! ```
//!
//! Cancellation is checked first on every iteration, so an interrupt that
//! arrives before the run completes always wins and the report is never
//! written. Only a clean completion executes the [`ExitAction`].

use crate::application::events::{Event, ExitAction, Subscription};
use crate::application::signals::CancellationSignal;
use crate::application::ui::UiHandle;
use crate::ports::outbound::RunStatus;
use crate::shared::{ExitCode, Result, SbomError};
use std::time::Duration;
use tokio::sync::mpsc;

/// Default bound on how long teardown waits for the UI
pub const DEFAULT_UI_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(2);

/// How a run ended
#[derive(Debug)]
pub enum RunOutcome {
    /// The report was written
    Completed,
    /// The user interrupted the run; nothing was written
    Cancelled,
    /// The first error of the run
    Failed(anyhow::Error),
}

impl RunOutcome {
    pub fn exit_code(&self) -> ExitCode {
        match self {
            RunOutcome::Completed => ExitCode::Success,
            RunOutcome::Cancelled => ExitCode::Interrupted,
            RunOutcome::Failed(_) => ExitCode::ApplicationError,
        }
    }

    pub fn status(&self) -> RunStatus {
        match self {
            RunOutcome::Completed => RunStatus::Completed,
            RunOutcome::Cancelled => RunStatus::Cancelled,
            RunOutcome::Failed(_) => RunStatus::Failed,
        }
    }

    pub fn error(&self) -> Option<&anyhow::Error> {
        match self {
            RunOutcome::Failed(e) => Some(e),
            _ => None,
        }
    }
}

enum LoopState {
    Running,
    Draining,
    Cancelled,
    Failed(anyhow::Error),
    Done(RunOutcome),
}

type CleanupHook = Box<dyn FnOnce() -> Result<()> + Send>;

/// EventLoop - coordinates the worker, the cancellation signal and the UI
pub struct EventLoop {
    worker_errors: mpsc::Receiver<anyhow::Error>,
    cancellation: CancellationSignal,
    subscription: Subscription,
    cleanup: CleanupHook,
    ui: Option<UiHandle>,
    ui_timeout: Duration,
    exit_action: Option<ExitAction>,
}

impl EventLoop {
    pub fn new(
        worker_errors: mpsc::Receiver<anyhow::Error>,
        cancellation: CancellationSignal,
        subscription: Subscription,
    ) -> Self {
        Self {
            worker_errors,
            cancellation,
            subscription,
            cleanup: Box::new(|| Ok(())),
            ui: None,
            ui_timeout: DEFAULT_UI_SHUTDOWN_TIMEOUT,
            exit_action: None,
        }
    }

    /// Runs during teardown on every exit path
    pub fn with_cleanup<F>(mut self, cleanup: F) -> Self
    where
        F: FnOnce() -> Result<()> + Send + 'static,
    {
        self.cleanup = Box::new(cleanup);
        self
    }

    pub fn with_ui(mut self, ui: UiHandle, shutdown_timeout: Duration) -> Self {
        self.ui = Some(ui);
        self.ui_timeout = shutdown_timeout;
        self
    }

    /// Drives the run to completion and tears everything down
    pub async fn run(mut self) -> RunOutcome {
        let mut state = LoopState::Running;
        let outcome = loop {
            state = match state {
                LoopState::Running => self.step().await,
                LoopState::Draining => LoopState::Done(self.complete().await),
                LoopState::Cancelled => {
                    tracing::info!("run cancelled, skipping report");
                    LoopState::Done(RunOutcome::Cancelled)
                }
                LoopState::Failed(e) => {
                    self.forward_pending();
                    LoopState::Done(RunOutcome::Failed(e))
                }
                LoopState::Done(outcome) => break outcome,
            };
        };

        self.teardown(outcome.status()).await;
        outcome
    }

    async fn step(&mut self) -> LoopState {
        tokio::select! {
            biased;

            _ = self.cancellation.cancelled() => LoopState::Cancelled,

            received = self.worker_errors.recv() => match received {
                Some(e) => {
                    tracing::debug!("worker reported an error");
                    LoopState::Failed(e)
                }
                None => {
                    tracing::debug!("worker finished, draining events");
                    LoopState::Draining
                }
            },

            Some(event) = self.subscription.recv() => {
                self.observe(event);
                LoopState::Running
            }
        }
    }

    /// Remembers the exit action and forwards everything else to the UI
    fn observe(&mut self, event: Event) {
        tracing::trace!(event = event.name(), "event received");
        match event {
            Event::Exit(action) => {
                if self.exit_action.replace(action).is_some() {
                    tracing::warn!("received more than one exit event, keeping the latest");
                }
            }
            other => {
                if let Some(ui) = &self.ui {
                    ui.send(other);
                }
            }
        }
    }

    /// Takes whatever the bus already queued for us
    fn forward_pending(&mut self) {
        while let Some(event) = self.subscription.try_recv() {
            self.observe(event);
        }
    }

    async fn complete(&mut self) -> RunOutcome {
        // The exit event is published before the worker's error channel
        // closes, so by now it is queued if it exists at all.
        self.forward_pending();

        let action = match self.exit_action.take() {
            Some(action) => action,
            None => return RunOutcome::Failed(SbomError::MissingResult.into()),
        };

        if self.cancellation.is_cancelled() {
            return RunOutcome::Cancelled;
        }

        if let Some(ui) = &self.ui {
            if let Err(e) = ui.deliver(Event::Exit(action.clone()), self.ui_timeout).await {
                tracing::warn!(error = %e, "UI did not acknowledge the final event");
            }
        }

        match action.execute() {
            Ok(()) => RunOutcome::Completed,
            Err(e) => RunOutcome::Failed(e.context(SbomError::ReportWrite)),
        }
    }

    async fn teardown(&mut self, status: RunStatus) {
        let cleanup = std::mem::replace(&mut self.cleanup, Box::new(|| Ok(())));
        if let Err(e) = cleanup() {
            tracing::warn!(error = %format!("{:#}", e), "cleanup failed");
        }

        self.subscription.unsubscribe();

        if let Some(ui) = self.ui.take() {
            if let Err(e) = ui.stop(status, self.ui_timeout).await {
                tracing::warn!(error = %e, "UI shutdown incomplete");
            }
        }
        tracing::debug!(?status, "event loop finished");
    }
}
