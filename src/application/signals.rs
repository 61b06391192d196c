//! Converts user interrupts into a single cancellation signal.

use crate::shared::ExitCode;
use futures::{Stream, StreamExt};
use std::sync::Arc;
use tokio::sync::watch;

/// Read side of a one-shot cancellation latch.
///
/// Once tripped it stays tripped. If nothing can trip it any more (the
/// interrupt source ended), [`CancellationSignal::cancelled`] never resolves.
#[derive(Debug, Clone)]
pub struct CancellationSignal {
    rx: watch::Receiver<bool>,
}

impl CancellationSignal {
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once the latch has been tripped
    pub async fn cancelled(&mut self) {
        if self.rx.wait_for(|tripped| *tripped).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

/// Write side of the cancellation latch
#[derive(Debug, Clone)]
pub struct CancellationTrigger {
    tx: Arc<watch::Sender<bool>>,
}

impl CancellationTrigger {
    /// Trips the latch. Returns true only for the call that tripped it.
    pub fn cancel(&self) -> bool {
        self.tx.send_if_modified(|tripped| {
            let first = !*tripped;
            *tripped = true;
            first
        })
    }
}

/// Creates a connected trigger/signal pair
pub fn cancellation() -> (CancellationTrigger, CancellationSignal) {
    let (tx, rx) = watch::channel(false);
    (
        CancellationTrigger { tx: Arc::new(tx) },
        CancellationSignal { rx },
    )
}

/// Installs the SIGINT (Ctrl+C) handler for this run.
///
/// The first interrupt trips the returned signal. A second interrupt while the
/// first is still being handled exits the process immediately with
/// [`ExitCode::Interrupted`], without waiting for teardown.
///
/// Must be called from within a tokio runtime.
pub fn setup_signals() -> CancellationSignal {
    let interrupts = futures::stream::unfold((), |()| async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => Some(((), ())),
            Err(e) => {
                tracing::warn!(error = %e, "unable to listen for interrupts");
                None
            }
        }
    });

    monitor_interrupts(interrupts, || {
        eprintln!("\nForce quit");
        std::process::exit(ExitCode::Interrupted.as_i32());
    })
}

/// Watches `interrupts` and trips the returned signal on the first item.
///
/// `force_exit` runs if a second item arrives.
pub fn monitor_interrupts<S, F>(interrupts: S, force_exit: F) -> CancellationSignal
where
    S: Stream<Item = ()> + Send + 'static,
    F: FnOnce() + Send + 'static,
{
    let (trigger, signal) = cancellation();

    tokio::spawn(async move {
        let mut interrupts = Box::pin(interrupts);

        if interrupts.next().await.is_none() {
            return;
        }
        tracing::info!("interrupt received, cancelling (interrupt again to force quit)");
        trigger.cancel();

        if interrupts.next().await.is_some() {
            tracing::warn!("second interrupt received, forcing exit");
            force_exit();
        }
    });

    signal
}
