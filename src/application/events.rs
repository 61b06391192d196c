//! In-process publish/subscribe bus for progress and finalisation events.
//!
//! Every subscriber owns an unbounded FIFO queue, so publishing never blocks
//! and never waits for a subscriber to drain. Each subscriber receives every
//! event published after it subscribed, in publication order.

use crate::shared::Result;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

type Deferred = Box<dyn FnOnce() -> Result<()> + Send>;

/// The deferred "write the report" step carried by [`Event::Exit`].
///
/// Clones share the same action; whichever clone executes first runs it and
/// every later attempt is rejected, so the report is written at most once no
/// matter how many subscribers observe the event.
#[derive(Clone)]
pub struct ExitAction {
    action: Arc<Mutex<Option<Deferred>>>,
}

impl ExitAction {
    pub fn new<F>(action: F) -> Self
    where
        F: FnOnce() -> Result<()> + Send + 'static,
    {
        Self {
            action: Arc::new(Mutex::new(Some(Box::new(action)))),
        }
    }

    /// Runs the action.
    ///
    /// # Errors
    /// Returns the action's own error, or an error if it already ran
    pub fn execute(&self) -> Result<()> {
        let action = self
            .action
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
        match action {
            Some(action) => action(),
            None => anyhow::bail!("exit action has already been executed"),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.action
            .lock()
            .map(|guard| guard.is_some())
            .unwrap_or(false)
    }
}

impl fmt::Debug for ExitAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExitAction")
            .field("pending", &self.is_pending())
            .finish()
    }
}

/// Events published on the bus
#[derive(Debug, Clone)]
pub enum Event {
    /// The user input was resolved into a readable source
    SourceResolved { description: String },
    /// A cataloging task began running
    TaskStarted { task: String },
    /// A cataloging task succeeded
    TaskFinished { task: String, relationships: usize },
    /// A cataloging task returned an error
    TaskFailed { task: String, error: String },
    /// Every task finished and the artifacts were assembled
    CatalogingComplete { packages: usize, relationships: usize },
    /// Final event of a successful run, carrying the report-write action
    Exit(ExitAction),
}

impl Event {
    /// Short, stable name used in log lines
    pub fn name(&self) -> &'static str {
        match self {
            Event::SourceResolved { .. } => "source-resolved",
            Event::TaskStarted { .. } => "task-started",
            Event::TaskFinished { .. } => "task-finished",
            Event::TaskFailed { .. } => "task-failed",
            Event::CatalogingComplete { .. } => "cataloging-complete",
            Event::Exit(_) => "exit",
        }
    }
}

type Subscribers = Arc<Mutex<Vec<(u64, UnboundedSender<Event>)>>>;

/// Broadcast bus. Cloning yields another publisher for the same bus.
#[derive(Clone, Default)]
pub struct EventBus {
    subscribers: Subscribers,
    next_id: Arc<AtomicU64>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publishes an event to every current subscriber without blocking
    pub fn publish(&self, event: Event) {
        tracing::trace!(event = event.name(), "publishing event");
        let mut subscribers = lock(&self.subscribers);
        // Receivers that were dropped without unsubscribing are pruned here
        subscribers.retain(|(_, tx)| tx.send(event.clone()).is_ok());
    }

    /// Registers a new subscriber
    pub fn subscribe(&self) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::unbounded_channel();
        lock(&self.subscribers).push((id, tx));
        Subscription {
            id,
            rx,
            subscribers: self.subscribers.clone(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        lock(&self.subscribers).len()
    }

    /// Detaches every subscriber; each can still drain what it already received
    pub fn close(&self) {
        lock(&self.subscribers).clear();
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

/// A subscriber's view of the bus
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    rx: UnboundedReceiver<Event>,
    subscribers: Subscribers,
}

impl Subscription {
    /// Waits for the next event; `None` once unsubscribed and drained
    pub async fn recv(&mut self) -> Option<Event> {
        self.rx.recv().await
    }

    /// Returns an already-queued event without waiting
    pub fn try_recv(&mut self) -> Option<Event> {
        self.rx.try_recv().ok()
    }

    /// Stops delivery of new events. Events already queued remain readable.
    pub fn unsubscribe(&mut self) {
        lock(&self.subscribers).retain(|(id, _)| *id != self.id);
        self.rx.close();
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        lock(&self.subscribers).retain(|(id, _)| *id != self.id);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
