use crate::application::events::Event;
use crate::shared::Result;

/// How the run ended, as reported to the UI at teardown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Completed,
    Cancelled,
    Failed,
}

/// Presenter port for rendering bus events to the user's terminal
///
/// A presenter runs on its own thread and receives every bus event in
/// publication order. `teardown` is called exactly once, after the last
/// event relevant to the final status has been handled.
pub trait Presenter: Send {
    /// Renders a single event
    ///
    /// # Errors
    /// Returns an error if the terminal cannot be written to
    fn handle(&mut self, event: &Event) -> Result<()>;

    /// Finishes rendering (clears live displays, prints the final status line)
    ///
    /// # Errors
    /// Returns an error if the terminal cannot be written to
    fn teardown(&mut self, status: RunStatus) -> Result<()>;
}
