use crate::application::events::Event;
use crate::ports::outbound::{Presenter, RunStatus};
use crate::shared::Result;
use std::io::{self, Write};

/// LogPresenter adapter writing one line per event
///
/// Used when output is not a terminal or when verbose logging is on, where
/// a live display would interleave badly with log records.
pub struct LogPresenter {
    out: Box<dyn Write + Send>,
}

impl LogPresenter {
    pub fn new(out: Box<dyn Write + Send>) -> Self {
        Self { out }
    }

    pub fn stderr() -> Self {
        Self::new(Box::new(io::stderr()))
    }

    fn line(&mut self, message: &str) -> Result<()> {
        writeln!(self.out, "{}", message)?;
        self.out.flush()?;
        Ok(())
    }
}

impl Presenter for LogPresenter {
    fn handle(&mut self, event: &Event) -> Result<()> {
        match event {
            Event::SourceResolved { description } => {
                self.line(&format!("📦 Loaded source: {}", description))
            }
            Event::TaskStarted { task } => self.line(&format!("🔍 Cataloging {}...", task)),
            Event::TaskFinished {
                task,
                relationships,
            } => self.line(&format!(
                "✅ {} complete ({} relationship(s))",
                task, relationships
            )),
            Event::TaskFailed { task, error } => {
                self.line(&format!("❌ {} failed: {}", task, error))
            }
            Event::CatalogingComplete {
                packages,
                relationships,
            } => self.line(&format!(
                "📊 Cataloged {} package(s) and {} relationship(s)",
                packages, relationships
            )),
            Event::Exit(_) => Ok(()),
        }
    }

    fn teardown(&mut self, status: RunStatus) -> Result<()> {
        match status {
            RunStatus::Cancelled => self.line("⚠️  Cancelled, no report was written"),
            RunStatus::Completed | RunStatus::Failed => Ok(()),
        }
    }
}
