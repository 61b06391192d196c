use crate::application::events::Event;
use crate::ports::outbound::{Presenter, RunStatus};
use crate::shared::Result;
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::collections::HashMap;
use std::time::Duration;

const TICK: Duration = Duration::from_millis(100);

/// InteractivePresenter adapter showing a live spinner per cataloging task
///
/// Draws on stderr through indicatif so that the report on stdout stays clean.
pub struct InteractivePresenter {
    multi: MultiProgress,
    tasks: HashMap<String, ProgressBar>,
    style: ProgressStyle,
}

impl InteractivePresenter {
    pub fn new() -> Result<Self> {
        Self::with_draw_target(ProgressDrawTarget::stderr())
    }

    pub fn with_draw_target(target: ProgressDrawTarget) -> Result<Self> {
        let style = ProgressStyle::default_spinner()
            .template("   {spinner:.green} {msg}")
            .map_err(|e| anyhow::anyhow!("Failed to set progress bar template: {}", e))?;
        Ok(Self {
            multi: MultiProgress::with_draw_target(target),
            tasks: HashMap::new(),
            style,
        })
    }

    fn note(&self, message: String) -> Result<()> {
        self.multi.println(message)?;
        Ok(())
    }

    fn finish(&mut self, task: &str, message: String) {
        match self.tasks.remove(task) {
            Some(bar) => bar.finish_with_message(message),
            None => {
                let _ = self.multi.println(message);
            }
        }
    }
}

impl Presenter for InteractivePresenter {
    fn handle(&mut self, event: &Event) -> Result<()> {
        match event {
            Event::SourceResolved { description } => {
                self.note(format!("📦 Loaded source: {}", description))?;
            }
            Event::TaskStarted { task } => {
                let bar = self.multi.add(ProgressBar::new_spinner());
                bar.set_style(self.style.clone());
                bar.set_message(format!("Cataloging {}...", task));
                bar.enable_steady_tick(TICK);
                self.tasks.insert(task.clone(), bar);
            }
            Event::TaskFinished {
                task,
                relationships,
            } => self.finish(
                task,
                format!("✅ {} ({} relationship(s))", task, relationships),
            ),
            Event::TaskFailed { task, error } => {
                self.finish(task, format!("❌ {}: {}", task, error))
            }
            Event::CatalogingComplete {
                packages,
                relationships,
            } => {
                self.note(format!(
                    "📊 Cataloged {} package(s) and {} relationship(s)",
                    packages, relationships
                ))?;
            }
            // The report is about to be written; get the live display out of the way
            Event::Exit(_) => self.multi.clear()?,
        }
        Ok(())
    }

    fn teardown(&mut self, status: RunStatus) -> Result<()> {
        for (_, bar) in self.tasks.drain() {
            bar.abandon();
        }
        self.multi.clear()?;
        if status == RunStatus::Cancelled {
            eprintln!("⚠️  Cancelled, no report was written");
        }
        Ok(())
    }
}
