use crate::adapters::outbound::console::{InteractivePresenter, LogPresenter};
use crate::adapters::outbound::filesystem::{FileSystemWriter, StdoutPresenter};
use crate::application::ui::PresenterKind;
use crate::ports::outbound::{OutputPresenter, Presenter};
use crate::shared::Result;
use std::path::PathBuf;

/// Where the report goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    Stdout,
    File(PathBuf),
}

impl From<Option<PathBuf>> for OutputTarget {
    fn from(path: Option<PathBuf>) -> Self {
        path.map_or(OutputTarget::Stdout, OutputTarget::File)
    }
}

/// Factory for creating output and UI presenters
///
/// This factory encapsulates the creation logic for different presenter implementations,
/// following the Factory Pattern. It belongs in the application layer as it orchestrates
/// the selection of infrastructure adapters based on application needs.
pub struct PresenterFactory;

impl PresenterFactory {
    /// Creates the presenter the report is written through
    ///
    /// # Examples
    /// ```
    /// use image_sbom::application::factories::{OutputTarget, PresenterFactory};
    ///
    /// let presenter = PresenterFactory::create_output(OutputTarget::Stdout);
    /// ```
    pub fn create_output(target: OutputTarget) -> Box<dyn OutputPresenter> {
        match target {
            OutputTarget::Stdout => Box::new(StdoutPresenter::new()),
            OutputTarget::File(path) => Box::new(FileSystemWriter::new(path)),
        }
    }

    /// Creates the presenter that renders bus events, if any
    ///
    /// # Errors
    /// Returns an error if the live display cannot be set up
    pub fn create_ui(kind: PresenterKind) -> Result<Option<Box<dyn Presenter>>> {
        let presenter: Box<dyn Presenter> = match kind {
            PresenterKind::None => return Ok(None),
            PresenterKind::Log => Box::new(LogPresenter::stderr()),
            PresenterKind::Interactive => Box::new(InteractivePresenter::new()?),
        };
        Ok(Some(presenter))
    }
}
