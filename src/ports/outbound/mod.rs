/// Outbound ports (Driven ports) - Infrastructure interfaces
///
/// These ports define the interfaces that the application core uses
/// to interact with external systems (docker, file system, terminal, etc.).
pub mod cataloger;
pub mod formatter;
pub mod output_presenter;
pub mod presenter;
pub mod report_writer;
pub mod source_provider;

pub use cataloger::{CatalogResult, Cataloger, DistroDetector};
pub use formatter::SbomFormatter;
pub use output_presenter::OutputPresenter;
pub use presenter::{Presenter, RunStatus};
pub use report_writer::ReportWriter;
pub use source_provider::SourceProvider;
