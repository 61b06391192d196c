/// Filesystem adapters: directory sources and report output
mod directory_source;
mod file_writer;
mod report_writer;

pub use directory_source::DirectorySourceProvider;
pub use file_writer::{FileSystemWriter, StdoutPresenter};
pub use report_writer::FormattedReportWriter;
