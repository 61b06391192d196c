/// Mock implementations for testing
mod mock_presenter;
mod mock_report_writer;
mod mock_source_provider;
mod mock_tasks;

pub use mock_presenter::MockPresenter;
pub use mock_report_writer::MockReportWriter;
pub use mock_source_provider::MockSourceProvider;
pub use mock_tasks::{failing_task, relationship_task};
