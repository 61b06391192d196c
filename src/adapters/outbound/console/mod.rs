/// Console presenters rendering bus events to stderr
mod interactive_presenter;
mod log_presenter;

pub use interactive_presenter::InteractivePresenter;
pub use log_presenter::LogPresenter;
