mod formatter_factory;
mod presenter_factory;
mod task_factory;

pub use formatter_factory::FormatterFactory;
pub use presenter_factory::{OutputTarget, PresenterFactory};
pub use task_factory::TaskFactory;
