//! image-sbom - SBOM generation for container images and root filesystems
//!
//! This library provides the orchestration core of the `image-sbom` CLI:
//! a background worker resolves the source and runs cataloging tasks
//! concurrently, while a coordinating event loop forwards progress to the
//! terminal UI, honours user interrupts and finally writes the report.
//!
//! # Architecture
//!
//! The library is organized into the following layers:
//!
//! - **Domain Layer** (`sbom_generation`): Packages, relationships, sources and the SBOM
//! - **Application Layer** (`application`): Event bus, task runner, worker and event loop
//! - **Ports** (`ports`): Interface definitions for infrastructure
//! - **Adapters** (`adapters`): Concrete implementations of ports
//! - **Shared** (`shared`): Common utilities and error types
//!
//! # Example
//!
//! ```no_run
//! use image_sbom::prelude::*;
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<()> {
//! let ctx = AppContext::new(AppConfig::default());
//! let writer = Arc::new(FormattedReportWriter::new(
//!     Box::new(JsonFormatter::new()),
//!     Box::new(StdoutPresenter::new()),
//! ));
//!
//! let subscription = ctx.subscribe();
//! let worker_errors = SbomWorker::new(
//!     ctx.bus.clone(),
//!     ctx.cleanup.clone(),
//!     TaskFactory::source_providers(),
//!     TaskFactory::create(&ctx.config),
//!     writer,
//! )
//! .spawn(SourceInput {
//!     user_input: "dir:./rootfs".to_string(),
//!     platform: None,
//!     scope: Scope::Squashed,
//!     exclusions: vec![],
//! });
//!
//! let outcome = EventLoop::new(worker_errors, setup_signals(), subscription)
//!     .run()
//!     .await;
//! std::process::exit(outcome.exit_code().as_i32());
//! # }
//! ```

pub mod adapters;
pub mod application;
pub mod config;
pub mod logging;
pub mod ports;
pub mod sbom_generation;
pub mod shared;
pub mod version;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::adapters::outbound::filesystem::{
        DirectorySourceProvider, FileSystemWriter, FormattedReportWriter, StdoutPresenter,
    };
    pub use crate::adapters::outbound::formatters::{JsonFormatter, TableFormatter};
    pub use crate::application::context::AppContext;
    pub use crate::application::event_loop::{EventLoop, RunOutcome};
    pub use crate::application::events::{Event, EventBus, ExitAction, Subscription};
    pub use crate::application::factories::{FormatterFactory, PresenterFactory, TaskFactory};
    pub use crate::application::runner::{TaskRun, TaskRunner};
    pub use crate::application::signals::{setup_signals, CancellationSignal};
    pub use crate::application::tasks::{task_fn, SharedTask, Task};
    pub use crate::application::worker::SbomWorker;
    pub use crate::config::AppConfig;
    pub use crate::ports::outbound::{
        Cataloger, OutputPresenter, Presenter, ReportWriter, RunStatus, SbomFormatter,
        SourceProvider,
    };
    pub use crate::sbom_generation::domain::{
        ArtifactCollector, Package, Relationship, Sbom, Scope, Source, SourceInput,
    };
    pub use crate::shared::{ExitCode, Result, SbomError};
}
