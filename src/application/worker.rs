use crate::application::events::{Event, EventBus, ExitAction};
use crate::application::runner::TaskRunner;
use crate::application::tasks::SharedTask;
use crate::ports::outbound::{ReportWriter, SourceProvider};
use crate::sbom_generation::domain::{
    ArtifactCollector, Descriptor, Sbom, Source, SourceInput,
};
use crate::shared::cleanup::CleanupRegistry;
use crate::shared::{Result, SbomError};
use std::sync::Arc;
use tokio::sync::mpsc;

/// SbomWorker - background producer of the SBOM
///
/// Resolves the source, runs the cataloging tasks and, on success, publishes
/// [`Event::Exit`] carrying the deferred report write. The worker never writes
/// the report itself: whoever consumes the exit event decides whether it runs.
///
/// Failures are delivered on the error channel returned by [`SbomWorker::spawn`].
/// The channel carries at most one error and closes when the worker is done,
/// after any exit event has already been published.
pub struct SbomWorker {
    bus: EventBus,
    cleanup: CleanupRegistry,
    providers: Vec<Arc<dyn SourceProvider>>,
    tasks: Vec<SharedTask>,
    writer: Arc<dyn ReportWriter>,
    configuration: serde_json::Value,
}

impl SbomWorker {
    pub fn new(
        bus: EventBus,
        cleanup: CleanupRegistry,
        providers: Vec<Arc<dyn SourceProvider>>,
        tasks: Vec<SharedTask>,
        writer: Arc<dyn ReportWriter>,
    ) -> Self {
        Self {
            bus,
            cleanup,
            providers,
            tasks,
            writer,
            configuration: serde_json::Value::Null,
        }
    }

    /// Effective configuration recorded in the SBOM descriptor
    pub fn with_configuration(mut self, configuration: serde_json::Value) -> Self {
        self.configuration = configuration;
        self
    }

    pub fn spawn(self, input: SourceInput) -> mpsc::Receiver<anyhow::Error> {
        let (tx, rx) = mpsc::channel(1);
        tokio::spawn(async move {
            if let Err(e) = self.run(input).await {
                tracing::debug!(error = %format!("{:#}", e), "worker failed");
                let _ = tx.send(e).await;
            }
        });
        rx
    }

    async fn run(self, input: SourceInput) -> Result<()> {
        let source = self.resolve_source(&input).await?;
        self.bus.publish(Event::SourceResolved {
            description: format!("{} ({})", source.metadata().location, source.metadata().scope),
        });

        let source = Arc::new(source);
        let artifacts = Arc::new(ArtifactCollector::new());
        let relationships = TaskRunner::new(self.bus.clone())
            .spawn(self.tasks, artifacts.clone(), source.clone())
            .finish()
            .await?;

        for pattern in source.unmatched_exclusions() {
            tracing::warn!(pattern = %pattern, "exclusion pattern did not match any cataloged path");
        }

        let artifacts = Arc::try_unwrap(artifacts)
            .map_err(|_| anyhow::anyhow!("artifacts still shared after every task finished"))?
            .finalize();

        self.bus.publish(Event::CatalogingComplete {
            packages: artifacts.packages.len(),
            relationships: relationships.len(),
        });

        let sbom = Sbom {
            source: source.metadata().clone(),
            descriptor: Descriptor::new(self.configuration),
            artifacts,
            relationships,
        };

        let writer = self.writer;
        self.bus
            .publish(Event::Exit(ExitAction::new(move || writer.write(&sbom))));
        Ok(())
    }

    async fn resolve_source(&self, input: &SourceInput) -> Result<Source> {
        let construction_error = |details: String| SbomError::SourceConstruction {
            input: input.user_input.clone(),
            details,
        };

        let provider = self
            .providers
            .iter()
            .find(|provider| provider.accepts(&input.user_input))
            .ok_or_else(|| construction_error("no source provider accepts this input".to_string()))?;

        let source = provider
            .provide(input, &self.cleanup)
            .await
            .map_err(|e| construction_error(format!("{:#}", e)))?;

        tracing::info!(
            location = %source.metadata().location,
            scheme = ?source.metadata().scheme,
            "source resolved"
        );
        Ok(source)
    }
}
