use crate::adapters::outbound::catalogers::{ApkCataloger, DpkgCataloger, OsReleaseDetector};
use crate::adapters::outbound::docker::DockerSourceProvider;
use crate::adapters::outbound::filesystem::DirectorySourceProvider;
use crate::application::tasks::{CatalogPackagesTask, DetectDistroTask, SharedTask};
use crate::config::AppConfig;
use crate::ports::outbound::{Cataloger, SourceProvider};
use std::sync::Arc;

type TaskGenerator = fn(&AppConfig) -> Option<SharedTask>;

/// Factory for the cataloging tasks and source providers of a run
pub struct TaskFactory;

impl TaskFactory {
    /// Builds every enabled cataloging task, in a stable order
    pub fn create(config: &AppConfig) -> Vec<SharedTask> {
        let generators: [TaskGenerator; 2] = [packages_task, distro_task];
        generators
            .iter()
            .filter_map(|generate| generate(config))
            .collect()
    }

    /// Source providers in match order; the directory provider goes first
    /// because the docker provider accepts any reference-like input
    pub fn source_providers() -> Vec<Arc<dyn SourceProvider>> {
        vec![
            Arc::new(DirectorySourceProvider::new()),
            Arc::new(DockerSourceProvider::new()),
        ]
    }
}

fn packages_task(config: &AppConfig) -> Option<SharedTask> {
    if !config.package.cataloger.enabled {
        return None;
    }
    let catalogers: Vec<Arc<dyn Cataloger>> =
        vec![Arc::new(DpkgCataloger::new()), Arc::new(ApkCataloger::new())];
    Some(Arc::new(CatalogPackagesTask::new(catalogers)))
}

fn distro_task(config: &AppConfig) -> Option<SharedTask> {
    config
        .distro
        .enabled
        .then(|| Arc::new(DetectDistroTask::new(Arc::new(OsReleaseDetector::new()))) as SharedTask)
}
