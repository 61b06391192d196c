use crate::ports::outbound::{Cataloger, DistroDetector};
use crate::sbom_generation::domain::{
    ArtifactCollector, ArtifactId, PackageCatalog, Relationship, RelationshipKind, Source,
};
use crate::shared::Result;
use std::sync::Arc;

/// A unit of cataloging work.
///
/// Tasks run concurrently against the same source. Each task owns a disjoint
/// part of the [`ArtifactCollector`] and hands back the relationships it
/// discovered, in the order it discovered them.
pub trait Task: Send + Sync {
    fn name(&self) -> &str;

    fn run(&self, artifacts: &ArtifactCollector, source: &Source) -> Result<Vec<Relationship>>;
}

pub type SharedTask = Arc<dyn Task>;

/// Runs every package cataloger and owns the package catalog
pub struct CatalogPackagesTask {
    catalogers: Vec<Arc<dyn Cataloger>>,
}

impl CatalogPackagesTask {
    pub const NAME: &'static str = "packages";

    pub fn new(catalogers: Vec<Arc<dyn Cataloger>>) -> Self {
        Self { catalogers }
    }
}

impl Task for CatalogPackagesTask {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn run(&self, artifacts: &ArtifactCollector, source: &Source) -> Result<Vec<Relationship>> {
        let source_id = ArtifactId::new(format!("source:{}", source.metadata().location));
        let mut packages = Vec::new();
        let mut relationships = Vec::new();

        for cataloger in &self.catalogers {
            let (found, related) = cataloger
                .catalog(source)
                .map_err(|e| e.context(format!("{} cataloger failed", cataloger.name())))?;
            tracing::debug!(
                cataloger = cataloger.name(),
                packages = found.len(),
                relationships = related.len(),
                "cataloger finished"
            );

            for package in &found {
                relationships.push(Relationship::new(
                    source_id.clone(),
                    package.id(),
                    RelationshipKind::Contains,
                ));
            }
            relationships.extend(related);
            packages.extend(found);
        }

        artifacts.set_packages(PackageCatalog::new(packages))?;
        Ok(relationships)
    }
}

/// Identifies the Linux distribution and owns the distro field
pub struct DetectDistroTask {
    detector: Arc<dyn DistroDetector>,
}

impl DetectDistroTask {
    pub const NAME: &'static str = "distro";

    pub fn new(detector: Arc<dyn DistroDetector>) -> Self {
        Self { detector }
    }
}

impl Task for DetectDistroTask {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn run(&self, artifacts: &ArtifactCollector, source: &Source) -> Result<Vec<Relationship>> {
        match self.detector.detect(source)? {
            Some(distro) => {
                tracing::debug!(distro = %distro, "linux distribution identified");
                artifacts.set_distro(distro)?;
            }
            None => tracing::debug!("no linux distribution identified"),
        }
        Ok(Vec::new())
    }
}

/// Adapts a closure into a [`Task`]
pub struct FnTask<F> {
    name: String,
    run: F,
}

impl<F> Task for FnTask<F>
where
    F: Fn(&ArtifactCollector, &Source) -> Result<Vec<Relationship>> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&self, artifacts: &ArtifactCollector, source: &Source) -> Result<Vec<Relationship>> {
        (self.run)(artifacts, source)
    }
}

pub fn task_fn<F>(name: impl Into<String>, run: F) -> SharedTask
where
    F: Fn(&ArtifactCollector, &Source) -> Result<Vec<Relationship>> + Send + Sync + 'static,
{
    Arc::new(FnTask {
        name: name.into(),
        run,
    })
}
