use super::package::{LinuxDistribution, PackageCatalog};
use crate::shared::Result;
use serde::Serialize;
use std::sync::OnceLock;

/// Write-once aggregate populated by concurrently running cataloging tasks.
///
/// Every field belongs to exactly one task. A field can be set once; a second
/// write is rejected so that overlapping task responsibilities surface as an
/// error instead of silently overwriting each other.
#[derive(Debug, Default)]
pub struct ArtifactCollector {
    packages: OnceLock<PackageCatalog>,
    distro: OnceLock<LinuxDistribution>,
}

impl ArtifactCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_packages(&self, catalog: PackageCatalog) -> Result<()> {
        self.packages
            .set(catalog)
            .map_err(|_| anyhow::anyhow!("package catalog was already populated by another task"))
    }

    pub fn set_distro(&self, distro: LinuxDistribution) -> Result<()> {
        self.distro
            .set(distro)
            .map_err(|_| anyhow::anyhow!("linux distribution was already populated by another task"))
    }

    /// Consumes the collector once every task has finished
    pub fn finalize(self) -> Artifacts {
        Artifacts {
            packages: self.packages.into_inner().unwrap_or_default(),
            distro: self.distro.into_inner(),
        }
    }
}

/// Finalised artifacts, owned by the report-writing step
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Artifacts {
    pub packages: PackageCatalog,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distro: Option<LinuxDistribution>,
}
