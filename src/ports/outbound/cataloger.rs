use crate::sbom_generation::domain::{LinuxDistribution, Package, Relationship, Source};
use crate::shared::Result;

/// Packages discovered by a cataloger together with the edges between them
pub type CatalogResult = (Vec<Package>, Vec<Relationship>);

/// Cataloger port for package-manager specific discovery
///
/// Implementations perform blocking filesystem I/O and are executed on a
/// blocking worker thread by the task runner.
pub trait Cataloger: Send + Sync {
    /// Short identifier, e.g. "dpkg-db-cataloger"
    fn name(&self) -> &str;

    /// Catalogs the source, returning an empty result when the
    /// package manager is not present
    ///
    /// # Errors
    /// Returns an error if the package database exists but cannot be read or parsed
    fn catalog(&self, source: &Source) -> Result<CatalogResult>;
}

/// DistroDetector port for identifying the Linux distribution of a source
pub trait DistroDetector: Send + Sync {
    /// # Errors
    /// Returns an error if a release file exists but cannot be read
    fn detect(&self, source: &Source) -> Result<Option<LinuxDistribution>>;
}
