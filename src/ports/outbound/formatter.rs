use crate::sbom_generation::domain::Sbom;
use crate::shared::Result;

/// SbomFormatter port for formatting SBOM output
///
/// This port abstracts the formatting logic for different report formats
/// (table, JSON).
pub trait SbomFormatter: Send + Sync {
    /// Formats the assembled SBOM
    ///
    /// # Errors
    /// Returns an error if formatting or serialization fails
    fn format(&self, sbom: &Sbom) -> Result<String>;
}
