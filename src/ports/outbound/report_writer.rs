use crate::sbom_generation::domain::Sbom;
use crate::shared::Result;

/// ReportWriter port for the final "write the report" step
///
/// Invoked exactly once per successful run, after every cataloging task
/// has completed.
pub trait ReportWriter: Send + Sync {
    /// # Errors
    /// Returns an error if formatting or writing the report fails
    fn write(&self, sbom: &Sbom) -> Result<()>;
}
