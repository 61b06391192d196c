use crate::sbom_generation::domain::{Source, SourceInput};
use crate::shared::cleanup::CleanupRegistry;
use crate::shared::Result;
use async_trait::async_trait;

/// SourceProvider port for turning user input into a readable root filesystem
///
/// Providers acquire resources (temporary directories, containers) and must
/// register their release with `cleanup` as soon as the resource exists, so
/// that a partially constructed source is still released when construction
/// fails or the run is interrupted.
#[async_trait]
pub trait SourceProvider: Send + Sync {
    /// Returns true if this provider understands the given user input
    fn accepts(&self, user_input: &str) -> bool;

    /// Resolves the input into a source handle
    ///
    /// # Errors
    /// Returns an error if the image or directory cannot be acquired
    async fn provide(&self, input: &SourceInput, cleanup: &CleanupRegistry) -> Result<Source>;
}
