use crate::ports::outbound::SourceProvider;
use crate::sbom_generation::domain::{
    Source, SourceInput, SourceMetadata, SourceScheme,
};
use crate::sbom_generation::services::PathFilter;
use crate::shared::cleanup::CleanupRegistry;
use crate::shared::Result;
use anyhow::Context;
use async_trait::async_trait;
use std::path::Path;

const DIR_SCHEME: &str = "dir:";

/// DirectorySourceProvider adapter for root filesystems already on disk
///
/// Accepts `dir:<path>` or any path that is an existing directory.
pub struct DirectorySourceProvider;

impl DirectorySourceProvider {
    pub fn new() -> Self {
        Self
    }

    fn path_of(user_input: &str) -> &str {
        user_input.strip_prefix(DIR_SCHEME).unwrap_or(user_input)
    }
}

impl Default for DirectorySourceProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SourceProvider for DirectorySourceProvider {
    fn accepts(&self, user_input: &str) -> bool {
        user_input.starts_with(DIR_SCHEME) || Path::new(user_input).is_dir()
    }

    async fn provide(&self, input: &SourceInput, _cleanup: &CleanupRegistry) -> Result<Source> {
        let path = Self::path_of(&input.user_input);
        let root = tokio::fs::canonicalize(path)
            .await
            .with_context(|| format!("Directory not found: {}", path))?;

        let metadata = tokio::fs::metadata(&root)
            .await
            .with_context(|| format!("Failed to read metadata of {}", root.display()))?;
        if !metadata.is_dir() {
            anyhow::bail!("{} is not a directory", root.display());
        }

        if input.platform.is_some() {
            tracing::warn!("--platform has no effect on directory sources");
        }

        let filter = PathFilter::new(input.exclusions.clone())?;
        Ok(Source::new(
            SourceMetadata {
                scheme: SourceScheme::Directory,
                user_input: input.user_input.clone(),
                location: root.display().to_string(),
                platform: None,
                scope: input.scope,
            },
            root,
            filter,
        ))
    }
}
