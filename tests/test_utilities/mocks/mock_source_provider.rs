use async_trait::async_trait;
use image_sbom::prelude::*;
use image_sbom::sbom_generation::domain::{SourceMetadata, SourceScheme};
use image_sbom::sbom_generation::services::PathFilter;
use image_sbom::shared::cleanup::CleanupRegistry;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Mock SourceProvider for testing
///
/// Registers a cleanup action before resolving, like a real provider that
/// acquired a temporary resource, and counts how often it was released.
#[derive(Default, Clone)]
pub struct MockSourceProvider {
    pub released: Arc<AtomicUsize>,
    failure: Option<String>,
}

impl MockSourceProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(message: &str) -> Self {
        Self {
            released: Arc::default(),
            failure: Some(message.to_string()),
        }
    }

    pub fn release_count(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SourceProvider for MockSourceProvider {
    fn accepts(&self, _user_input: &str) -> bool {
        true
    }

    async fn provide(&self, input: &SourceInput, cleanup: &CleanupRegistry) -> Result<Source> {
        let released = self.released.clone();
        cleanup.register("mock source", move || {
            released.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        if let Some(message) = &self.failure {
            anyhow::bail!("{}", message);
        }

        Ok(Source::new(
            SourceMetadata {
                scheme: SourceScheme::Directory,
                user_input: input.user_input.clone(),
                location: "/mock".to_string(),
                platform: input.platform.clone(),
                scope: input.scope,
            },
            PathBuf::from("/mock"),
            PathFilter::new(input.exclusions.clone())?,
        ))
    }
}
