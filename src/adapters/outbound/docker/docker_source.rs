use crate::ports::outbound::SourceProvider;
use crate::sbom_generation::domain::{Source, SourceInput, SourceMetadata, SourceScheme};
use crate::sbom_generation::services::{clean_image_reference, PathFilter};
use crate::shared::cleanup::CleanupRegistry;
use crate::shared::Result;
use anyhow::Context;
use async_trait::async_trait;
use std::ffi::OsStr;
use std::path::PathBuf;
use tokio::process::Command;

const DOCKER_SCHEME: &str = "docker:";

/// Placeholder command so that images without CMD can still be created.
/// The container is never started.
const PLACEHOLDER_COMMAND: &str = "/image-sbom-placeholder";

/// DockerSourceProvider adapter for images in the local docker daemon
///
/// The image filesystem is exported by creating a stopped container and
/// copying its root filesystem into a temporary directory. Both the container
/// and the directory are registered for cleanup as soon as they exist.
pub struct DockerSourceProvider {
    docker: PathBuf,
}

impl DockerSourceProvider {
    pub fn new() -> Self {
        Self::with_binary("docker")
    }

    /// Uses a specific docker CLI binary
    pub fn with_binary(docker: impl Into<PathBuf>) -> Self {
        Self {
            docker: docker.into(),
        }
    }

    async fn docker<I, S>(&self, args: I) -> Result<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let args: Vec<_> = args
            .into_iter()
            .map(|a| a.as_ref().to_os_string())
            .collect();
        let subcommand = args
            .first()
            .map(|a| a.to_string_lossy().into_owned())
            .unwrap_or_default();

        let output = Command::new(&self.docker)
            .args(&args)
            .kill_on_drop(true)
            .output()
            .await
            .with_context(|| format!("Failed to run {}", self.docker.display()))?;

        if !output.status.success() {
            anyhow::bail!(
                "docker {} failed ({}): {}",
                subcommand,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

impl Default for DockerSourceProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SourceProvider for DockerSourceProvider {
    fn accepts(&self, user_input: &str) -> bool {
        !user_input.is_empty() && !user_input.starts_with("dir:")
    }

    async fn provide(&self, input: &SourceInput, cleanup: &CleanupRegistry) -> Result<Source> {
        let raw = input
            .user_input
            .strip_prefix(DOCKER_SCHEME)
            .unwrap_or(&input.user_input);
        let reference = clean_image_reference(raw)?;
        let filter = PathFilter::new(input.exclusions.clone())?;

        let workdir = tempfile::Builder::new()
            .prefix("image-sbom-")
            .tempdir()
            .context("Failed to create a temporary directory")?;
        let rootfs = workdir.path().join("rootfs");
        let workdir_path = workdir.path().display().to_string();
        cleanup.register(format!("temporary directory {}", workdir_path), move || {
            workdir
                .close()
                .context("Failed to remove temporary directory")
        });

        let mut create_args = vec!["create".to_string()];
        if let Some(platform) = &input.platform {
            create_args.push("--platform".to_string());
            create_args.push(platform.clone());
        }
        create_args.push(reference.clone());
        create_args.push(PLACEHOLDER_COMMAND.to_string());

        tracing::debug!(image = %reference, "creating container");
        let container = self.docker(&create_args).await?;
        if container.is_empty() {
            anyhow::bail!("docker create returned no container id");
        }

        let docker = self.docker.clone();
        let container_id = container.clone();
        cleanup.register(format!("container {}", container), move || {
            let status = std::process::Command::new(&docker)
                .args(["rm", "--force", container_id.as_str()])
                .output()
                .with_context(|| format!("Failed to run {}", docker.display()))?;
            if !status.status.success() {
                anyhow::bail!(
                    "docker rm failed: {}",
                    String::from_utf8_lossy(&status.stderr).trim()
                );
            }
            Ok(())
        });

        tracing::debug!(container = %container, "exporting root filesystem");
        self.docker([
            "cp".to_string(),
            format!("{}:/", container),
            rootfs.display().to_string(),
        ])
        .await?;

        Ok(Source::new(
            SourceMetadata {
                scheme: SourceScheme::DockerDaemon,
                user_input: input.user_input.clone(),
                location: reference,
                platform: input.platform.clone(),
                scope: input.scope,
            },
            rootfs,
            filter,
        ))
    }
}
