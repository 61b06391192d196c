//! Build and version information for `image-sbom version`.

use serde::Serialize;
use std::fmt;

/// Version details of the running binary.
///
/// Git commit and build date are injected at build time through the
/// `IMAGE_SBOM_GIT_COMMIT` and `IMAGE_SBOM_BUILD_DATE` environment variables.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionInfo {
    pub application: &'static str,
    pub version: &'static str,
    pub git_commit: &'static str,
    pub build_date: &'static str,
    pub platform: String,
}

impl VersionInfo {
    pub fn current() -> Self {
        Self {
            application: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            git_commit: option_env!("IMAGE_SBOM_GIT_COMMIT").unwrap_or("unknown"),
            build_date: option_env!("IMAGE_SBOM_BUILD_DATE").unwrap_or("unknown"),
            platform: format!("{}/{}", std::env::consts::OS, std::env::consts::ARCH),
        }
    }
}

impl fmt::Display for VersionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Application:  {}", self.application)?;
        writeln!(f, "Version:      {}", self.version)?;
        writeln!(f, "GitCommit:    {}", self.git_commit)?;
        writeln!(f, "BuildDate:    {}", self.build_date)?;
        write!(f, "Platform:     {}", self.platform)
    }
}
