use crate::sbom_generation::services::PathFilter;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Where the user input was resolved from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceScheme {
    /// A root filesystem already present on disk
    Directory,
    /// An image pulled out of the local docker daemon
    DockerDaemon,
}

/// Which view of the image filesystem the catalogers see
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Scope {
    #[default]
    Squashed,
    AllLayers,
}

impl FromStr for Scope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "squashed" => Ok(Scope::Squashed),
            "all" | "all-layers" => Ok(Scope::AllLayers),
            other => Err(format!(
                "bad scope value {:?}, options=[squashed all-layers]",
                other
            )),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Squashed => write!(f, "squashed"),
            Scope::AllLayers => write!(f, "all-layers"),
        }
    }
}

/// Description of the scanned source, embedded in the final SBOM
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceMetadata {
    pub scheme: SourceScheme,
    pub user_input: String,
    /// Directory path or normalised image reference
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    pub scope: Scope,
}

/// Input to a source provider, built from the CLI argument and configuration
#[derive(Debug, Clone)]
pub struct SourceInput {
    pub user_input: String,
    pub platform: Option<String>,
    pub scope: Scope,
    pub exclusions: Vec<String>,
}

/// Handle to a resolved root filesystem that cataloging tasks read from.
///
/// The handle is read-only and shared between concurrently running tasks.
#[derive(Debug)]
pub struct Source {
    metadata: SourceMetadata,
    root: PathBuf,
    filter: PathFilter,
}

impl Source {
    pub fn new(metadata: SourceMetadata, root: PathBuf, filter: PathFilter) -> Self {
        Self {
            metadata,
            root,
            filter,
        }
    }

    pub fn metadata(&self) -> &SourceMetadata {
        &self.metadata
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Maps an absolute in-source path (e.g. `/etc/os-release`) onto the host.
    ///
    /// Returns `None` when the path is excluded by the user's exclusion globs.
    pub fn resolve(&self, source_path: &str) -> Option<PathBuf> {
        if self.filter.is_excluded(source_path) {
            tracing::debug!(path = source_path, "path excluded from cataloging");
            return None;
        }
        Some(self.root.join(source_path.trim_start_matches('/')))
    }

    /// Exclusion globs that did not hide any path looked up so far
    pub fn unmatched_exclusions(&self) -> Vec<String> {
        self.filter.unmatched_patterns()
    }
}
