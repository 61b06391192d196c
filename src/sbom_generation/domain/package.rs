use super::artifact::ArtifactId;
use crate::shared::Result;
use serde::Serialize;
use std::fmt;

/// Maximum length for package names (security limit)
const MAX_PACKAGE_NAME_LENGTH: usize = 255;

/// Maximum length for package versions (security limit)
const MAX_VERSION_LENGTH: usize = 128;

/// Package manager ecosystem a package was discovered in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageType {
    Deb,
    Apk,
}

impl fmt::Display for PackageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PackageType::Deb => write!(f, "deb"),
            PackageType::Apk => write!(f, "apk"),
        }
    }
}

/// Package entity discovered inside a source
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Package {
    name: String,
    version: String,
    #[serde(rename = "type")]
    package_type: PackageType,
    /// Path (inside the source) of the database entry that revealed the package
    location: String,
}

impl Package {
    pub fn new(
        name: String,
        version: String,
        package_type: PackageType,
        location: String,
    ) -> Result<Self> {
        if name.is_empty() {
            anyhow::bail!("Package name cannot be empty");
        }
        if name.len() > MAX_PACKAGE_NAME_LENGTH {
            anyhow::bail!(
                "Package name is too long ({} bytes). Maximum allowed: {} bytes",
                name.len(),
                MAX_PACKAGE_NAME_LENGTH
            );
        }
        if name.chars().any(|c| c.is_whitespace() || c.is_control()) {
            anyhow::bail!("Package name '{}' contains whitespace", name);
        }
        if version.is_empty() {
            anyhow::bail!("Version for package '{}' cannot be empty", name);
        }
        if version.len() > MAX_VERSION_LENGTH {
            anyhow::bail!(
                "Version for package '{}' is too long ({} bytes). Maximum allowed: {} bytes",
                name,
                version.len(),
                MAX_VERSION_LENGTH
            );
        }

        Ok(Self {
            name,
            version,
            package_type,
            location,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn package_type(&self) -> PackageType {
        self.package_type
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn id(&self) -> ArtifactId {
        ArtifactId::new(format!(
            "{}:{}@{}",
            self.package_type, self.name, self.version
        ))
    }
}

/// Collection of every package found in a source, ordered by name then version
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PackageCatalog {
    packages: Vec<Package>,
}

impl PackageCatalog {
    pub fn new(mut packages: Vec<Package>) -> Self {
        packages.sort_by(|a, b| {
            a.name
                .cmp(&b.name)
                .then_with(|| a.version.cmp(&b.version))
                .then_with(|| a.package_type.cmp(&b.package_type))
        });
        packages.dedup_by(|a, b| a.id() == b.id());
        Self { packages }
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Package> {
        self.packages.iter()
    }

    /// Finds a package by name (first match in sort order)
    pub fn find_by_name(&self, name: &str) -> Option<&Package> {
        self.packages.iter().find(|p| p.name == name)
    }
}

/// Linux distribution detected from `os-release`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinuxDistribution {
    pub id: String,
    pub version_id: Option<String>,
    pub pretty_name: Option<String>,
}

impl fmt::Display for LinuxDistribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.pretty_name, &self.version_id) {
            (Some(pretty), _) => write!(f, "{}", pretty),
            (None, Some(version)) => write!(f, "{} {}", self.id, version),
            (None, None) => write!(f, "{}", self.id),
        }
    }
}
