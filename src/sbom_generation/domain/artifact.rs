use serde::Serialize;
use std::fmt;

/// Stable identifier of a catalogued artifact (package, file, source root)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ArtifactId(String);

impl ArtifactId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Identifier of a file inside the source, e.g. `file:/var/lib/dpkg/status`
    pub fn file(path: &str) -> Self {
        Self(format!("file:{}", path))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of edge between two artifacts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RelationshipKind {
    /// `from` contains `to` (e.g. an image contains a package)
    Contains,
    /// `from` was discovered by evidence found in `to`
    EvidentBy,
    /// `from` is a dependency of `to`
    DependencyOf,
}

impl fmt::Display for RelationshipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RelationshipKind::Contains => "contains",
            RelationshipKind::EvidentBy => "evident-by",
            RelationshipKind::DependencyOf => "dependency-of",
        };
        write!(f, "{}", name)
    }
}

/// A directed, immutable edge between two catalogued artifacts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Relationship {
    from: ArtifactId,
    to: ArtifactId,
    kind: RelationshipKind,
}

impl Relationship {
    pub fn new(from: ArtifactId, to: ArtifactId, kind: RelationshipKind) -> Self {
        Self { from, to, kind }
    }

    pub fn from(&self) -> &ArtifactId {
        &self.from
    }

    pub fn to(&self) -> &ArtifactId {
        &self.to
    }

    pub fn kind(&self) -> RelationshipKind {
        self.kind
    }
}
