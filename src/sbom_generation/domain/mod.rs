pub mod artifact;
pub mod collector;
pub mod package;
pub mod sbom;
pub mod source;

pub use artifact::{ArtifactId, Relationship, RelationshipKind};
pub use collector::{ArtifactCollector, Artifacts};
pub use package::{LinuxDistribution, Package, PackageCatalog, PackageType};
pub use sbom::{Descriptor, Sbom};
pub use source::{Scope, Source, SourceInput, SourceMetadata, SourceScheme};
