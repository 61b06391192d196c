use super::artifact::Relationship;
use super::collector::Artifacts;
use super::source::SourceMetadata;
use serde::Serialize;

/// Describes the tool (and configuration) that produced an SBOM
#[derive(Debug, Clone, Serialize)]
pub struct Descriptor {
    pub name: String,
    pub version: String,
    pub timestamp: String,
    pub serial_number: String,
    /// Effective application configuration at the time of the run
    pub configuration: serde_json::Value,
}

impl Descriptor {
    pub fn new(configuration: serde_json::Value) -> Self {
        Self {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            serial_number: format!("urn:uuid:{}", uuid::Uuid::new_v4()),
            configuration,
        }
    }
}

/// The assembled Software Bill Of Materials handed to the report writer
#[derive(Debug, Clone, Serialize)]
pub struct Sbom {
    pub source: SourceMetadata,
    pub descriptor: Descriptor,
    pub artifacts: Artifacts,
    pub relationships: Vec<Relationship>,
}
