use crate::ports::outbound::SbomFormatter;
use crate::sbom_generation::domain::Sbom;
use crate::shared::Result;

/// JsonFormatter adapter emitting the complete SBOM document
///
/// The document carries the source description, the tool descriptor
/// (including the effective configuration), every artifact and every
/// relationship.
pub struct JsonFormatter;

impl JsonFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl SbomFormatter for JsonFormatter {
    fn format(&self, sbom: &Sbom) -> Result<String> {
        let mut json = serde_json::to_string_pretty(sbom)?;
        json.push('\n');
        Ok(json)
    }
}
