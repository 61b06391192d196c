use crate::adapters::outbound::formatters::{JsonFormatter, TableFormatter};
use crate::application::dto::OutputFormat;
use crate::ports::outbound::SbomFormatter;

/// Factory for creating SBOM formatters
///
/// This factory encapsulates the creation logic for different formatter implementations,
/// following the Factory Pattern. It belongs in the application layer as it orchestrates
/// the selection of infrastructure adapters based on application needs.
pub struct FormatterFactory;

impl FormatterFactory {
    /// Creates a formatter instance for the specified output format
    ///
    /// # Arguments
    /// * `format` - The output format to create a formatter for
    /// * `colored` - Whether the output goes to a color-capable terminal
    ///
    /// # Examples
    /// ```
    /// use image_sbom::application::dto::OutputFormat;
    /// use image_sbom::application::factories::FormatterFactory;
    ///
    /// let formatter = FormatterFactory::create(OutputFormat::Json, false);
    /// ```
    pub fn create(format: OutputFormat, colored: bool) -> Box<dyn SbomFormatter> {
        match format {
            OutputFormat::Table => Box::new(TableFormatter::colored(colored)),
            OutputFormat::Json => Box::new(JsonFormatter::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sbom_generation::domain::{
        Artifacts, Descriptor, Sbom, Scope, SourceMetadata, SourceScheme,
    };

    fn empty_sbom() -> Sbom {
        Sbom {
            source: SourceMetadata {
                scheme: SourceScheme::Directory,
                user_input: "dir:rootfs".to_string(),
                location: "/rootfs".to_string(),
                platform: None,
                scope: Scope::Squashed,
            },
            descriptor: Descriptor::new(serde_json::Value::Null),
            artifacts: Artifacts::default(),
            relationships: vec![],
        }
    }

    #[test]
    fn test_create_table_formatter() {
        let output = FormatterFactory::create(OutputFormat::Table, false)
            .format(&empty_sbom())
            .unwrap();
        assert_eq!(output, "No packages discovered\n");
    }

    #[test]
    fn test_create_json_formatter() {
        let output = FormatterFactory::create(OutputFormat::Json, false)
            .format(&empty_sbom())
            .unwrap();
        assert!(serde_json::from_str::<serde_json::Value>(&output).is_ok());
    }
}
