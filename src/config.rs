//! Configuration file support for image-sbom.
//!
//! Provides YAML-based configuration through `image-sbom.config.yml` (or
//! `.image-sbom.yaml`) files. Values are layered: section defaults, then the
//! config file, then command-line flags.
//!
//! Every section implements [`ConfigSection`] and is listed explicitly in
//! [`AppConfig::sections_mut`], which is the single place defaults and
//! validation are driven from.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use crate::application::dto::OutputFormat;
use crate::sbom_generation::domain::Scope;
use crate::sbom_generation::services::PathFilter;
use crate::shared::{Result, SbomError};

const CONFIG_FILENAMES: [&str; 2] = ["image-sbom.config.yml", ".image-sbom.yaml"];

const LOG_LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

/// A named group of related options
pub trait ConfigSection {
    fn name(&self) -> &'static str;

    /// Fills in values left empty by the config file
    fn apply_defaults(&mut self);

    fn validate(&self) -> Result<()>;
}

fn invalid(section: &str, reason: impl Into<String>, hint: impl Into<String>) -> anyhow::Error {
    SbomError::InvalidConfig {
        section: section.to_string(),
        reason: reason.into(),
        hint: hint.into(),
    }
    .into()
}

/// Top-level configuration schema.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub package: PackageConfig,
    pub distro: DistroConfig,
    pub source: SourceConfig,
    pub output: OutputConfig,
    pub log: LogConfig,
    pub ui: UiConfig,
    /// Captures unknown fields for warnings.
    #[serde(flatten, skip_serializing)]
    pub unknown_fields: BTreeMap<String, serde_yaml_ng::Value>,
}

impl AppConfig {
    /// Every section, in the order defaults and validation are applied
    pub fn sections_mut(&mut self) -> [&mut dyn ConfigSection; 6] {
        [
            &mut self.package,
            &mut self.distro,
            &mut self.source,
            &mut self.output,
            &mut self.log,
            &mut self.ui,
        ]
    }

    /// Applies section defaults, then validates every section
    pub fn finalize(&mut self) -> Result<()> {
        for section in self.sections_mut() {
            section.apply_defaults();
        }
        for section in self.sections_mut() {
            section
                .validate()
                .with_context(|| format!("invalid '{}' configuration", section.name()))?;
        }
        Ok(())
    }

    /// Loads the explicit config file, or discovers one in `dir`.
    /// Falls back to defaults when neither exists.
    pub fn load(explicit: Option<&Path>, dir: &Path) -> Result<Self> {
        match explicit {
            Some(path) => load_config_from_path(path),
            None => Ok(discover_config(dir)?.unwrap_or_default()),
        }
    }

    /// Renders the effective configuration for the debug log
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml_ng::to_string(self).context("Failed to render configuration")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogerConfig {
    pub enabled: bool,
    /// `squashed` or `all-layers`
    pub scope: String,
}

impl Default for CatalogerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            scope: Scope::default().to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageConfig {
    pub cataloger: CatalogerConfig,
}

impl PackageConfig {
    pub fn scope(&self) -> Result<Scope> {
        Scope::from_str(&self.cataloger.scope)
            .map_err(|reason| invalid(self.name(), reason, "Use 'squashed' or 'all-layers'"))
    }
}

impl ConfigSection for PackageConfig {
    fn name(&self) -> &'static str {
        "package"
    }

    fn apply_defaults(&mut self) {
        if self.cataloger.scope.trim().is_empty() {
            self.cataloger.scope = Scope::default().to_string();
        }
    }

    fn validate(&self) -> Result<()> {
        self.scope().map(|_| ())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DistroConfig {
    pub enabled: bool,
}

impl Default for DistroConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl ConfigSection for DistroConfig {
    fn name(&self) -> &'static str {
        "distro"
    }

    fn apply_defaults(&mut self) {}

    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Image platform, e.g. `linux/arm64`
    pub platform: Option<String>,
    /// Path globs excluded from cataloging
    pub exclude: Vec<String>,
}

impl ConfigSection for SourceConfig {
    fn name(&self) -> &'static str {
        "source"
    }

    fn apply_defaults(&mut self) {
        if self
            .platform
            .as_deref()
            .is_some_and(|platform| platform.trim().is_empty())
        {
            self.platform = None;
        }
    }

    fn validate(&self) -> Result<()> {
        PathFilter::new(self.exclude.clone()).map_err(|e| {
            invalid(
                self.name(),
                e.to_string(),
                "Exclusion globs must start with '/', './', '*/' or '**/'",
            )
        })?;
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// `table` or `json`
    pub format: String,
    /// Report destination; stdout when unset
    pub file: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default().to_string(),
            file: None,
        }
    }
}

impl OutputConfig {
    pub fn format(&self) -> Result<OutputFormat> {
        OutputFormat::from_str(&self.format)
            .map_err(|reason| invalid(self.name(), reason, "Use 'table' or 'json'"))
    }
}

impl ConfigSection for OutputConfig {
    fn name(&self) -> &'static str {
        "output"
    }

    fn apply_defaults(&mut self) {
        if self.format.trim().is_empty() {
            self.format = OutputFormat::default().to_string();
        }
    }

    fn validate(&self) -> Result<()> {
        self.format().map(|_| ())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Explicit level; mutually exclusive with `-v`
    pub level: Option<String>,
    /// Log destination; console only when unset
    pub file: Option<PathBuf>,
    /// Emit JSON lines instead of human-readable logs
    pub structured: bool,
}

impl ConfigSection for LogConfig {
    fn name(&self) -> &'static str {
        "log"
    }

    fn apply_defaults(&mut self) {
        if let Some(level) = &self.level {
            let level = level.trim().to_lowercase();
            self.level = (!level.is_empty()).then_some(level);
        }
    }

    fn validate(&self) -> Result<()> {
        match self.level.as_deref() {
            Some(level) if !LOG_LEVELS.contains(&level) => Err(invalid(
                self.name(),
                format!("unknown log level '{}'", level),
                format!("Use one of: {}", LOG_LEVELS.join(", ")),
            )),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// How long teardown waits for the UI before giving up
    pub shutdown_timeout_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            shutdown_timeout_ms: 2000,
        }
    }
}

impl UiConfig {
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_millis(self.shutdown_timeout_ms)
    }
}

impl ConfigSection for UiConfig {
    fn name(&self) -> &'static str {
        "ui"
    }

    fn apply_defaults(&mut self) {}

    fn validate(&self) -> Result<()> {
        if self.shutdown_timeout_ms == 0 {
            return Err(invalid(
                self.name(),
                "shutdown_timeout_ms must be greater than zero",
                "A value around 2000 (two seconds) is usually enough",
            ));
        }
        Ok(())
    }
}

/// Load config from an explicit path. Returns an error if the file is not found.
pub fn load_config_from_path(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).with_context(|| {
        format!(
            "Failed to read config file: {}\n\n💡 Hint: Check that the file exists and is readable.",
            path.display()
        )
    })?;

    let config: AppConfig = serde_yaml_ng::from_str(&content).with_context(|| {
        format!(
            "Failed to parse config file: {}\n\n💡 Hint: Ensure the file contains valid YAML syntax.",
            path.display()
        )
    })?;

    warn_unknown_fields(&config);
    tracing::debug!(path = %path.display(), "loaded config file");

    Ok(config)
}

/// Auto-discover config in a directory. Returns `None` silently if not found.
pub fn discover_config(dir: &Path) -> Result<Option<AppConfig>> {
    for filename in CONFIG_FILENAMES {
        let config_path = dir.join(filename);
        if config_path.exists() {
            return load_config_from_path(&config_path).map(Some);
        }
    }
    Ok(None)
}

/// Warn about unknown fields in the config file.
fn warn_unknown_fields(config: &AppConfig) {
    for key in config.unknown_fields.keys() {
        eprintln!(
            "⚠️  Warning: Unknown config field '{}' will be ignored.",
            key
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_valid_config() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            "config.yml",
            r#"
package:
  cataloger:
    enabled: true
    scope: all-layers
distro:
  enabled: false
source:
  platform: linux/arm64
  exclude:
    - /usr/share/doc
    - "**/*.pyc"
output:
  format: json
  file: sbom.json
log:
  level: info
  structured: true
ui:
  shutdown_timeout_ms: 500
"#,
        );

        let mut config = load_config_from_path(&path).unwrap();
        config.finalize().unwrap();

        assert_eq!(config.package.scope().unwrap(), Scope::AllLayers);
        assert!(!config.distro.enabled);
        assert_eq!(config.source.platform.as_deref(), Some("linux/arm64"));
        assert_eq!(config.source.exclude.len(), 2);
        assert_eq!(config.output.format().unwrap(), OutputFormat::Json);
        assert_eq!(config.output.file, Some(PathBuf::from("sbom.json")));
        assert_eq!(config.log.level.as_deref(), Some("info"));
        assert!(config.log.structured);
        assert_eq!(config.ui.shutdown_timeout(), Duration::from_millis(500));
    }

    #[test]
    fn test_defaults() {
        let mut config = AppConfig::default();
        config.finalize().unwrap();

        assert!(config.package.cataloger.enabled);
        assert_eq!(config.package.scope().unwrap(), Scope::Squashed);
        assert!(config.distro.enabled);
        assert_eq!(config.output.format().unwrap(), OutputFormat::Table);
        assert!(config.log.level.is_none());
        assert_eq!(config.ui.shutdown_timeout_ms, 2000);
        assert!(config.unknown_fields.is_empty());
    }

    #[test]
    fn test_empty_values_fall_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            "config.yml",
            "package:\n  cataloger:\n    scope: \"\"\noutput:\n  format: \"\"\nlog:\n  level: \" \"\n",
        );

        let mut config = load_config_from_path(&path).unwrap();
        config.finalize().unwrap();
        assert_eq!(config.package.cataloger.scope, "squashed");
        assert_eq!(config.output.format, "table");
        assert!(config.log.level.is_none());
    }

    #[test]
    fn test_discover_config_found() {
        let dir = TempDir::new().unwrap();
        write_config(&dir, "image-sbom.config.yml", "output:\n  format: json\n");

        let config = discover_config(dir.path()).unwrap().unwrap();
        assert_eq!(config.output.format, "json");
    }

    #[test]
    fn test_discover_hidden_config() {
        let dir = TempDir::new().unwrap();
        write_config(&dir, ".image-sbom.yaml", "distro:\n  enabled: false\n");

        let config = discover_config(dir.path()).unwrap().unwrap();
        assert!(!config.distro.enabled);
    }

    #[test]
    fn test_discover_config_not_found() {
        let dir = TempDir::new().unwrap();
        assert!(discover_config(dir.path()).unwrap().is_none());
        let config = AppConfig::load(None, dir.path()).unwrap();
        assert_eq!(config.output.format, "table");
    }

    #[test]
    fn test_load_config_missing_file() {
        let err = load_config_from_path(Path::new("/nonexistent/config.yml")).unwrap_err();
        assert!(format!("{}", err).contains("Failed to read config file"));
    }

    #[test]
    fn test_load_config_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "bad.yml", "invalid: yaml: [[[broken");

        let err = load_config_from_path(&path).unwrap_err();
        assert!(format!("{}", err).contains("Failed to parse config file"));
    }

    #[test]
    fn test_bad_scope_is_rejected() {
        let mut config = AppConfig::default();
        config.package.cataloger.scope = "layers".to_string();

        let err = config.finalize().unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.contains("invalid 'package' configuration"));
        assert!(message.contains("bad scope value"));
    }

    #[test]
    fn test_bad_exclusion_is_rejected() {
        let mut config = AppConfig::default();
        config.source.exclude = vec!["usr/share".to_string()];
        assert!(config.finalize().is_err());
    }

    #[test]
    fn test_bad_format_is_rejected() {
        let mut config = AppConfig::default();
        config.output.format = "spdx".to_string();

        let err = config.finalize().unwrap_err();
        assert!(format!("{:#}", err).contains("Invalid format: spdx"));
    }

    #[test]
    fn test_bad_log_level_is_rejected() {
        let mut config = AppConfig::default();
        config.log.level = Some("loud".to_string());
        assert!(config.finalize().is_err());
    }

    #[test]
    fn test_zero_ui_timeout_is_rejected() {
        let mut config = AppConfig::default();
        config.ui.shutdown_timeout_ms = 0;
        assert!(config.finalize().is_err());
    }

    #[test]
    fn test_unknown_fields_are_collected() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            "config.yml",
            "output:\n  format: json\nunknown_field: true\nanother_unknown: value\n",
        );

        let config = load_config_from_path(&path).unwrap();
        assert_eq!(config.unknown_fields.len(), 2);
        assert!(config.unknown_fields.contains_key("unknown_field"));
    }

    #[test]
    fn test_sections_are_listed_in_order() {
        let mut config = AppConfig::default();
        let names: Vec<_> = config.sections_mut().iter().map(|s| s.name()).collect();
        assert_eq!(
            names,
            vec!["package", "distro", "source", "output", "log", "ui"]
        );
    }

    #[test]
    fn test_yaml_rendering_skips_unknown_fields() {
        let mut config = AppConfig::default();
        config
            .unknown_fields
            .insert("extra".to_string(), serde_yaml_ng::Value::Bool(true));

        let yaml = config.to_yaml().unwrap();
        assert!(yaml.contains("shutdown_timeout_ms: 2000"));
        assert!(!yaml.contains("extra"));
    }
}
