use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

use image_sbom::application::dto::OutputFormat;
use image_sbom::config::AppConfig;
use image_sbom::logging::Verbosity;
use image_sbom::sbom_generation::domain::Scope;

/// Generate an SBOM for a container image or root filesystem
#[derive(Parser, Debug)]
#[command(name = "image-sbom")]
#[command(version)]
#[command(
    about = "Generate an SBOM for a container image or root filesystem",
    long_about = None
)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Image reference (e.g. alpine:3.19) or dir:<path> of a root filesystem
    #[arg(value_name = "IMAGE")]
    pub image: Option<String>,

    /// Suppress all progress output and logging
    #[arg(long)]
    pub quiet: bool,

    /// Report format: table or json
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Exclude paths matching a glob from cataloging (e.g. "/usr/share/**")
    /// Can be specified multiple times
    #[arg(long = "exclude", value_name = "GLOB")]
    pub exclude: Vec<String>,

    /// Platform of the image, e.g. linux/arm64
    #[arg(long, value_name = "PLATFORM")]
    pub platform: Option<String>,

    /// Layers to catalog: squashed or all
    #[arg(long, value_name = "SCOPE")]
    pub layers: Option<Scope>,

    /// Enable debug logging
    #[arg(short = 'D', long)]
    pub debug: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, action = ArgAction::Count)]
    pub verbose: u8,

    /// Path to a configuration file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show version information
    Version {
        /// Output format: text or json
        #[arg(long, default_value = "text")]
        format: String,
    },
}

impl Args {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Applies command-line flags on top of the file configuration
    pub fn apply_to(&self, config: &mut AppConfig) {
        if let Some(format) = self.format {
            config.output.format = format.to_string();
        }
        if let Some(output) = &self.output {
            config.output.file = Some(output.clone());
        }
        config.source.exclude.extend(self.exclude.iter().cloned());
        if let Some(platform) = &self.platform {
            config.source.platform = Some(platform.clone());
        }
        if let Some(scope) = self.layers {
            config.package.cataloger.scope = scope.to_string();
        }
    }

    pub fn verbosity(&self) -> Verbosity {
        Verbosity {
            quiet: self.quiet,
            verbose: self.verbose,
            debug: self.debug,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_image_and_flags() {
        let args = Args::try_parse_from([
            "image-sbom",
            "--format",
            "json",
            "-o",
            "sbom.json",
            "--exclude",
            "/usr/share/**",
            "--exclude",
            "./tmp",
            "--layers",
            "all",
            "-vv",
            "alpine",
        ])
        .unwrap();

        assert_eq!(args.image.as_deref(), Some("alpine"));
        assert_eq!(args.format, Some(OutputFormat::Json));
        assert_eq!(args.output, Some(PathBuf::from("sbom.json")));
        assert_eq!(args.exclude.len(), 2);
        assert_eq!(args.layers, Some(Scope::AllLayers));
        assert_eq!(args.verbose, 2);
        assert!(args.command.is_none());
    }

    #[test]
    fn test_version_subcommand() {
        let args = Args::try_parse_from(["image-sbom", "version"]).unwrap();
        assert!(matches!(args.command, Some(Command::Version { .. })));
        assert!(args.image.is_none());
    }

    #[test]
    fn test_image_is_optional_at_parse_time() {
        let args = Args::try_parse_from(["image-sbom"]).unwrap();
        assert!(args.image.is_none());
    }

    #[test]
    fn test_invalid_format_is_rejected() {
        assert!(Args::try_parse_from(["image-sbom", "--format", "xml", "alpine"]).is_err());
    }

    #[test]
    fn test_flags_override_config() {
        let args = Args::try_parse_from([
            "image-sbom",
            "--format",
            "json",
            "--platform",
            "linux/arm64",
            "--exclude",
            "/var/cache",
            "alpine",
        ])
        .unwrap();
        let mut config = AppConfig::default();
        config.source.exclude = vec!["/usr/share/doc".to_string()];

        args.apply_to(&mut config);

        assert_eq!(config.output.format, "json");
        assert_eq!(config.source.platform.as_deref(), Some("linux/arm64"));
        assert_eq!(config.source.exclude, vec!["/usr/share/doc", "/var/cache"]);
    }
}
