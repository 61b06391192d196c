//! Logging initialization for image-sbom.
//!
//! Configures `tracing-subscriber` from the `log` config section and the
//! verbosity flags. Supports JSON structured logging and human-readable
//! output, to stderr and/or a log file.

use std::fs::OpenOptions;
use std::sync::Mutex;

use anyhow::Context;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use crate::config::LogConfig;
use crate::shared::{Result, SbomError};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Verbosity-related command-line flags
#[derive(Debug, Clone, Copy, Default)]
pub struct Verbosity {
    pub quiet: bool,
    pub verbose: u8,
    pub debug: bool,
}

/// Picks the effective level.
///
/// Quiet silences everything. An explicit configured level cannot be combined
/// with `-v`. Otherwise `-v` means info, `-vv` or `--debug` means debug, and
/// the default is warn.
pub fn resolve_log_level(configured: Option<&str>, flags: Verbosity) -> Result<String> {
    if flags.quiet {
        return Ok("off".to_string());
    }

    if let Some(level) = configured {
        if flags.verbose > 0 {
            return Err(SbomError::InvalidConfig {
                section: "log".to_string(),
                reason: "cannot explicitly set log level and use -v".to_string(),
                hint: "Remove either 'log.level' from the config file or the -v flag".to_string(),
            }
            .into());
        }
        return Ok(level.to_string());
    }

    let level = if flags.debug || flags.verbose >= 2 {
        "debug"
    } else if flags.verbose == 1 {
        "info"
    } else {
        "warn"
    };
    Ok(level.to_string())
}

/// Console output is kept when there is no log file (or when debugging),
/// unless the user asked for silence.
pub fn console_enabled(has_log_file: bool, flags: Verbosity) -> bool {
    (!has_log_file || flags.debug) && !flags.quiet
}

/// Initialize the global tracing subscriber.
///
/// Must be called exactly once, before any tracing macros are used.
/// `RUST_LOG` overrides the resolved level.
pub fn init_tracing(config: &LogConfig, flags: Verbosity) -> Result<()> {
    let level = resolve_log_level(config.level.as_deref(), flags)?;
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&level));

    let mut layers: Vec<BoxedLayer> = Vec::new();
    if console_enabled(config.file.is_some(), flags) {
        layers.push(fmt_layer(std::io::stderr, config.structured, true));
    }
    if let Some(path) = &config.file {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open log file: {}", path.display()))?;
        layers.push(fmt_layer(Mutex::new(file), config.structured, false));
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(env_filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing subscriber: {}", e))?;

    Ok(())
}

fn fmt_layer<W>(writer: W, structured: bool, ansi: bool) -> BoxedLayer
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(ansi)
        .with_target(false);
    if structured {
        layer.json().boxed()
    } else {
        layer.boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags(quiet: bool, verbose: u8, debug: bool) -> Verbosity {
        Verbosity {
            quiet,
            verbose,
            debug,
        }
    }

    #[test]
    fn test_level_policy() {
        let cases = [
            (None, flags(false, 0, false), "warn"),
            (None, flags(false, 1, false), "info"),
            (None, flags(false, 2, false), "debug"),
            (None, flags(false, 3, false), "debug"),
            (None, flags(false, 0, true), "debug"),
            (None, flags(true, 2, true), "off"),
            (Some("error"), flags(false, 0, false), "error"),
            (Some("trace"), flags(true, 0, false), "off"),
        ];
        for (configured, flags, want) in cases {
            assert_eq!(
                resolve_log_level(configured, flags).unwrap(),
                want,
                "configured={:?} flags={:?}",
                configured,
                flags
            );
        }
    }

    #[test]
    fn test_explicit_level_conflicts_with_verbose() {
        let err = resolve_log_level(Some("info"), flags(false, 1, false)).unwrap_err();
        assert!(err.to_string().contains("cannot explicitly set log level and use -v"));
    }

    #[test]
    fn test_console_enabled() {
        assert!(console_enabled(false, flags(false, 0, false)));
        assert!(!console_enabled(true, flags(false, 0, false)));
        assert!(console_enabled(true, flags(false, 0, true)));
        assert!(!console_enabled(false, flags(true, 0, false)));
        assert!(!console_enabled(true, flags(true, 0, true)));
    }
}
