mod cli;

use clap::error::ErrorKind;
use clap::CommandFactory;
use cli::{Args, Command};
use image_sbom::adapters::outbound::filesystem::FormattedReportWriter;
use image_sbom::application::context::AppContext;
use image_sbom::application::event_loop::{EventLoop, RunOutcome};
use image_sbom::application::factories::{FormatterFactory, PresenterFactory, TaskFactory};
use image_sbom::application::signals::setup_signals;
use image_sbom::application::ui::{is_interactive_terminal, select_presenter, UiHandle};
use image_sbom::application::worker::SbomWorker;
use image_sbom::config::AppConfig;
use image_sbom::logging;
use image_sbom::sbom_generation::domain::SourceInput;
use image_sbom::shared::{ExitCode, Result};
use image_sbom::version::VersionInfo;
use std::io::IsTerminal;
use std::process;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let args = Args::parse_args();

    let code = match run(args).await {
        Ok(code) => code,
        Err(e) => {
            report_error(&e);
            ExitCode::ApplicationError
        }
    };

    // Blocking cataloging tasks and the UI thread must not hold up the exit
    process::exit(code.as_i32());
}

async fn run(args: Args) -> Result<ExitCode> {
    if let Some(Command::Version { format }) = &args.command {
        print_version(format)?;
        return Ok(ExitCode::Success);
    }

    let Some(image) = args.image.clone() else {
        Args::command()
            .error(
                ErrorKind::MissingRequiredArgument,
                "an image argument is required",
            )
            .exit();
    };

    let cwd = std::env::current_dir()?;
    let mut config = AppConfig::load(args.config.as_deref(), &cwd)?;
    args.apply_to(&mut config);
    config.finalize()?;

    let flags = args.verbosity();
    logging::init_tracing(&config.log, flags)?;
    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "image-sbom starting");
    if let Ok(yaml) = config.to_yaml() {
        tracing::debug!("effective configuration:\n{}", yaml);
    }

    let ctx = AppContext::new(config);
    let format = ctx.config.output.format()?;
    let input = SourceInput {
        user_input: image,
        platform: ctx.config.source.platform.clone(),
        scope: ctx.config.package.scope()?,
        exclusions: ctx.config.source.exclude.clone(),
    };

    let colored = ctx.config.output.file.is_none() && std::io::stdout().is_terminal();
    let writer = Arc::new(FormattedReportWriter::new(
        FormatterFactory::create(format, colored),
        PresenterFactory::create_output(ctx.config.output.file.clone().into()),
    ));

    // Subscribe before the worker starts so its first events are not lost
    let subscription = ctx.subscribe();
    let cancellation = setup_signals();

    let kind = select_presenter(
        is_interactive_terminal(),
        flags.quiet,
        flags.debug || flags.verbose > 0,
    );
    let ui = match PresenterFactory::create_ui(kind)? {
        Some(presenter) => Some(UiHandle::spawn(presenter)?),
        None => None,
    };

    let worker_errors = SbomWorker::new(
        ctx.bus.clone(),
        ctx.cleanup.clone(),
        TaskFactory::source_providers(),
        TaskFactory::create(&ctx.config),
        writer,
    )
    .with_configuration(ctx.configuration_json()?)
    .spawn(input);

    let cleanup = ctx.cleanup.clone();
    let mut event_loop =
        EventLoop::new(worker_errors, cancellation, subscription).with_cleanup(move || {
            cleanup.run_all()
        });
    if let Some(ui) = ui {
        event_loop = event_loop.with_ui(ui, ctx.config.ui.shutdown_timeout());
    }

    let outcome = event_loop.run().await;
    ctx.shutdown();

    if let RunOutcome::Failed(e) = &outcome {
        report_error(e);
    }
    Ok(outcome.exit_code())
}

fn print_version(format: &str) -> Result<()> {
    let info = VersionInfo::current();
    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&info)?),
        "text" => println!("{}", info),
        other => anyhow::bail!("Unsupported version format '{}' (expected text or json)", other),
    }
    Ok(())
}

fn report_error(e: &anyhow::Error) {
    eprintln!("\n❌ An error occurred:\n");
    eprintln!("{}", e);

    for cause in e.chain().skip(1) {
        eprintln!("\nCaused by: {}", cause);
    }
}
