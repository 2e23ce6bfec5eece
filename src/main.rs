//! esp-certkit - certificate tooling for ESP32 projects
//!
//! This tool provides functionality for:
//! - Fixing BOMs, line endings and trailing whitespace in PEM files
//! - Analyzing certificate and key files without touching them
//! - Generating self-signed certificates with openssl
//! - Copying the device certificate into the Android app
//! - Scanning staged git changes for secrets

use clap::{CommandFactory, Parser};
use console::style;
use esp_certkit::cert_ops::runner::{self, FixOptions};
use esp_certkit::cli::{AnalyzeArgs, Cli, CopyArgs, FixArgs, InteractiveSession, SubCommand};
use esp_certkit::{commands, config, CertKitError, Settings};
use tracing_subscriber::EnvFilter;

/// Exit status after Ctrl-C, distinct from ordinary failures
const EXIT_INTERRUPTED: i32 = 130;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if cli.no_color {
        console::set_colors_enabled(false);
    }

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(cli.default_log_filter())),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let work = tokio::spawn(run(cli));

    let code = tokio::select! {
        joined = work => match joined {
            Ok(Ok(true)) => 0,
            Ok(Ok(false)) => 1,
            Ok(Err(e)) => report_error(e),
            Err(e) => report_error(e.into()),
        },
        _ = tokio::signal::ctrl_c() => {
            eprintln!("\n\n{}", style("Interrupted by user").yellow());
            EXIT_INTERRUPTED
        }
    };

    std::process::exit(code);
}

/// Print an error and pick the exit status
fn report_error(e: anyhow::Error) -> i32 {
    match e.downcast_ref::<CertKitError>() {
        Some(err) => eprintln!("{} {}", style("Error:").red().bold(), err),
        None => eprintln!("{} {:?}", style("Unexpected error:").red().bold(), e),
    }
    1
}

/// Run the selected command. `Ok(false)` means a clean exit with failure status.
async fn run(cli: Cli) -> anyhow::Result<bool> {
    let mut settings = config::load(cli.config.as_deref()).map_err(CertKitError::from)?;
    cli.apply_overrides(&mut settings);
    tracing::debug!("Settings: {:?}", settings);

    match cli.command.unwrap_or(SubCommand::Menu) {
        SubCommand::Fix(args) => {
            if args.output_conflicts() {
                Cli::command()
                    .error(
                        clap::error::ErrorKind::ArgumentConflict,
                        "--output requires exactly one input file",
                    )
                    .exit();
            }
            blocking(move || fix(args, &settings)).await?;
            Ok(true)
        }
        SubCommand::Analyze(args) => {
            blocking(move || analyze(args, &settings)).await?;
            Ok(true)
        }
        SubCommand::Copy(args) => {
            blocking(move || copy(args, &settings)).await?;
            Ok(true)
        }
        SubCommand::Generate(args) => {
            let dir = args
                .dir
                .unwrap_or_else(|| settings.paths.data_dir.clone());
            commands::run_generate(&settings, &dir, !args.no_verify).await?;
            Ok(true)
        }
        SubCommand::Scan(args) => {
            let clean = commands::run_scan(&args.repo, settings.tools.timeout()).await?;
            Ok(clean)
        }
        SubCommand::Menu => {
            blocking(move || InteractiveSession::new(settings).run()).await?;
            Ok(true)
        }
    }
}

/// Run a command that blocks on the terminal or the filesystem on the
/// blocking pool, keeping the runtime free to deliver Ctrl-C
async fn blocking<F>(f: F) -> anyhow::Result<()>
where
    F: FnOnce() -> esp_certkit::Result<()> + Send + 'static,
{
    tokio::task::spawn_blocking(f).await??;
    Ok(())
}

fn fix(args: FixArgs, settings: &Settings) -> esp_certkit::Result<()> {
    let files = if args.files.is_empty() {
        runner::default_targets(&settings.paths)?
    } else {
        args.files
    };

    let options = FixOptions {
        output: args.output,
        backup: args.backup,
        dry_run: args.dry_run,
    };
    runner::run_fix(&files, &options)
}

fn analyze(args: AnalyzeArgs, settings: &Settings) -> esp_certkit::Result<()> {
    let files = if args.files.is_empty() {
        runner::default_targets(&settings.paths)?
    } else {
        args.files
    };
    runner::run_analyze(&files, args.json)
}

fn copy(args: CopyArgs, settings: &Settings) -> esp_certkit::Result<()> {
    let source = args.from.unwrap_or_else(|| settings.paths.copy_source.clone());
    let destination = args
        .to
        .unwrap_or_else(|| settings.paths.copy_destination.clone());
    runner::run_copy(&source, &destination, std::io::stdin().lock())
}
