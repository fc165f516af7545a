use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use dotenvy::dotenv;
use tracing::{error, info};
use tracing_subscriber::FmtSubscriber;

use dailydose::{run_menu, Command, Config, Pipeline, TerminalPresenter};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    // Load environment variables from .env file
    dotenv().ok();

    // Parse command line arguments
    let cli = Config::parse();

    // Setup logging (stderr keeps diagnostics out of the panels)
    let subscriber = FmtSubscriber::builder()
        .with_max_level(cli.log_level())
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")?;

    let hub_config = cli.resolve().context("Failed to load configuration")?;
    info!(
        data_dir = %hub_config.storage.data_dir.display(),
        log_dir = %hub_config.storage.log_dir.display(),
        "Starting Daily Dose"
    );

    let pipeline = Pipeline::from_config(&hub_config).context("Invalid configuration")?;
    pipeline
        .bootstrap()
        .context("Failed to prepare data and log directories")?;

    let presenter = TerminalPresenter;

    match cli.command {
        None => {
            run_menu(&pipeline, &presenter).await?;
            Ok(ExitCode::SUCCESS)
        }
        Some(command) => run_command(&pipeline, &presenter, command).await,
    }
}

/// Runs a single subcommand. Exits non-zero when something was not saved.
async fn run_command(
    pipeline: &Pipeline,
    presenter: &TerminalPresenter,
    command: Command,
) -> anyhow::Result<ExitCode> {
    let all_saved = match command {
        Command::Stats => {
            pipeline.statistics(presenter);
            true
        }
        Command::Everything => {
            let summary = pipeline.run_everything(presenter).await.map_err(|e| {
                pipeline
                    .envelope()
                    .record_unexpected("Unexpected error during everything run", &e);
                anyhow::anyhow!(e.user_message())
            })?;
            summary.failed_count() == 0
        }
        Command::Advice | Command::Book | Command::Quote | Command::Dog => {
            let category = command
                .category()
                .context("single-category command without a category")?;
            let report = pipeline
                .run_category(category, presenter)
                .await
                .map_err(|e| {
                    error!(category = %category, "Unexpected error: {}", e);
                    pipeline
                        .envelope()
                        .record_unexpected("Unexpected error during fetch", &e);
                    anyhow::anyhow!(e.user_message())
                })?;
            report.is_saved()
        }
    };

    Ok(if all_saved {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
