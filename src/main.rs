//! ReportScribe CLI entry point

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use report_scribe::cli::{
    app::{load_merged_config, run_compose, EXIT_ERROR, EXIT_USAGE_ERROR},
    args::{Cli, Commands},
    config_cmd::handle_config_command,
    presenter::Presenter,
    ComposeOptions,
};
use report_scribe::domain::config::AppConfig;
use report_scribe::domain::media::Duration;
use report_scribe::domain::report::ExportFormat;
use report_scribe::infrastructure::config::XdgConfigStore;

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let presenter = Presenter::new();

    // Handle subcommands
    match cli.command {
        Some(Commands::Config { action }) => {
            let store = XdgConfigStore::new();
            if let Err(e) = handle_config_command(action, &store, &presenter).await {
                presenter.error(&e.to_string());
                return ExitCode::from(EXIT_ERROR);
            }
            return ExitCode::SUCCESS;
        }
        None => {}
    }

    // Build CLI config from args
    let cli_config = AppConfig {
        api_key: None, // API key comes from env/file only
        model: cli.model.clone(),
        output_dir: cli
            .output
            .as_ref()
            .map(|p| p.to_string_lossy().to_string()),
        format: cli.format.map(|f| ExportFormat::from(f).to_string()),
    };

    // Merge config
    let config = load_merged_config(cli_config).await;

    // Parse recording duration
    let record = match cli.record.as_deref() {
        Some(s) => match s.parse::<Duration>() {
            Ok(d) => Some(d),
            Err(e) => {
                presenter.error(&format!("Invalid record duration: {}", e));
                return ExitCode::from(EXIT_USAGE_ERROR);
            }
        },
        None => None,
    };

    let options = ComposeOptions {
        text: cli.text,
        text_file: cli.text_file,
        record,
        audio: cli.audio,
        image: cli.image,
        caption: cli.caption,
        format: config.format_or_default(),
        output_dir: PathBuf::from(config.output_dir_or_default()),
        model: config.model_or_default(),
        api_key: config.api_key,
    };

    run_compose(options).await
}
