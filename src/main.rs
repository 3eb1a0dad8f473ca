mod app;
mod cli;
mod commands;

use clap::Parser;
use cli::{Args, is_config_command};
use volley_live::config::Config;
use volley_live::error::AppError;
use volley_live::logging::setup_logging;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let args = Args::parse();

    // Config commands run before logging so they work without a valid config
    if is_config_command(&args) {
        if args.list_config {
            return commands::handle_list_config_command().await;
        }
        return commands::handle_config_update_command(&args).await;
    }

    let config = Config::load().await?;

    let log_path = args.log_file.as_deref().or(config.log_file_path.as_deref());
    let (log_file_path, _guard) = setup_logging(log_path, args.debug).await?;
    tracing::info!("Logs are being written to: {log_file_path}");

    if args.once {
        app::run_once(&config).await
    } else {
        app::run_live(&config).await
    }
}
