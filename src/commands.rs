use crate::cli::Args;
use volley_live::config::Config;
use volley_live::error::AppError;

/// Handles the --list-config command.
pub async fn handle_list_config_command() -> Result<(), AppError> {
    Config::display().await
}

/// Handles --config: stores a new API domain, keeping every other setting.
pub async fn handle_config_update_command(args: &Args) -> Result<(), AppError> {
    let mut config = Config::load_stored_or_default(&Config::get_config_path()).await?;

    if let Some(new_domain) = &args.new_api_domain {
        config.api_domain = new_domain.trim().to_string();
    }

    config.validate()?;
    config.save().await?;
    println!("Config updated successfully!");

    Ok(())
}
