use super::Config;
use crate::error::AppError;
use std::path::Path;

/// Validates the configuration settings
///
/// # Validation Rules
/// - API domain cannot be empty and must look like a URL or domain name
/// - If log file path is provided, it cannot be empty and its parent must be creatable
/// - HTTP timeout and poll interval must be positive
/// - Federation country cannot be blank
/// - Extra country aliases need a non-empty alias and a two-letter code
pub fn validate_config(config: &Config) -> Result<(), AppError> {
    let api_domain = config.api_domain.as_str();
    if api_domain.is_empty() {
        return Err(AppError::config_error("API domain cannot be empty"));
    }

    if !api_domain.starts_with("http://") && !api_domain.starts_with("https://") {
        // Without a protocol it should at least look like a domain
        if !api_domain.contains('.') && !api_domain.starts_with("localhost") {
            return Err(AppError::config_error(
                "API domain must be a valid URL or domain name",
            ));
        }
    }

    if let Some(log_path) = &config.log_file_path {
        if log_path.is_empty() {
            return Err(AppError::config_error("Log file path cannot be empty"));
        }

        if let Some(parent) = Path::new(log_path).parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::config_error(format!(
                    "Cannot create log directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    if config.http_timeout_seconds == 0 {
        return Err(AppError::config_error("HTTP timeout must be positive"));
    }

    if config.poll_interval_seconds == 0 {
        return Err(AppError::config_error("Poll interval must be positive"));
    }

    if config.federation_country.trim().is_empty() {
        return Err(AppError::config_error("Federation country cannot be empty"));
    }

    for entry in &config.extra_country_aliases {
        if entry.alias.trim().is_empty() {
            return Err(AppError::config_error("Country alias cannot be empty"));
        }
        if entry.code.len() != 2 || !entry.code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(AppError::config_error(format!(
                "Country alias '{}' must map to a two-letter code, got '{}'",
                entry.alias, entry.code
            )));
        }
    }

    Ok(())
}
