use crate::config::types::{Config, CrawlerConfig, HttpConfig, OutputConfig};
use crate::url::ProfileUrlTemplate;
use crate::ConfigError;

/// Validates the entire configuration
///
/// Runs before any network activity; a configuration that passes here
/// describes a non-empty identifier range with a usable session and
/// destination.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_http_config(&config.http)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates the identifier range and batching
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.end_id < config.start_id {
        return Err(ConfigError::Validation(format!(
            "end_id must be >= start_id, got start_id={} end_id={}",
            config.start_id, config.end_id
        )));
    }

    if config.end_id == u64::MAX {
        return Err(ConfigError::Validation(format!(
            "end_id must be < {}",
            u64::MAX
        )));
    }

    if config.batch_size < 1 {
        return Err(ConfigError::Validation(format!(
            "batch_size must be >= 1, got {}",
            config.batch_size
        )));
    }

    Ok(())
}

/// Validates HTTP session configuration
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    ProfileUrlTemplate::parse(&config.profile_url_template)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid profile_url_template: {}", e)))?;

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "timeout_secs must be >= 1".to_string(),
        ));
    }

    if config.connect_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "connect_timeout_secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.output_dir.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "output_dir cannot be empty".to_string(),
        ));
    }

    if let Some(log_file) = &config.log_file {
        if log_file.file_name().is_none() {
            return Err(ConfigError::Validation(format!(
                "log_file must name a file, got '{}'",
                log_file.display()
            )));
        }
    }

    Ok(())
}
