use crate::config::types::{Options, TransportOptions};
use crate::ConfigError;

const MAX_REDIRECTS_LIMIT: usize = 50;

/// Validates the entire configuration
pub fn validate(options: &Options) -> Result<(), ConfigError> {
    // An empty user agent counts as unset
    if let Some(user_agent) = options.user_agent.as_deref().filter(|ua| !ua.is_empty()) {
        validate_user_agent(user_agent)?;
    }
    validate_transport(&options.transport)?;
    Ok(())
}

/// Validates a user agent string
///
/// The value ends up in a header, so control characters are rejected here
/// rather than failing on the first request.
fn validate_user_agent(user_agent: &str) -> Result<(), ConfigError> {
    if user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be blank".to_string(),
        ));
    }

    if user_agent.chars().any(char::is_control) {
        return Err(ConfigError::Validation(format!(
            "user_agent must not contain control characters, got {:?}",
            user_agent
        )));
    }

    Ok(())
}

/// Validates transport settings
fn validate_transport(config: &TransportOptions) -> Result<(), ConfigError> {
    if let Some(timeout_secs) = config.timeout_secs {
        if timeout_secs < 1 {
            return Err(ConfigError::Validation(format!(
                "timeout_secs must be >= 1, got {}",
                timeout_secs
            )));
        }

        if config.connect_timeout_secs > timeout_secs {
            return Err(ConfigError::Validation(format!(
                "connect_timeout_secs must not exceed timeout_secs ({}), got {}",
                timeout_secs, config.connect_timeout_secs
            )));
        }
    }

    if config.connect_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "connect_timeout_secs must be >= 1, got {}",
            config.connect_timeout_secs
        )));
    }

    if config.max_redirects > MAX_REDIRECTS_LIMIT {
        return Err(ConfigError::Validation(format!(
            "max_redirects must be <= {}, got {}",
            MAX_REDIRECTS_LIMIT, config.max_redirects
        )));
    }

    Ok(())
}
