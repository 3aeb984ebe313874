//! Configuration validation logic.

use regex::Regex;

use crate::config::loader::Config;
use crate::error::{Error, Result};

/// Minimum length for user agent.
const MIN_USER_AGENT_LENGTH: usize = 10;

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_host(&config.options.host)?;
    validate_user_agent(&config.account.user_agent)?;

    if let Some(cookie) = config.account.cookie.as_deref() {
        reject_placeholder("cookie", cookie)?;
    }
    if let Some(token) = config.account.csrf_token.as_deref() {
        reject_placeholder("csrf_token", token)?;
    }
    if config.account.bearer_token.trim().is_empty() {
        return Err(Error::MissingConfig("bearer_token".to_string()));
    }

    Ok(())
}

/// Validate the platform host name (no scheme, no path).
pub fn validate_host(host: &str) -> Result<()> {
    if host.is_empty() {
        return Err(Error::MissingConfig("host".to_string()));
    }

    let host_pattern = Regex::new(r"^[A-Za-z0-9-]+(\.[A-Za-z0-9-]+)+$")
        .map_err(|e| Error::Config(e.to_string()))?;

    if !host_pattern.is_match(host) {
        return Err(Error::ConfigValidation {
            field: "host".to_string(),
            message: format!(
                "'{}' is not a host name. Use e.g. 'x.com' without scheme or path.",
                host
            ),
        });
    }

    Ok(())
}

/// Validate the user agent string.
pub fn validate_user_agent(user_agent: &str) -> Result<()> {
    if user_agent.is_empty() {
        return Err(Error::MissingConfig("user_agent".to_string()));
    }

    if user_agent.len() < MIN_USER_AGENT_LENGTH {
        return Err(Error::ConfigValidation {
            field: "user_agent".to_string(),
            message: format!(
                "User agent must be at least {} characters (got {})",
                MIN_USER_AGENT_LENGTH,
                user_agent.len()
            ),
        });
    }

    reject_placeholder("user_agent", user_agent)
}

fn reject_placeholder(field: &str, value: &str) -> Result<()> {
    let lower = value.to_lowercase();
    if lower.contains("replaceme") || lower.contains("your_") {
        return Err(Error::ConfigValidation {
            field: field.to_string(),
            message: format!(
                "Value appears to be a placeholder. Copy the real {} from your browser session.",
                field
            ),
        });
    }
    Ok(())
}

/// Extract a record id from a status URL or a bare numeric id.
pub fn parse_record_id(input: &str) -> Result<String> {
    let input = input.trim();

    if input.starts_with("http://") || input.starts_with("https://") {
        // Pattern: https://x.com/<handle>/status/1234567890
        let status_pattern =
            Regex::new(r"/status/(\d+)").map_err(|e| Error::Config(e.to_string()))?;

        if let Some(id) = status_pattern
            .captures(input)
            .and_then(|captures| captures.get(1))
        {
            return Ok(id.as_str().to_string());
        }

        return Err(Error::ConfigValidation {
            field: "record".to_string(),
            message: format!("Could not extract a status id from URL: {}", input),
        });
    }

    if !input.is_empty() && input.chars().all(|c| c.is_ascii_digit()) {
        return Ok(input.to_string());
    }

    Err(Error::ConfigValidation {
        field: "record".to_string(),
        message: format!(
            "Invalid record id: '{}'. Must be digits or a status URL.",
            input
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_host() {
        assert!(validate_host("x.com").is_ok());
        assert!(validate_host("mobile.twitter.com").is_ok());
        assert!(validate_host("https://x.com").is_err());
        assert!(validate_host("x.com/home").is_err());
        assert!(validate_host("localhost").is_err());
        assert!(matches!(validate_host(""), Err(Error::MissingConfig(_))));
    }

    #[test]
    fn test_placeholder_cookie_rejected() {
        let mut config = Config::default();
        config.account.cookie = Some("ct0=REPLACEME".to_string());
        assert!(matches!(
            validate_config(&config),
            Err(Error::ConfigValidation { field, .. }) if field == "cookie"
        ));
    }

    #[test]
    fn test_parse_record_id_direct() {
        assert_eq!(parse_record_id("1234567890").unwrap(), "1234567890");
        assert_eq!(parse_record_id(" 42 ").unwrap(), "42");
    }

    #[test]
    fn test_parse_record_id_url() {
        let url = "https://x.com/alice/status/1712345678901234567/photo/1";
        assert_eq!(parse_record_id(url).unwrap(), "1712345678901234567");
        let url = "https://twitter.com/bob/status/99?s=20";
        assert_eq!(parse_record_id(url).unwrap(), "99");
    }

    #[test]
    fn test_parse_record_id_invalid() {
        assert!(parse_record_id("not-a-number").is_err());
        assert!(parse_record_id("").is_err());
        assert!(parse_record_id("https://x.com/alice").is_err());
    }
}
