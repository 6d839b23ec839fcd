use serde::Deserialize;
use std::env;

fn parse_env_or<T: std::str::FromStr>(var: &str, default: T) -> T
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Using default.", val, var, e);
                default
            }
        },
        Err(_) => default,
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    pub workspace: WorkspaceConfig,
}

/// Connection settings for the notebook backend.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

/// Behavior of a single open workspace view.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkspaceConfig {
    /// Seconds between background document-list refreshes.
    pub poll_interval_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                base_url: env::var("LECTERN_API_BASE_URL")
                    .unwrap_or_else(|_| "http://localhost:8080/api/v1".to_string()),
                timeout_secs: parse_env_or("LECTERN_API_TIMEOUT_SECS", 30),
            },
            workspace: WorkspaceConfig {
                poll_interval_secs: parse_env_or("LECTERN_POLL_INTERVAL_SECS", 5),
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default()
    }
}

impl ApiConfig {
    /// Parse and normalize the configured base URL. A trailing slash is
    /// stripped so endpoint paths can be appended uniformly.
    pub fn parsed_base_url(&self) -> crate::error::Result<url::Url> {
        let trimmed = self.base_url.trim_end_matches('/');
        Ok(url::Url::parse(trimmed)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_api_config_defaults() {
        std::env::remove_var("LECTERN_API_BASE_URL");
        std::env::remove_var("LECTERN_API_TIMEOUT_SECS");

        let config = Config::default();
        assert_eq!(config.api.base_url, "http://localhost:8080/api/v1");
        assert_eq!(config.api.timeout_secs, 30);
    }

    #[test]
    #[serial]
    fn test_api_config_from_env() {
        std::env::set_var("LECTERN_API_BASE_URL", "https://notebooks.example.com/api/v1");
        std::env::set_var("LECTERN_API_TIMEOUT_SECS", "10");

        let config = Config::default();
        assert_eq!(config.api.base_url, "https://notebooks.example.com/api/v1");
        assert_eq!(config.api.timeout_secs, 10);

        std::env::remove_var("LECTERN_API_BASE_URL");
        std::env::remove_var("LECTERN_API_TIMEOUT_SECS");
    }

    #[test]
    #[serial]
    fn test_poll_interval_defaults() {
        std::env::remove_var("LECTERN_POLL_INTERVAL_SECS");
        let config = Config::default();
        assert_eq!(config.workspace.poll_interval_secs, 5);
    }

    #[test]
    #[serial]
    fn test_poll_interval_from_env() {
        std::env::set_var("LECTERN_POLL_INTERVAL_SECS", "15");
        let config = Config::default();
        assert_eq!(config.workspace.poll_interval_secs, 15);
        std::env::remove_var("LECTERN_POLL_INTERVAL_SECS");
    }

    #[test]
    #[serial]
    fn test_invalid_poll_interval_falls_back() {
        std::env::set_var("LECTERN_POLL_INTERVAL_SECS", "soon");
        let config = Config::default();
        assert_eq!(config.workspace.poll_interval_secs, 5);
        std::env::remove_var("LECTERN_POLL_INTERVAL_SECS");
    }

    #[test]
    fn test_parsed_base_url_strips_trailing_slash() {
        let api = ApiConfig {
            base_url: "http://localhost:8080/api/v1/".to_string(),
            timeout_secs: 30,
        };
        let url = api.parsed_base_url().unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/api/v1");
    }

    #[test]
    fn test_parsed_base_url_rejects_garbage() {
        let api = ApiConfig {
            base_url: "not a url".to_string(),
            timeout_secs: 30,
        };
        assert!(api.parsed_base_url().is_err());
    }
}
