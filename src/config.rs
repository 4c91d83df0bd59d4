use crate::error::AppError;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_API_URL: &str = "http://localhost:8080/api";
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_LOG_FILTER: &str = "info";
const APP_DIR: &str = "vocab-typing";

#[derive(Debug, Clone)]
pub struct ClientConfig
{
    pub api_url: String,
    pub http_timeout: Duration,
    pub session_file: PathBuf,
    pub log_filter: String,
    pub log_dir: PathBuf,
}

impl ClientConfig
{
    pub fn from_env() -> Result<Self, AppError>
    {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError>
    {
        let api_url = lookup("VOCAB_API_URL")
            .map(|value| value.trim().trim_end_matches('/').to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let timeout_secs = match lookup("VOCAB_HTTP_TIMEOUT_SECS") {
            Some(value) => value.trim().parse::<u64>().map_err(|_| {
                AppError::Config("VOCAB_HTTP_TIMEOUT_SECS must be a whole number of seconds".to_string())
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };
        if timeout_secs == 0 {
            return Err(AppError::Config(
                "VOCAB_HTTP_TIMEOUT_SECS must be positive".to_string(),
            ));
        }

        let data_dir = data_dir();
        let session_file = lookup("VOCAB_SESSION_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join("session.json"));
        let log_dir = lookup("VOCAB_LOG_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join("logs"));
        let log_filter = lookup("VOCAB_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        Ok(Self {
            api_url,
            http_timeout: Duration::from_secs(timeout_secs),
            session_file,
            log_filter,
            log_dir,
        })
    }
}

fn data_dir() -> PathBuf
{
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

#[cfg(test)]
mod tests
{
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<ClientConfig, AppError>
    {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ClientConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_without_env()
    {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.http_timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert_eq!(config.log_filter, "info");
        assert!(config.session_file.ends_with("session.json"));
    }

    #[test]
    fn api_url_drops_trailing_slash()
    {
        let config = config_from(&[("VOCAB_API_URL", "https://words.example.com/api/")]).unwrap();
        assert_eq!(config.api_url, "https://words.example.com/api");
    }

    #[test]
    fn overrides_paths()
    {
        let config = config_from(&[
            ("VOCAB_SESSION_FILE", "/tmp/s.json"),
            ("VOCAB_LOG_DIR", "/tmp/logs"),
            ("VOCAB_LOG", "debug"),
        ])
        .unwrap();
        assert_eq!(config.session_file, PathBuf::from("/tmp/s.json"));
        assert_eq!(config.log_dir, PathBuf::from("/tmp/logs"));
        assert_eq!(config.log_filter, "debug");
    }

    #[test]
    fn rejects_bad_timeout()
    {
        assert!(config_from(&[("VOCAB_HTTP_TIMEOUT_SECS", "soon")]).is_err());
        assert!(config_from(&[("VOCAB_HTTP_TIMEOUT_SECS", "0")]).is_err());
    }
}
