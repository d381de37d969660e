use anyhow::{ensure, Context, Result};

const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Every variable is optional; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Upper bound on documents analyzed at once in a batch request.
    pub batch_concurrency: usize,
    pub max_upload_bytes: usize,
    /// Used when a request does not name a required education level.
    pub default_required_education: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8000,
            rust_log: "info".to_string(),
            batch_concurrency: 4,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            default_required_education: "bachelor".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = Config::default();
        let batch_concurrency = parse_env("BATCH_CONCURRENCY", defaults.batch_concurrency)?;
        ensure!(batch_concurrency >= 1, "BATCH_CONCURRENCY must be at least 1");

        Ok(Config {
            port: parse_env("PORT", defaults.port).context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or(defaults.rust_log),
            batch_concurrency,
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", defaults.max_upload_bytes)?,
            default_required_education: std::env::var("DEFAULT_REQUIRED_EDUCATION")
                .unwrap_or(defaults.default_required_education),
        })
    }
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_env_falls_back_to_default() {
        let value: usize = parse_env("CV_SCREENING_TEST_UNSET_VAR", 7).unwrap();
        assert_eq!(value, 7);
    }

    #[test]
    fn test_parse_env_rejects_garbage() {
        std::env::set_var("CV_SCREENING_TEST_BAD_PORT", "eighty");
        let result: Result<u16> = parse_env("CV_SCREENING_TEST_BAD_PORT", 8000);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_env_reads_value() {
        std::env::set_var("CV_SCREENING_TEST_CONCURRENCY", " 12 ");
        let value: usize = parse_env("CV_SCREENING_TEST_CONCURRENCY", 4).unwrap();
        assert_eq!(value, 12);
    }
}
