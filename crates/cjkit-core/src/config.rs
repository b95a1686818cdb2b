//! Client configuration and environment loading.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::ApiError;

/// Environment variable holding the CJ personal access token.
pub const ENV_ACCESS_TOKEN: &str = "CJ_ACCESS_TOKEN";
/// Environment variable holding the publisher (CID) identifier.
pub const ENV_PUBLISHER_ID: &str = "CJ_PUBLISHER_ID";
/// Environment variable holding the website (PID) identifier.
pub const ENV_WEBSITE_ID: &str = "CJ_WEBSITE_ID";

/// Settings shared by every request a client issues.
///
/// Construction trims and validates the three CJ credentials; everything
/// else has a default that `with_*` builders override.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    access_token: String,
    publisher_id: String,
    website_id: String,
    timeout: Duration,
    cache_enabled: bool,
    cache_ttl: Duration,
    cache_dir: Option<PathBuf>,
    debug: bool,
}

impl ClientConfig {
    /// Request timeout applied when none is configured.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
    /// Cache entry lifetime applied when none is configured.
    pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(3600);

    pub fn new(
        access_token: impl Into<String>,
        publisher_id: impl Into<String>,
        website_id: impl Into<String>,
    ) -> Result<Self, ApiError> {
        let access_token = required(access_token.into(), "access token")?;
        let publisher_id = required(publisher_id.into(), "publisher ID")?;
        let website_id = required(website_id.into(), "website ID")?;
        Ok(Self {
            access_token,
            publisher_id,
            website_id,
            timeout: Self::DEFAULT_TIMEOUT,
            cache_enabled: false,
            cache_ttl: Self::DEFAULT_CACHE_TTL,
            cache_dir: None,
            debug: false,
        })
    }

    /// Build a configuration from `CJ_ACCESS_TOKEN`, `CJ_PUBLISHER_ID` and
    /// `CJ_WEBSITE_ID`. All three must be set.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::new(
            env_var(ENV_ACCESS_TOKEN)?,
            env_var(ENV_PUBLISHER_ID)?,
            env_var(ENV_WEBSITE_ID)?,
        )
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_cache(mut self, enabled: bool) -> Self {
        self.cache_enabled = enabled;
        self
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(dir.into());
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub fn publisher_id(&self) -> &str {
        &self.publisher_id
    }

    pub fn website_id(&self) -> &str {
        &self.website_id
    }

    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    pub const fn cache_enabled(&self) -> bool {
        self.cache_enabled
    }

    pub const fn cache_ttl(&self) -> Duration {
        self.cache_ttl
    }

    pub fn cache_dir(&self) -> Option<&PathBuf> {
        self.cache_dir.as_ref()
    }

    pub const fn debug(&self) -> bool {
        self.debug
    }
}

fn required(value: String, field: &str) -> Result<String, ApiError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ApiError::config(format!("{field} is required")));
    }
    Ok(value.to_owned())
}

fn env_var(name: &str) -> Result<String, ApiError> {
    std::env::var(name).map_err(|_| ApiError::config(format!("{name} is not set")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Tests touching process environment take this lock so they never
    // observe each other's variables.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn config() -> ClientConfig {
        ClientConfig::new("token", "1234567", "7654321").expect("valid credentials")
    }

    #[test]
    fn new_applies_documented_defaults() {
        let config = config();

        assert_eq!(config.access_token(), "token");
        assert_eq!(config.publisher_id(), "1234567");
        assert_eq!(config.website_id(), "7654321");
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert!(!config.cache_enabled());
        assert_eq!(config.cache_ttl(), Duration::from_secs(3600));
        assert_eq!(config.cache_dir(), None);
        assert!(!config.debug());
    }

    #[test]
    fn new_trims_padded_credentials() {
        let config = ClientConfig::new(" token-123 ", " 1234567 ", "\t7654321\n")
            .expect("padded credentials are usable");

        assert_eq!(config.access_token(), "token-123");
        assert_eq!(config.publisher_id(), "1234567");
        assert_eq!(config.website_id(), "7654321");
    }

    #[test]
    fn new_rejects_blank_credentials() {
        let token = ClientConfig::new("   ", "1234567", "7654321").expect_err("blank token");
        assert!(token.to_string().contains("access token is required"));

        let publisher = ClientConfig::new("token", "", "7654321").expect_err("blank publisher");
        assert!(publisher.to_string().contains("publisher ID is required"));

        let website = ClientConfig::new("token", "1234567", " ").expect_err("blank website");
        assert!(matches!(website, ApiError::Config { .. }));
        assert!(website.to_string().contains("website ID is required"));
    }

    #[test]
    fn builders_override_defaults() {
        let config = config()
            .with_timeout(Duration::from_secs(5))
            .with_cache(true)
            .with_cache_ttl(Duration::from_secs(60))
            .with_cache_dir("/tmp/cj")
            .with_debug(true);

        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert!(config.cache_enabled());
        assert_eq!(config.cache_ttl(), Duration::from_secs(60));
        assert_eq!(config.cache_dir(), Some(&PathBuf::from("/tmp/cj")));
        assert!(config.debug());
    }

    #[test]
    fn from_env_reads_credentials() {
        let _guard = ENV_LOCK.lock().unwrap();
        std::env::set_var(ENV_ACCESS_TOKEN, "env-token");
        std::env::set_var(ENV_PUBLISHER_ID, "1234567");
        std::env::set_var(ENV_WEBSITE_ID, "7654321");

        let config = ClientConfig::from_env().expect("env is populated");

        assert_eq!(config.access_token(), "env-token");
        assert_eq!(config.publisher_id(), "1234567");
        assert_eq!(config.website_id(), "7654321");

        std::env::remove_var(ENV_ACCESS_TOKEN);
        std::env::remove_var(ENV_PUBLISHER_ID);
        std::env::remove_var(ENV_WEBSITE_ID);
    }

    #[test]
    fn from_env_names_the_missing_variable() {
        let _guard = ENV_LOCK.lock().unwrap();
        std::env::set_var(ENV_ACCESS_TOKEN, "env-token");
        std::env::remove_var(ENV_PUBLISHER_ID);
        std::env::remove_var(ENV_WEBSITE_ID);

        let error = ClientConfig::from_env().expect_err("publisher missing");

        assert!(matches!(error, ApiError::Config { .. }));
        assert!(error.to_string().contains(ENV_PUBLISHER_ID));

        std::env::remove_var(ENV_ACCESS_TOKEN);
    }
}
