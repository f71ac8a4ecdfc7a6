//! Deployment profile loading.
//!
//! A process reads `APP_ENV` exactly once, loads `<CONFIG_DIR>/<profile>.toml`
//! and validates it. The resulting [`DeploymentProfile`] is immutable and is
//! handed to every component that needs configuration.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

mod profile;

pub use profile::{Profile, PROFILE_ENV_VAR};

/// Directory searched for profile files unless `CONFIG_DIR` is set.
pub const DEFAULT_CONFIG_DIR: &str = "env";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is not set; expected one of local, dev, test, prod")]
    MissingProfile(&'static str),
    #[error("unknown deployment profile `{0}`; expected one of local, dev, test, prod")]
    UnknownProfile(String),
    #[error("cannot read {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },
    #[error("cannot parse {path}: {source}")]
    Parse { path: PathBuf, source: toml::de::Error },
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// The selected profile together with its validated configuration.
#[derive(Debug, Clone)]
pub struct DeploymentProfile {
    pub profile: Profile,
    pub config: AppConfig,
}

impl DeploymentProfile {
    /// Read `APP_ENV` and `CONFIG_DIR` from the environment and load.
    pub fn load() -> Result<Self, ConfigError> {
        let selector = std::env::var(PROFILE_ENV_VAR).ok();
        let dir = std::env::var("CONFIG_DIR").unwrap_or_else(|_| DEFAULT_CONFIG_DIR.to_string());
        Self::load_from(selector.as_deref(), Path::new(&dir))
    }

    /// The selector is resolved before any file is touched, so an invalid
    /// profile fails without side effects.
    pub fn load_from(selector: Option<&str>, dir: &Path) -> Result<Self, ConfigError> {
        let profile = Profile::from_selector(selector)?;
        let config = load_from_file(&dir.join(profile.file_name()))?;
        Self::new(profile, config)
    }

    pub fn new(profile: Profile, mut config: AppConfig) -> Result<Self, ConfigError> {
        config.normalize_and_validate()?;
        Ok(Self { profile, config })
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    /// HTTP listeners keyed by process name (`api_user`, `app_user`, ...).
    #[serde(default)]
    pub listeners: BTreeMap<String, ServerConfig>,
    /// Remote-procedure targets keyed by logical domain (`user`, `product`).
    #[serde(default)]
    pub services: BTreeMap<String, ServiceTarget>,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub credentials: CredentialsConfig,
    #[serde(default)]
    pub runtime: RuntimeConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Network location of one backend domain's remote-procedure listener.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceTarget {
    /// Host clients connect to.
    pub host: String,
    pub port: u16,
    /// Interface the owning backend binds; defaults to `host`.
    #[serde(default)]
    pub bind_host: Option<String>,
    #[serde(default = "default_rpc_timeout")]
    pub timeout_ms: u64,
}

impl ServiceTarget {
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    pub fn bind_addr(&self) -> String {
        let host = self.bind_host.as_deref().unwrap_or(&self.host);
        format!("{}:{}", host, self.port)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
    #[serde(default = "default_max_lifetime")]
    pub max_lifetime_secs: u64,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    #[serde(default)]
    pub sqlx_logging: bool,
    /// Create missing tables from the entity definitions at connect time.
    #[serde(default)]
    pub sync_schema: bool,
}

/// Parameters of the credential hasher. The salt is deployment-wide so the
/// same plaintext always hashes to the same stored value.
#[derive(Debug, Clone, Deserialize)]
pub struct CredentialsConfig {
    #[serde(default)]
    pub salt: String,
    #[serde(default = "default_memory_kib")]
    pub memory_kib: u32,
    #[serde(default = "default_iterations")]
    pub iterations: u32,
    #[serde(default = "default_parallelism")]
    pub parallelism: u32,
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            salt: String::new(),
            memory_kib: default_memory_kib(),
            iterations: default_iterations(),
            parallelism: default_parallelism(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RuntimeConfig {
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self { worker_threads: Some(4) }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
}

/// Environment fallback for `credentials.salt`.
pub const SALT_ENV_VAR: &str = "CREDENTIALS_SALT";

fn default_host() -> String { "127.0.0.1".to_string() }
fn default_rpc_timeout() -> u64 { 5_000 }
fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 2 }
fn default_connect_timeout() -> u64 { 30 }
fn default_idle_timeout() -> u64 { 600 }
fn default_max_lifetime() -> u64 { 3600 }
fn default_acquire_timeout() -> u64 { 30 }
fn default_memory_kib() -> u32 { 19_456 }
fn default_iterations() -> u32 { 2 }
fn default_parallelism() -> u32 { 1 }

pub fn load_from_file(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = std::fs::read_to_string(path)
        .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
    toml::from_str(&content).map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
}

impl AppConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content)
            .map_err(|source| ConfigError::Parse { path: PathBuf::from("<inline>"), source })
    }

    pub fn normalize_and_validate(&mut self) -> Result<(), ConfigError> {
        for (name, listener) in self.listeners.iter_mut() {
            listener.normalize(name)?;
        }
        for (name, target) in &self.services {
            target.validate(name)?;
        }
        self.runtime.normalize();
        // database URL and credential salt may come from the environment
        self.database.normalize_from_env();
        self.credentials.normalize_from_env();
        self.database.validate()?;
        self.credentials.validate()?;
        Ok(())
    }

    pub fn listener(&self, name: &str) -> Result<&ServerConfig, ConfigError> {
        self.listeners
            .get(name)
            .ok_or_else(|| ConfigError::Invalid(format!("listeners.{name} is not configured")))
    }

    pub fn service(&self, domain: &str) -> Result<&ServiceTarget, ConfigError> {
        self.services
            .get(domain)
            .ok_or_else(|| ConfigError::Invalid(format!("services.{domain} is not configured")))
    }
}

impl ServerConfig {
    fn normalize(&mut self, name: &str) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            self.host = default_host();
        }
        if self.port == 0 {
            return Err(ConfigError::Invalid(format!("listeners.{name}.port must be in 1..=65535")));
        }
        Ok(())
    }
}

impl ServiceTarget {
    fn validate(&self, name: &str) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::Invalid(format!("services.{name}.host is empty")));
        }
        if self.port == 0 {
            return Err(ConfigError::Invalid(format!("services.{name}.port must be in 1..=65535")));
        }
        if self.timeout_ms == 0 {
            return Err(ConfigError::Invalid(format!("services.{name}.timeout_ms must be positive")));
        }
        Ok(())
    }
}

impl RuntimeConfig {
    fn normalize(&mut self) {
        if self.worker_threads.unwrap_or(0) == 0 {
            self.worker_threads = Some(4);
        }
    }
}

impl DatabaseConfig {
    pub fn normalize_from_env(&mut self) {
        if self.url.trim().is_empty() {
            if let Ok(url) = std::env::var("DATABASE_URL") {
                self.url = url;
            }
        }
    }

    /// Edge-only processes never connect, so an empty URL is accepted here
    /// and rejected at connect time instead.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.url.trim().is_empty() {
            let lower = self.url.to_lowercase();
            let known = ["postgresql://", "postgres://", "sqlite:"];
            if !known.iter().any(|scheme| lower.starts_with(scheme)) {
                return Err(ConfigError::Invalid(
                    "database.url must start with postgres://, postgresql:// or sqlite:".into(),
                ));
            }
        }
        if self.min_connections == 0 {
            return Err(ConfigError::Invalid("database.min_connections must be >= 1".into()));
        }
        if self.max_connections < self.min_connections {
            return Err(ConfigError::Invalid("database.max_connections must be >= min_connections".into()));
        }
        if self.connect_timeout_secs == 0 || self.acquire_timeout_secs == 0 {
            return Err(ConfigError::Invalid("database timeouts must be positive seconds".into()));
        }
        Ok(())
    }

    pub fn is_configured(&self) -> bool {
        !self.url.trim().is_empty()
    }
}

impl CredentialsConfig {
    pub fn normalize_from_env(&mut self) {
        self.fill_salt(std::env::var(SALT_ENV_VAR).ok());
    }

    /// A salt from the profile file wins over the environment.
    pub fn fill_salt(&mut self, fallback: Option<String>) {
        if self.salt.trim().is_empty() {
            if let Some(salt) = fallback {
                self.salt = salt;
            }
        }
    }

    /// Salt bounds come from the argon2 salt encoding: 8..=48 raw bytes.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let len = self.salt.len();
        if !(8..=48).contains(&len) {
            return Err(ConfigError::Invalid(format!(
                "credentials.salt must be 8..=48 bytes (got {len})"
            )));
        }
        if self.iterations == 0 || self.parallelism == 0 {
            return Err(ConfigError::Invalid("credentials.iterations and parallelism must be positive".into()));
        }
        if self.memory_kib < 8 * self.parallelism {
            return Err(ConfigError::Invalid("credentials.memory_kib must be >= 8 * parallelism".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        [listeners.api_user]
        port = 3000

        [listeners.app_user]
        host = "0.0.0.0"
        port = 4000

        [services.user]
        host = "127.0.0.1"
        port = 5001

        [database]
        url = "sqlite::memory:"
        max_connections = 1
        min_connections = 1

        [credentials]
        salt = "local-dev-salt"
        memory_kib = 64
        iterations = 1
    "#;

    #[test]
    fn parses_and_applies_defaults() {
        let mut cfg = AppConfig::from_toml_str(SAMPLE).unwrap();
        cfg.normalize_and_validate().unwrap();
        assert_eq!(cfg.listener("api_user").unwrap().bind_addr(), "127.0.0.1:3000");
        assert_eq!(cfg.listener("app_user").unwrap().bind_addr(), "0.0.0.0:4000");
        let user = cfg.service("user").unwrap();
        assert_eq!(user.base_url(), "http://127.0.0.1:5001");
        assert_eq!(user.timeout(), Duration::from_millis(5_000));
        assert_eq!(cfg.runtime.worker_threads, Some(4));
        assert_eq!(cfg.logging.format, LogFormat::Compact);
        assert_eq!(cfg.credentials.parallelism, 1);
    }

    #[test]
    fn bind_host_overrides_client_host() {
        let target: ServiceTarget =
            toml::from_str("host = \"app-user\"\nport = 5001\nbind_host = \"0.0.0.0\"").unwrap();
        assert_eq!(target.base_url(), "http://app-user:5001");
        assert_eq!(target.bind_addr(), "0.0.0.0:5001");
    }

    #[test]
    fn short_salt_is_rejected() {
        let mut cfg = AppConfig::from_toml_str(&SAMPLE.replace("local-dev-salt", "short")).unwrap();
        let err = cfg.normalize_and_validate().unwrap_err();
        assert!(err.to_string().contains("credentials.salt"));
    }

    #[test]
    fn salt_falls_back_to_the_environment_value() {
        let mut cfg = AppConfig::from_toml_str(&SAMPLE.replace("salt = \"local-dev-salt\"", "")).unwrap();
        assert!(cfg.credentials.salt.is_empty());
        cfg.credentials.fill_salt(Some("env-supplied-salt".into()));
        assert_eq!(cfg.credentials.salt, "env-supplied-salt");
        assert!(cfg.credentials.validate().is_ok());

        let mut pinned = AppConfig::from_toml_str(SAMPLE).unwrap();
        pinned.credentials.fill_salt(Some("env-supplied-salt".into()));
        assert_eq!(pinned.credentials.salt, "local-dev-salt");
    }

    #[test]
    fn missing_salt_is_rejected() {
        let mut cfg = AppConfig::from_toml_str(&SAMPLE.replace("salt = \"local-dev-salt\"", "")).unwrap();
        cfg.credentials.fill_salt(None);
        assert!(cfg.credentials.validate().is_err());
    }

    #[test]
    fn unknown_database_scheme_is_rejected() {
        let mut cfg = AppConfig::from_toml_str(&SAMPLE.replace("sqlite::memory:", "mysql://db")).unwrap();
        assert!(matches!(cfg.normalize_and_validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn missing_service_is_reported_by_name() {
        let mut cfg = AppConfig::from_toml_str(SAMPLE).unwrap();
        cfg.normalize_and_validate().unwrap();
        let err = cfg.service("product").unwrap_err();
        assert!(err.to_string().contains("services.product"));
    }

    #[test]
    fn invalid_profile_fails_before_reading_files() {
        let err = DeploymentProfile::load_from(Some("staging"), Path::new("/nonexistent")).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownProfile(_)));
    }

    #[test]
    fn repository_profiles_load() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../env");
        let deployment = DeploymentProfile::load_from(Some("test"), &dir).unwrap();
        assert_eq!(deployment.profile, Profile::Test);
        assert!(deployment.config.service("user").is_ok());
        assert!(deployment.config.service("product").is_ok());
    }
}
