use serde::Deserialize;

/// Main configuration structure for Ripple-Check
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub checker: CheckerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub storage: StorageConfig,
}

/// Validation run tuning
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CheckerConfig {
    /// Maximum number of simultaneous probes
    pub concurrency: u32,

    /// Links per persisted checkpoint
    pub batch_size: u32,

    /// Per-attempt request timeout (milliseconds)
    pub request_timeout_ms: u64,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            concurrency: 5,
            batch_size: 20,
            request_timeout_ms: 10_000,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct UserAgentConfig {
    pub name: String,
    pub version: String,

    /// URL with information about the checker
    pub contact_url: Option<String>,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            name: "ripple-check".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: None,
        }
    }
}

impl UserAgentConfig {
    /// Format: Name/Version (+ContactURL)
    pub fn header_value(&self) -> String {
        match &self.contact_url {
            Some(url) => format!("{}/{} (+{})", self.name, self.version, url),
            None => format!("{}/{}", self.name, self.version),
        }
    }
}

/// Durable store configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct StorageConfig {
    /// Path to the SQLite database file
    pub database_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: "./ripple-check.db".to_string(),
        }
    }
}
