use std::path::Path;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use url::Url;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub api: ApiConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_path(".")
    }

    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Config::builder()
            .add_source(
                File::with_name(
                    path.as_ref()
                        .join("config/default")
                        .to_string_lossy()
                        .as_ref(),
                )
                .required(false),
            )
            .add_source(
                File::with_name(
                    path.as_ref()
                        .join("config/local")
                        .to_string_lossy()
                        .as_ref(),
                )
                .required(false),
            )
            .add_source(Environment::default().separator("__"))
            .build()?
            .try_deserialize()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamConfig {
    #[serde(default = "UpstreamConfig::default_hostname")]
    pub hostname: String,
    #[serde(default = "UpstreamConfig::default_user_agent")]
    pub user_agent: String,
}

impl UpstreamConfig {
    fn default_hostname() -> String {
        "ghe.example.com".to_string()
    }

    fn default_user_agent() -> String {
        "ghe-client".to_string()
    }

    /// Base URL of the upstream v3 API, e.g. `https://ghe.example.com/api/v3/`.
    ///
    /// The trailing slash matters: endpoint paths are joined onto it.
    pub fn base_url(&self) -> Result<Url, url::ParseError> {
        Url::parse(&format!("https://{}/api/v3/", self.hostname))
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            hostname: Self::default_hostname(),
            user_agent: Self::default_user_agent(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "ApiConfig::default_bind")]
    pub bind: String,
}

impl ApiConfig {
    fn default_bind() -> String {
        "0.0.0.0:8000".to_string()
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind: Self::default_bind(),
        }
    }
}
