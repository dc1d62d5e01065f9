use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Deserializer};
use snafu::ResultExt;

use crate::error::{ApplicationError, ConfigLoadSnafu};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(rename = "host_address", default = "default_host")]
    pub host: SocketAddr,

    /// Comma-separated, ordered lineup of bars on the tour. Shown on the
    /// submission form and enforced as an allow-list; leave empty to accept
    /// any bar name.
    #[serde(default = "default_bars")]
    pub bars: String,

    /// How often the dashboard asks for a fresh snapshot.
    #[serde(default = "default_poll_interval", deserialize_with = "humantime_duration")]
    pub poll_interval: Duration,

    #[serde(default = "default_log_directory")]
    pub log_directory: PathBuf,

    #[serde(default)]
    pub store_backend: StoreKind,

    #[serde(flatten)]
    pub surreal: SurrealConfig,
}

impl Config {
    pub fn from_env() -> Result<Config, ApplicationError> {
        envy::from_env::<Config>().context(ConfigLoadSnafu)
    }

    /// The configured lineup with blanks dropped; empty means unconstrained.
    pub fn lineup(&self) -> Vec<String> {
        self.bars
            .split(',')
            .map(str::trim)
            .filter(|bar| !bar.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    #[default]
    Memory,
    Remote,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SurrealConfig {
    #[serde(rename = "surreal_endpoint", default = "default_surreal_endpoint")]
    pub endpoint: String,
    #[serde(rename = "surreal_namespace", default = "default_surreal_namespace")]
    pub namespace: String,
    #[serde(rename = "surreal_database", default = "default_surreal_database")]
    pub database: String,
    #[serde(rename = "surreal_username", default)]
    pub username: Option<String>,
    #[serde(rename = "surreal_password", default)]
    pub password: Option<String>,
}

fn humantime_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    humantime::parse_duration(&text).map_err(serde::de::Error::custom)
}

fn default_host() -> SocketAddr {
    ([127, 0, 0, 1], 8050).into()
}

fn default_bars() -> String {
    "3 Needs,Drink,Orlandos".to_string()
}

fn default_poll_interval() -> Duration {
    Duration::from_secs(5)
}

fn default_log_directory() -> PathBuf {
    PathBuf::from("logs")
}

fn default_surreal_endpoint() -> String {
    "mem://".to_string()
}

fn default_surreal_namespace() -> String {
    "margarita_tour".to_string()
}

fn default_surreal_database() -> String {
    "ratings".to_string()
}
