use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: Option<DatabaseConfig>,
    pub address_lookup: AddressLookupConfig,
    pub app: AppConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddressLookupConfig {
    pub enabled: bool,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl AddressLookupConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub name: String,
    pub environment: Environment,
    pub locales_dir: String,
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_source(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup; blank values count as unset.
    pub fn from_source<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        // Server configuration
        let host = var("SERVER_HOST")
            .unwrap_or_else(|| "0.0.0.0".to_string())
            .parse::<IpAddr>()
            .context("Failed to parse SERVER_HOST")?;

        let port = var("SERVER_PORT")
            .unwrap_or_else(|| "8000".to_string())
            .parse::<u16>()
            .context("Failed to parse SERVER_PORT")?;

        // Database configuration (optional, in-memory store without it)
        let database = match var("DATABASE_URL") {
            Some(url) => {
                let max_connections = match var("DATABASE_MAX_CONNECTIONS") {
                    Some(val) => val.parse().context("Failed to parse DATABASE_MAX_CONNECTIONS")?,
                    None => 10,
                };
                let min_connections = match var("DATABASE_MIN_CONNECTIONS") {
                    Some(val) => val.parse().context("Failed to parse DATABASE_MIN_CONNECTIONS")?,
                    None => 1,
                };
                Some(DatabaseConfig {
                    url,
                    max_connections,
                    min_connections,
                })
            }
            None => None,
        };

        // Address lookup
        let enabled = match var("ADDRESS_LOOKUP_ENABLED") {
            Some(val) => parse_flag(&val).context("Failed to parse ADDRESS_LOOKUP_ENABLED")?,
            None => true,
        };
        let base_url =
            var("ADDRESS_LOOKUP_URL").unwrap_or_else(|| "https://viacep.com.br/ws".to_string());
        let timeout_secs = match var("ADDRESS_LOOKUP_TIMEOUT_SECS") {
            Some(val) => val.parse().context("Failed to parse ADDRESS_LOOKUP_TIMEOUT_SECS")?,
            None => 5,
        };

        // App configuration
        let environment = match var("APP_ENVIRONMENT") {
            Some(val) => val.parse().map_err(anyhow::Error::msg)?,
            None => Environment::Development,
        };
        let name = var("APP_NAME").unwrap_or_else(|| "Driver Onboarding".to_string());
        let locales_dir = var("LOCALES_DIR").unwrap_or_else(|| "locales".to_string());
        let allowed_origins = var("ALLOWED_ORIGINS")
            .map(|origins| {
                origins
                    .split(',')
                    .map(str::trim)
                    .filter(|o| !o.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Config {
            server: ServerConfig { host, port },
            database,
            address_lookup: AddressLookupConfig {
                enabled,
                base_url,
                timeout_secs,
            },
            app: AppConfig {
                name,
                environment,
                locales_dir,
                allowed_origins,
            },
        })
    }

    pub fn server_addr(&self) -> SocketAddr {
        SocketAddr::new(self.server.host, self.server.port)
    }

    pub fn is_production(&self) -> bool {
        self.app.environment == Environment::Production
    }
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("expected a boolean, got '{}'", other),
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "production" => Ok(Environment::Production),
            "staging" => Ok(Environment::Staging),
            "development" => Ok(Environment::Development),
            _ => Err(format!("Unknown environment: {}", s)),
        }
    }
}

// Global config instance, initialized once at startup
use once_cell::sync::OnceCell;

static CONFIG: OnceCell<Config> = OnceCell::new();

pub fn init() -> Result<&'static Config> {
    CONFIG.get_or_try_init(Config::from_env)
}

pub fn get() -> Option<&'static Config> {
    CONFIG.get()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_source(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_run_without_a_database() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.server_addr().port(), 8000);
        assert!(config.database.is_none());
        assert!(config.address_lookup.enabled);
        assert_eq!(config.address_lookup.base_url, "https://viacep.com.br/ws");
        assert_eq!(config.app.environment, Environment::Development);
        assert!(config.app.allowed_origins.is_empty());
    }

    #[test]
    fn database_settings_are_read_when_url_is_set() {
        let config = config_from(&[
            ("DATABASE_URL", "postgres://localhost/drivers"),
            ("DATABASE_MAX_CONNECTIONS", "4"),
        ])
        .unwrap();
        let database = config.database.unwrap();
        assert_eq!(database.max_connections, 4);
        assert_eq!(database.min_connections, 1);
    }

    #[test]
    fn origins_and_flags_are_parsed() {
        let config = config_from(&[
            ("ALLOWED_ORIGINS", "https://app.example.com, ,https://admin.example.com"),
            ("ADDRESS_LOOKUP_ENABLED", "off"),
            ("APP_ENVIRONMENT", "Production"),
        ])
        .unwrap();
        assert_eq!(config.app.allowed_origins.len(), 2);
        assert!(!config.address_lookup.enabled);
        assert!(config.is_production());
    }

    #[test]
    fn malformed_values_are_rejected() {
        assert!(config_from(&[("SERVER_PORT", "eighty")]).is_err());
        assert!(config_from(&[("ADDRESS_LOOKUP_ENABLED", "maybe")]).is_err());
        assert!(config_from(&[("APP_ENVIRONMENT", "qa")]).is_err());
    }
}
