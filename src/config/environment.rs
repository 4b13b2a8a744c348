//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno y variables de configuración.

use std::env;
use std::str::FromStr;

use thiserror::Error;

/// Errores al leer la configuración del entorno
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
}

/// Backend de persistencia
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataStore {
    Postgres,
    Memory,
}

impl FromStr for DataStore {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(DataStore::Postgres),
            "memory" => Ok(DataStore::Memory),
            _ => Err(()),
        }
    }
}

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub data_store: DataStore,
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub run_migrations: bool,
    pub antiforgery_secret: Option<String>,
    pub antiforgery_ttl_minutes: u64,
    pub cors_origins: Option<Vec<String>>,
    pub log_level: tracing::Level,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            port: 3000,
            host: "0.0.0.0".to_string(),
            data_store: DataStore::Memory,
            database_url: None,
            database_max_connections: 20,
            run_migrations: false,
            antiforgery_secret: None,
            antiforgery_ttl_minutes: 60,
            cors_origins: None,
            log_level: tracing::Level::DEBUG,
        }
    }
}

impl EnvironmentConfig {
    /// Leer la configuración desde las variables de entorno
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self {
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            port: parse_var("PORT", 3000)?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            data_store: parse_var("DATA_STORE", DataStore::Postgres)?,
            database_url: env::var("DATABASE_URL").ok().filter(|url| !url.trim().is_empty()),
            database_max_connections: parse_var("DATABASE_MAX_CONNECTIONS", 20)?,
            run_migrations: parse_var("RUN_MIGRATIONS", true)?,
            antiforgery_secret: env::var("ANTIFORGERY_SECRET").ok().filter(|s| !s.is_empty()),
            antiforgery_ttl_minutes: parse_var("ANTIFORGERY_TTL_MINUTES", 60)?,
            cors_origins: env::var("CORS_ORIGINS").ok().map(|origins| {
                origins
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            }),
            log_level: parse_var("LOG_LEVEL", tracing::Level::DEBUG)?,
        };

        if config.data_store == DataStore::Postgres && config.database_url.is_none() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }

        if !config.is_development() && config.antiforgery_secret.is_none() {
            return Err(ConfigError::Missing("ANTIFORGERY_SECRET"));
        }

        Ok(config)
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Obtener la URL del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        _ => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_store_from_str() {
        assert_eq!("postgres".parse::<DataStore>(), Ok(DataStore::Postgres));
        assert_eq!("Memory".parse::<DataStore>(), Ok(DataStore::Memory));
        assert!("redis".parse::<DataStore>().is_err());
    }

    #[test]
    fn test_default_is_development() {
        let config = EnvironmentConfig::default();
        assert!(config.is_development());
        assert_eq!(config.server_url(), "0.0.0.0:3000");
    }
}
