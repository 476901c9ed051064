use std::time::Duration;

pub const DEFAULT_PORT: u16 = 3030;
pub const DEFAULT_DATABASE_URL: &str = "mysql://root@127.0.0.1:3306/comment_service";

pub const PORT_ENV: &str = "PORT";
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid port: {value:?}")]
    InvalidPort { value: String },
}

/// Runtime configuration, assembled once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub max_connections: u32,
    pub conn_max_lifetime: Duration,
    pub connect_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: 10,
            conn_max_lifetime: Duration::from_secs(5 * 60),
            connect_timeout: Duration::from_secs(5),
        }
    }
}

impl Config {
    /// Defaults overridden by the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from any key/value source on top of `self`.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(PORT_ENV) {
            self.port = value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort { value })?;
        }

        if let Some(url) = lookup(DATABASE_URL_ENV) {
            self.database_url = url;
        }

        Ok(self)
    }

    pub fn uses_memory_store(&self) -> bool {
        self.database_url.starts_with("memory:")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_without_environment() {
        let config = Config::default().with_overrides(|_| None).unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert!(!config.uses_memory_store());
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = Config::default()
            .with_overrides(lookup_from(&[
                ("PORT", "8081"),
                ("DATABASE_URL", "memory:"),
            ]))
            .unwrap();
        assert_eq!(config.port, 8081);
        assert_eq!(config.database_url, "memory:");
        assert!(config.uses_memory_store());
    }

    #[test]
    fn invalid_port_is_rejected() {
        let err = Config::default()
            .with_overrides(lookup_from(&[("PORT", "not-a-port")]))
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidPort {
                value: "not-a-port".to_string()
            }
        );
    }

    #[test]
    fn out_of_range_port_is_rejected() {
        let result = Config::default().with_overrides(lookup_from(&[("PORT", "70000")]));
        assert!(matches!(result, Err(ConfigError::InvalidPort { .. })));
    }
}
