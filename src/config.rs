use anyhow::{Context, anyhow};
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub stripe: StripeConfig,
    #[serde(default)]
    pub lifecycle: LifecycleConfig,
    #[serde(default)]
    pub notifications: NotificationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// Shared secret of the identity provider's HS256 access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StripeConfig {
    pub secret_key: String,
    #[serde(default = "default_currency")]
    pub currency: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LifecycleConfig {
    /// Seconds between scheduled reconciliation sweeps; 0 disables the sweep.
    #[serde(default = "default_reconcile_interval")]
    pub reconcile_interval_secs: u64,
    /// Reconcile before serving the admin store list.
    #[serde(default = "default_true")]
    pub reconcile_on_admin_view: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    #[serde(default = "default_notification_capacity")]
    pub capacity: usize,
}

fn default_currency() -> String {
    "inr".to_string()
}

fn default_reconcile_interval() -> u64 {
    3600
}

fn default_true() -> bool {
    true
}

fn default_notification_capacity() -> usize {
    100
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            reconcile_interval_secs: default_reconcile_interval(),
            reconcile_on_admin_view: true,
        }
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            capacity: default_notification_capacity(),
        }
    }
}

fn get_env(name: &str) -> Option<String> {
    env::var(name).ok()
}

fn get_env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_toml() -> anyhow::Result<Self> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        use std::io::ErrorKind;

        let mut config = match std::fs::read_to_string(&config_path) {
            Ok(config_str) => Self::parse(&config_str)
                .with_context(|| format!("failed to parse config file {config_path}"))?,
            // No file: build from environment variables and defaults
            Err(e) if e.kind() == ErrorKind::NotFound => {
                let database_url = get_env("DATABASE_URL").ok_or_else(|| {
                    anyhow!("DATABASE_URL is not set and no config file was found at {config_path}")
                })?;

                Config {
                    server: ServerConfig {
                        host: get_env("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                        port: get_env_parse("SERVER_PORT", 8080u16),
                    },
                    database: DatabaseConfig {
                        url: database_url,
                        max_connections: get_env_parse("DB_MAX_CONNECTIONS", 10u32),
                    },
                    jwt: JwtConfig {
                        secret: get_env("JWT_SECRET")
                            .unwrap_or_else(|| "change-me-in-production".to_string()),
                    },
                    stripe: StripeConfig {
                        secret_key: get_env("STRIPE_SECRET_KEY").unwrap_or_default(),
                        currency: get_env("STRIPE_CURRENCY").unwrap_or_else(default_currency),
                    },
                    lifecycle: LifecycleConfig::default(),
                    notifications: NotificationConfig::default(),
                }
            }
            Err(e) => {
                return Err(anyhow!("cannot read config file {config_path}: {e}"));
            }
        };

        config.apply_env_overrides();
        Ok(config)
    }

    pub fn parse(config_str: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(config_str)?)
    }

    /// Environment variables win over file values.
    fn apply_env_overrides(&mut self) {
        if let Ok(v) = env::var("SERVER_HOST") {
            self.server.host = v;
        }
        if let Ok(v) = env::var("SERVER_PORT")
            && let Ok(p) = v.parse()
        {
            self.server.port = p;
        }
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = v;
        }
        if let Ok(v) = env::var("DB_MAX_CONNECTIONS")
            && let Ok(mc) = v.parse()
        {
            self.database.max_connections = mc;
        }
        if let Ok(v) = env::var("JWT_SECRET") {
            self.jwt.secret = v;
        }
        if let Ok(v) = env::var("STRIPE_SECRET_KEY") {
            self.stripe.secret_key = v;
        }
        if let Ok(v) = env::var("STRIPE_CURRENCY") {
            self.stripe.currency = v.to_lowercase();
        }
        if let Ok(v) = env::var("RECONCILE_INTERVAL_SECS")
            && let Ok(n) = v.parse()
        {
            self.lifecycle.reconcile_interval_secs = n;
        }
        if let Ok(v) = env::var("RECONCILE_ON_ADMIN_VIEW")
            && let Ok(b) = v.parse()
        {
            self.lifecycle.reconcile_on_admin_view = b;
        }
        if let Ok(v) = env::var("NOTIFICATION_CAPACITY")
            && let Ok(n) = v.parse()
        {
            self.notifications.capacity = n;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_config_uses_defaults() {
        let config = Config::parse(
            r#"
            [server]
            host = "127.0.0.1"
            port = 9000

            [database]
            url = "postgres://localhost/storefront"
            max_connections = 5

            [jwt]
            secret = "s3cret"

            [stripe]
            secret_key = "sk_test_123"
            "#,
        )
        .unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.stripe.currency, "inr");
        assert_eq!(config.lifecycle.reconcile_interval_secs, 3600);
        assert!(config.lifecycle.reconcile_on_admin_view);
        assert_eq!(config.notifications.capacity, 100);
    }

    #[test]
    fn test_parse_lifecycle_section() {
        let config = Config::parse(
            r#"
            [server]
            host = "0.0.0.0"
            port = 8080
            [database]
            url = "postgres://db/storefront"
            max_connections = 10
            [jwt]
            secret = "x"
            [stripe]
            secret_key = ""
            currency = "usd"
            [lifecycle]
            reconcile_interval_secs = 0
            reconcile_on_admin_view = false
            [notifications]
            capacity = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.stripe.currency, "usd");
        assert_eq!(config.lifecycle.reconcile_interval_secs, 0);
        assert!(!config.lifecycle.reconcile_on_admin_view);
        assert_eq!(config.notifications.capacity, 5);
    }

    #[test]
    fn test_parse_rejects_missing_sections() {
        assert!(Config::parse("[server]\nhost = \"x\"\nport = 1\n").is_err());
    }
}
