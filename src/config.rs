use clap::Parser;
use serde::{Deserialize, Serialize};
use std::fs;
use std::time::Duration;
use thiserror::Error;

use crate::user_auth::password::CredentialVerifier;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse config yaml: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("{0} must be set in production")]
    MissingSecret(&'static str),

    #[error("jwt_access_secret and jwt_refresh_secret must differ")]
    SharedJwtSecret,

    #[error("{field} {reason}")]
    OutOfRange {
        field: &'static str,
        reason: &'static str,
    },
}

/// Command-line overrides. Each flag falls back to an environment variable,
/// which in turn falls back to the YAML file.
#[derive(Parser, Debug, Default, Clone)]
#[command(name = "food_randomizer", version, about = "Food place randomizer REST backend")]
pub struct CliArgs {
    /// Application environment; selects config/<env>.yaml
    #[arg(long, short = 'e', env = "ENV", default_value = "dev")]
    pub env: String,

    /// Server port to listen on
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// PostgreSQL connection string
    #[arg(long, env = "DB_CONNECTIONSTRING")]
    pub dsn: Option<String>,

    /// Registration secret code
    #[arg(long, env = "SECRET_CODE", hide_env_values = true)]
    pub secret_code: Option<String>,

    /// Access token signing secret
    #[arg(long, env = "JWT_ACCESS_SECRET", hide_env_values = true)]
    pub jwt_access_secret: Option<String>,

    /// Refresh token signing secret
    #[arg(long, env = "JWT_REFRESH_SECRET", hide_env_values = true)]
    pub jwt_refresh_secret: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub env: String,
    pub log_level: String,
    pub log_dir: String,
    pub log_file: String,
    pub use_json: bool,
    pub rotation: String,
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL URL; in-memory stores are used when absent
    #[serde(default)]
    pub url: Option<String>,
    pub max_connections: u32,
    pub query_timeout_ms: u64,
    pub run_migrations: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 10,
            query_timeout_ms: 3000,
            run_migrations: true,
        }
    }
}

impl DatabaseConfig {
    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AuthConfig {
    #[serde(default)]
    pub secret_code: String,
    #[serde(default)]
    pub jwt_access_secret: String,
    #[serde(default)]
    pub jwt_refresh_secret: String,
    pub issuer: String,
    pub audience: String,
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,
    #[serde(default = "default_access_ttl_hours")]
    pub access_ttl_hours: i64,
    #[serde(default = "default_refresh_ttl_days")]
    pub refresh_ttl_days: i64,
    /// Layer the bearer-token middleware over /v1/admin/*
    #[serde(default)]
    pub require_admin_token: bool,
}

fn default_bcrypt_cost() -> u32 {
    10
}

fn default_access_ttl_hours() -> i64 {
    72
}

fn default_refresh_ttl_days() -> i64 {
    7
}

impl AppConfig {
    pub fn load(cli: &CliArgs) -> Result<Self, ConfigError> {
        let config_path = format!("config/{}.yaml", cli.env);
        let content = fs::read_to_string(&config_path).map_err(|source| ConfigError::Read {
            path: config_path.clone(),
            source,
        })?;
        let mut config = Self::from_yaml(&content)?;
        config.env = cli.env.clone();
        config.apply_overrides(cli);
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn apply_overrides(&mut self, cli: &CliArgs) {
        if let Some(port) = cli.port {
            self.gateway.port = port;
        }
        if let Some(dsn) = &cli.dsn {
            self.database.url = Some(dsn.clone());
        }
        if let Some(code) = &cli.secret_code {
            self.auth.secret_code = code.clone();
        }
        if let Some(secret) = &cli.jwt_access_secret {
            self.auth.jwt_access_secret = secret.clone();
        }
        if let Some(secret) = &cli.jwt_refresh_secret {
            self.auth.jwt_refresh_secret = secret.clone();
        }
    }

    pub fn is_production(&self) -> bool {
        self.env == "production" || self.env == "prod"
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.is_production() {
            if self.auth.secret_code.is_empty() {
                return Err(ConfigError::MissingSecret("SECRET_CODE"));
            }
            if self.auth.jwt_access_secret.is_empty() {
                return Err(ConfigError::MissingSecret("JWT_ACCESS_SECRET"));
            }
            if self.auth.jwt_refresh_secret.is_empty() {
                return Err(ConfigError::MissingSecret("JWT_REFRESH_SECRET"));
            }
        }
        if !self.auth.jwt_access_secret.is_empty()
            && self.auth.jwt_access_secret == self.auth.jwt_refresh_secret
        {
            return Err(ConfigError::SharedJwtSecret);
        }
        self.validate_ranges()
    }

    fn validate_ranges(&self) -> Result<(), ConfigError> {
        let cost_range = CredentialVerifier::MIN_COST..=CredentialVerifier::MAX_COST;
        let checks = [
            (
                "auth.bcrypt_cost",
                cost_range.contains(&self.auth.bcrypt_cost),
                "must be between 4 and 31",
            ),
            (
                "auth.access_ttl_hours",
                self.auth.access_ttl_hours > 0,
                "must be positive",
            ),
            (
                "auth.refresh_ttl_days",
                self.auth.refresh_ttl_days > 0,
                "must be positive",
            ),
            (
                "database.query_timeout_ms",
                self.database.query_timeout_ms > 0,
                "must be positive",
            ),
            (
                "database.max_connections",
                self.database.max_connections > 0,
                "must be positive",
            ),
        ];
        match checks.into_iter().find(|(_, ok, _)| !ok) {
            Some((field, _, reason)) => Err(ConfigError::OutOfRange { field, reason }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const YAML: &str = r#"
log_level: info
log_dir: ./logs
log_file: food_randomizer.log
use_json: false
rotation: daily
gateway:
  host: 0.0.0.0
  port: 4000
database:
  max_connections: 5
  query_timeout_ms: 3000
  run_migrations: false
auth:
  secret_code: gate
  jwt_access_secret: access
  jwt_refresh_secret: refresh
  issuer: food-randomizer
  audience: food-randomizer-clients
"#;

    #[test]
    fn test_yaml_defaults() {
        let config = AppConfig::from_yaml(YAML).unwrap();
        assert_eq!(config.gateway.port, 4000);
        assert_eq!(config.auth.bcrypt_cost, 10);
        assert_eq!(config.auth.access_ttl_hours, 72);
        assert_eq!(config.auth.refresh_ttl_days, 7);
        assert!(!config.auth.require_admin_token);
        assert!(config.database.url.is_none());
        assert_eq!(config.database.query_timeout(), Duration::from_secs(3));
    }

    #[test]
    fn test_cli_overrides_yaml() {
        let mut config = AppConfig::from_yaml(YAML).unwrap();
        let cli = CliArgs {
            env: "dev".to_string(),
            port: Some(8088),
            dsn: Some("postgresql://localhost/food".to_string()),
            secret_code: Some("other-gate".to_string()),
            jwt_access_secret: None,
            jwt_refresh_secret: None,
        };
        config.apply_overrides(&cli);
        assert_eq!(config.gateway.port, 8088);
        assert_eq!(config.database.url.as_deref(), Some("postgresql://localhost/food"));
        assert_eq!(config.auth.secret_code, "other-gate");
        assert_eq!(config.auth.jwt_access_secret, "access");
    }

    #[test]
    fn test_cli_parse_flags() {
        let cli = CliArgs::try_parse_from([
            "food_randomizer",
            "--env",
            "staging",
            "--port",
            "9000",
            "--secret-code",
            "s3cret",
        ])
        .unwrap();
        assert_eq!(cli.env, "staging");
        assert_eq!(cli.port, Some(9000));
        assert_eq!(cli.secret_code.as_deref(), Some("s3cret"));
    }

    #[test]
    fn test_production_requires_secrets() {
        let mut config = AppConfig::from_yaml(YAML).unwrap();
        config.env = "production".to_string();
        config.auth.jwt_refresh_secret.clear();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingSecret("JWT_REFRESH_SECRET"))
        ));
    }

    #[test]
    fn test_shared_secret_rejected() {
        let mut config = AppConfig::from_yaml(YAML).unwrap();
        config.auth.jwt_refresh_secret = config.auth.jwt_access_secret.clone();
        assert!(matches!(config.validate(), Err(ConfigError::SharedJwtSecret)));
    }

    #[test]
    fn test_out_of_range_values_rejected() {
        let base = AppConfig::from_yaml(YAML).unwrap();
        base.validate().unwrap();

        let cases: [(&str, fn(&mut AppConfig)); 6] = [
            ("auth.bcrypt_cost", |c| c.auth.bcrypt_cost = 99),
            ("auth.bcrypt_cost", |c| c.auth.bcrypt_cost = 3),
            ("auth.access_ttl_hours", |c| c.auth.access_ttl_hours = -5),
            ("auth.refresh_ttl_days", |c| c.auth.refresh_ttl_days = 0),
            ("database.query_timeout_ms", |c| c.database.query_timeout_ms = 0),
            ("database.max_connections", |c| c.database.max_connections = 0),
        ];
        for (expected, mutate) in cases {
            let mut config = base.clone();
            mutate(&mut config);
            match config.validate() {
                Err(ConfigError::OutOfRange { field, .. }) => assert_eq!(field, expected),
                other => panic!("{}: expected OutOfRange, got {:?}", expected, other),
            }
        }
    }

    #[test]
    fn test_cost_bounds_match_bcrypt() {
        let low = CredentialVerifier::new(CredentialVerifier::MIN_COST);
        assert!(low.hash("x").is_ok());
        assert!(CredentialVerifier::new(CredentialVerifier::MIN_COST - 1).hash("x").is_err());
        assert!(CredentialVerifier::new(CredentialVerifier::MAX_COST + 1).hash("x").is_err());
    }

    #[test]
    fn test_shipped_config_files_parse() {
        let dev = AppConfig::from_yaml(include_str!("../config/dev.yaml")).unwrap();
        assert!(dev.database.url.is_none());
        assert!(!dev.auth.require_admin_token);
        dev.validate().unwrap();

        let prod = AppConfig::from_yaml(include_str!("../config/production.yaml")).unwrap();
        assert!(prod.use_json);
        assert!(prod.auth.require_admin_token);
        assert!(prod.auth.jwt_access_secret.is_empty());
    }
}
