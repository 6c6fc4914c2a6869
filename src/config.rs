use serde::{Deserialize, Serialize};

/// Shortest HS256 signing secret accepted at startup, in bytes.
pub const MIN_JWT_SECRET_LEN: usize = 32;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    Source(#[from] config_rs::ConfigError),
    #[error(
        "jwt.secret must be at least {MIN_JWT_SECRET_LEN} bytes long, got {0}; \
         set APP_JWT__SECRET (see `generate-jwt-secret`)"
    )]
    WeakJwtSecret(usize),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub tracing: TracingConfig,
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub pagination: PaginationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration_days: u64,
}

impl JwtConfig {
    /// # Errors
    /// Rejects a secret shorter than [`MIN_JWT_SECRET_LEN`], including an
    /// empty one, since tokens signed with it could be forged.
    pub fn check_secret(&self) -> Result<(), ConfigError> {
        if self.secret.len() < MIN_JWT_SECRET_LEN {
            return Err(ConfigError::WeakJwtSecret(self.secret.len()));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TracingConfig {
    pub log_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub pool_size: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
}

/// Page-number pagination settings shared by every list endpoint.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Page size used when the client does not send `per_page` (default: 10)
    #[serde(default = "default_page_size")]
    pub default_page_size: u64,
    /// Upper bound applied to any client supplied `per_page` (default: 100)
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

const fn default_page_size() -> u64 {
    10
}

const fn default_max_page_size() -> u64 {
    100
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_section_is_optional() {
        let config: Config = serde_json::from_value(serde_json::json!({
            "tracing": { "log_level": "info" },
            "database": { "url": "sqlite::memory:", "pool_size": 1 },
            "server": { "port": 3000 },
            "jwt": { "secret": "secret", "expiration_days": 7 }
        }))
        .expect("config should deserialize");

        assert_eq!(config.pagination.default_page_size, 10);
        assert_eq!(config.pagination.max_page_size, 100);
    }

    #[test]
    fn short_jwt_secrets_are_rejected() {
        let jwt = |secret: &str| JwtConfig {
            secret: secret.to_string(),
            expiration_days: 7,
        };

        assert!(matches!(jwt("").check_secret(), Err(ConfigError::WeakJwtSecret(0))));
        assert!(matches!(
            jwt("too-short").check_secret(),
            Err(ConfigError::WeakJwtSecret(9))
        ));
        assert!(jwt(&"x".repeat(MIN_JWT_SECRET_LEN)).check_secret().is_ok());
    }

    #[test]
    fn pagination_fields_fall_back_individually() {
        let pagination: PaginationConfig =
            serde_json::from_value(serde_json::json!({ "max_page_size": 50 }))
                .expect("pagination should deserialize");

        assert_eq!(pagination.default_page_size, 10);
        assert_eq!(pagination.max_page_size, 50);
    }
}
