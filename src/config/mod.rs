use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
    pub worktime: WorktimeConfig,
    pub uploads: UploadConfig,
    pub seed: SeedConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub jwt_expiry_minutes: i64,
    pub cors_origins: Vec<String>,
    pub bcrypt_cost: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorktimeConfig {
    /// Effective seconds required before a full day may be closed
    pub required_work_seconds: i64,
    /// Offset of the office time zone; decides which calendar day a session belongs to
    pub utc_offset_minutes: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    pub max_logo_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedConfig {
    pub admin_name: String,
    pub admin_email: String,
    pub admin_password: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Database overrides
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = Some(v);
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }

        // Security overrides
        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("JWT_EXPIRY_MINUTES") {
            self.security.jwt_expiry_minutes = v.parse().unwrap_or(self.security.jwt_expiry_minutes);
        }
        if let Ok(v) = env::var("CORS_ORIGINS") {
            self.security.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        if let Ok(v) = env::var("BCRYPT_COST") {
            self.security.bcrypt_cost = v.parse().unwrap_or(self.security.bcrypt_cost);
        }

        // Worktime overrides
        if let Ok(v) = env::var("WORK_REQUIRED_SECONDS") {
            self.worktime.required_work_seconds = v.parse().unwrap_or(self.worktime.required_work_seconds);
        }
        if let Ok(v) = env::var("WORK_UTC_OFFSET_MINUTES") {
            self.worktime.utc_offset_minutes = v.parse().unwrap_or(self.worktime.utc_offset_minutes);
        }

        if let Ok(v) = env::var("UPLOAD_MAX_LOGO_BYTES") {
            self.uploads.max_logo_bytes = v.parse().unwrap_or(self.uploads.max_logo_bytes);
        }

        // Seed overrides
        if let Ok(v) = env::var("SEED_ADMIN_NAME") {
            self.seed.admin_name = v;
        }
        if let Ok(v) = env::var("SEED_ADMIN_EMAIL") {
            self.seed.admin_email = v;
        }
        if let Ok(v) = env::var("SEED_ADMIN_PASSWORD") {
            self.seed.admin_password = v;
        }

        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            database: DatabaseConfig {
                url: None,
                max_connections: 10,
                connection_timeout: 30,
            },
            security: SecurityConfig {
                jwt_secret: "worktracker-development-secret".to_string(),
                jwt_expiry_minutes: 24 * 60,
                cors_origins: vec!["*".to_string()],
                bcrypt_cost: 10,
            },
            worktime: WorktimeConfig::default(),
            uploads: UploadConfig::default(),
            seed: SeedConfig::default(),
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            database: DatabaseConfig {
                url: None,
                max_connections: 20,
                connection_timeout: 10,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiry_minutes: 8 * 60,
                cors_origins: vec!["https://staging.example.com".to_string()],
                bcrypt_cost: 12,
            },
            worktime: WorktimeConfig::default(),
            uploads: UploadConfig::default(),
            seed: SeedConfig::default(),
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            database: DatabaseConfig {
                url: None,
                max_connections: 50,
                connection_timeout: 5,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiry_minutes: 30,
                cors_origins: vec!["https://app.example.com".to_string()],
                bcrypt_cost: 12,
            },
            worktime: WorktimeConfig::default(),
            uploads: UploadConfig::default(),
            seed: SeedConfig::default(),
        }
    }
}

impl Default for WorktimeConfig {
    fn default() -> Self {
        Self {
            required_work_seconds: 9 * 60 * 60,
            utc_offset_minutes: 5 * 60 + 30,
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_logo_bytes: 5 * 1024 * 1024, // 5MB
        }
    }
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            admin_name: "System Administrator".to_string(),
            admin_email: "admin@worktracker.com".to_string(),
            admin_password: "admin123".to_string(),
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[macro_export]
macro_rules! is_production {
    () => {
        matches!($crate::config::CONFIG.environment, $crate::config::Environment::Production)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert_eq!(config.worktime.required_work_seconds, 32_400);
        assert_eq!(config.worktime.utc_offset_minutes, 330);
        assert!(!config.security.jwt_secret.is_empty());
        assert_eq!(config.seed.admin_email, "admin@worktracker.com");
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::production();
        assert!(config.security.jwt_secret.is_empty());
        assert_eq!(config.security.jwt_expiry_minutes, 30);
        assert_eq!(config.uploads.max_logo_bytes, 5 * 1024 * 1024);
    }
}
