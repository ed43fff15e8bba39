use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub gate: GateConfig,
    pub database: DatabaseConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

/// Where entitlement answers come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OracleBackend {
    /// `has_feature` SQL function over the shared pool
    Postgres,
    /// Hosted backend REST RPC
    Rpc,
}

impl OracleBackend {
    fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "postgres" | "pg" | "sql" => Some(OracleBackend::Postgres),
            "rpc" | "rest" => Some(OracleBackend::Rpc),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateConfig {
    pub oracle_backend: OracleBackend,
    pub oracle_timeout_ms: u64,
    /// Bound on each identity and membership lookup
    pub lookup_timeout_ms: u64,
    pub rpc_url: Option<String>,
    #[serde(skip_serializing)]
    pub rpc_api_key: Option<String>,
    pub log_decisions: bool,
}

impl GateConfig {
    pub fn oracle_timeout(&self) -> Duration {
        Duration::from_millis(self.oracle_timeout_ms)
    }

    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_millis(self.lookup_timeout_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub port: u16,
    pub enable_request_logging: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
    #[serde(skip_serializing)]
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
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
        // Gate overrides
        if let Ok(v) = env::var("GATE_ORACLE_BACKEND") {
            self.gate.oracle_backend = OracleBackend::parse(&v).unwrap_or(self.gate.oracle_backend);
        }
        if let Ok(v) = env::var("GATE_ORACLE_TIMEOUT_MS") {
            self.gate.oracle_timeout_ms = v.parse().unwrap_or(self.gate.oracle_timeout_ms);
        }
        if let Ok(v) = env::var("GATE_LOOKUP_TIMEOUT_MS") {
            self.gate.lookup_timeout_ms = v.parse().unwrap_or(self.gate.lookup_timeout_ms);
        }
        if let Ok(v) = env::var("GATE_RPC_URL") {
            self.gate.rpc_url = Some(v).filter(|s| !s.trim().is_empty());
        }
        if let Ok(v) = env::var("GATE_RPC_API_KEY") {
            self.gate.rpc_api_key = Some(v).filter(|s| !s.trim().is_empty());
        }
        if let Ok(v) = env::var("GATE_LOG_DECISIONS") {
            self.gate.log_decisions = v.parse().unwrap_or(self.gate.log_decisions);
        }

        // Database overrides
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }

        // API overrides
        if let Some(port) = env::var("TMS_GATE_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|s| s.parse::<u16>().ok())
        {
            self.api.port = port;
        }
        if let Ok(v) = env::var("API_ENABLE_REQUEST_LOGGING") {
            self.api.enable_request_logging = v.parse().unwrap_or(self.api.enable_request_logging);
        }

        // Security overrides
        if let Ok(v) = env::var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v.split(',').map(|s| s.trim().to_string()).collect();
        }
        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("SECURITY_JWT_EXPIRY_HOURS") {
            self.security.jwt_expiry_hours = v.parse().unwrap_or(self.security.jwt_expiry_hours);
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            gate: GateConfig {
                oracle_backend: OracleBackend::Postgres,
                oracle_timeout_ms: 5_000,
                lookup_timeout_ms: 5_000,
                rpc_url: None,
                rpc_api_key: None,
                log_decisions: true,
            },
            database: DatabaseConfig {
                max_connections: 10,
                connection_timeout: 30,
            },
            api: ApiConfig {
                port: 3000,
                enable_request_logging: true,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["http://localhost:3000".to_string(), "http://localhost:5173".to_string()],
                jwt_secret: String::new(),
                jwt_expiry_hours: 24 * 7, // 1 week
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            gate: GateConfig {
                oracle_backend: OracleBackend::Postgres,
                oracle_timeout_ms: 3_000,
                lookup_timeout_ms: 3_000,
                rpc_url: None,
                rpc_api_key: None,
                log_decisions: true,
            },
            database: DatabaseConfig {
                max_connections: 20,
                connection_timeout: 10,
            },
            api: ApiConfig {
                port: 3000,
                enable_request_logging: true,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://staging.example.com".to_string()],
                jwt_secret: String::new(),
                jwt_expiry_hours: 24,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            gate: GateConfig {
                oracle_backend: OracleBackend::Postgres,
                oracle_timeout_ms: 2_000,
                lookup_timeout_ms: 2_000,
                rpc_url: None,
                rpc_api_key: None,
                log_decisions: false,
            },
            database: DatabaseConfig {
                max_connections: 50,
                connection_timeout: 5,
            },
            api: ApiConfig {
                port: 3000,
                enable_request_logging: false,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://app.example.com".to_string()],
                jwt_secret: String::new(),
                jwt_expiry_hours: 4,
            },
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
        assert_eq!(config.gate.oracle_backend, OracleBackend::Postgres);
        assert_eq!(config.gate.oracle_timeout(), Duration::from_secs(5));
        assert!(config.gate.log_decisions);
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::production();
        assert_eq!(config.gate.oracle_timeout_ms, 2_000);
        assert!(!config.gate.log_decisions);
        assert_eq!(config.security.jwt_expiry_hours, 4);
    }

    #[test]
    fn test_oracle_backend_parse() {
        assert_eq!(OracleBackend::parse("RPC"), Some(OracleBackend::Rpc));
        assert_eq!(OracleBackend::parse("pg"), Some(OracleBackend::Postgres));
        assert_eq!(OracleBackend::parse("ldap"), None);
    }

    #[test]
    fn test_secrets_not_serialized() {
        let mut config = AppConfig::development();
        config.security.jwt_secret = "hunter2".to_string();
        config.gate.rpc_api_key = Some("service-key".to_string());
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("hunter2"));
        assert!(!json.contains("service-key"));
    }
}
