use crate::auth::JwtConfig;
use crate::services::TransitionPolicy;
use std::path::PathBuf;

/// Server configuration
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | WORK_DIR | ./data | SQLite file and logs |
/// | DATABASE_PATH | {WORK_DIR}/ovape.db | SQLite file |
/// | HTTP_PORT | 3000 | HTTP port |
/// | ENVIRONMENT | development | development / production |
/// | LOG_LEVEL | info | default log filter |
/// | LOG_JSON | false | JSON log lines |
/// | LOG_DIR | (unset) | daily rotated log files |
/// | JWT_SECRET | generated in development | HS256 secret |
/// | JWT_ISSUER / JWT_AUDIENCE | ovape-auth / ovape-stamp | token claims |
/// | AS_TRANSITION_POLICY | open | open / strict |
/// | REQUEST_TIMEOUT_MS | 30000 | request timeout (ms) |
/// | DB_MAX_CONNECTIONS | 5 | sqlx pool size |
///
/// # Example
///
/// ```ignore
/// WORK_DIR=/srv/ovape HTTP_PORT=8080 AS_TRANSITION_POLICY=strict cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    pub work_dir: String,
    pub database_path: String,
    pub http_port: u16,
    /// development | production
    pub environment: String,
    pub log_level: String,
    pub log_json: bool,
    pub log_dir: Option<String>,
    pub jwt: JwtConfig,
    /// After-service status transition rules
    pub transition_policy: TransitionPolicy,
    pub request_timeout_ms: u64,
    pub db_max_connections: u32,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Unset or unparsable values fall back to defaults
    pub fn from_env() -> Self {
        let work_dir = std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into());
        let database_path = std::env::var("DATABASE_PATH").unwrap_or_else(|_| {
            PathBuf::from(&work_dir)
                .join("ovape.db")
                .to_string_lossy()
                .into_owned()
        });

        Self {
            work_dir,
            database_path,
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_json: std::env::var("LOG_JSON")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            log_dir: std::env::var("LOG_DIR").ok().filter(|d| !d.is_empty()),
            jwt: JwtConfig::default(),
            transition_policy: std::env::var("AS_TRANSITION_POLICY")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or_default(),
            request_timeout_ms: std::env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(30000),
            db_max_connections: std::env::var("DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5),
        }
    }

    /// Defaults for tests: in-memory friendly, fixed JWT secret
    pub fn for_tests() -> Self {
        Self {
            work_dir: ".".into(),
            database_path: ":memory:".into(),
            http_port: 0,
            environment: "test".into(),
            log_level: "info".into(),
            log_json: false,
            log_dir: None,
            jwt: JwtConfig::with_secret("test-secret-with-at-least-32-characters!"),
            transition_policy: TransitionPolicy::Open,
            request_timeout_ms: 30000,
            db_max_connections: 1,
        }
    }

    /// Reject settings that are unsafe outside development
    pub fn validate(&self) -> Result<(), String> {
        if self.is_production() && self.jwt.generated {
            return Err("JWT_SECRET must be set (32+ characters) in production".into());
        }
        Ok(())
    }

    /// Whether running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
