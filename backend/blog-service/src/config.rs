/// Configuration management for the blog service
///
/// All settings come from environment variables (a `.env` file is loaded by
/// `main` first). Production mode tightens the CORS and JWT requirements.
use db_pool::env_utils::{env_or, parse_env_with_default};
use db_pool::DbConfig;
use std::path::PathBuf;
use std::str::FromStr;

const DEV_JWT_SECRET: &str = "blog-dev-secret-change-me";

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub cors: CorsConfig,
    pub auth: AuthConfig,
    pub storage: StorageConfig,
    /// PostgreSQL pool settings, used when the postgres backend is selected
    pub database: DbConfig,
    pub media: MediaConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Application environment (development, staging, production)
    pub env: String,
    pub host: String,
    pub port: u16,
}

impl AppConfig {
    pub fn is_production(&self) -> bool {
        self.env.eq_ignore_ascii_case("production")
    }
}

#[derive(Debug, Clone)]
pub struct CorsConfig {
    /// Comma-separated list of allowed origins
    pub allowed_origins: String,
}

#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"[REDACTED]")
            .field("token_ttl_hours", &self.token_ttl_hours)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(format!(
                "STORAGE_BACKEND must be 'postgres' or 'memory', got '{other}'"
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
}

#[derive(Debug, Clone)]
pub struct MediaConfig {
    pub upload_dir: PathBuf,
    /// URL prefix under which uploads are served
    pub public_prefix: String,
    pub max_files: usize,
    pub max_file_size_bytes: usize,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("./uploads"),
            public_prefix: "/uploads".to_string(),
            max_files: 5,
            max_file_size_bytes: 50 * 1024 * 1024,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        let app_env = env_or("APP_ENV", "development");
        let production = app_env.eq_ignore_ascii_case("production");

        let cors = {
            let allowed_origins = match std::env::var("CORS_ALLOWED_ORIGINS") {
                Ok(value) if !value.trim().is_empty() => value,
                _ if production => {
                    return Err("CORS_ALLOWED_ORIGINS must be set in production".to_string())
                }
                _ => "http://localhost:3000".to_string(),
            };

            if production && allowed_origins.trim() == "*" {
                return Err("CORS_ALLOWED_ORIGINS cannot be '*' in production".to_string());
            }

            CorsConfig { allowed_origins }
        };

        let auth = {
            let jwt_secret = match std::env::var("JWT_SECRET") {
                Ok(value) if !value.trim().is_empty() => value,
                _ if production => return Err("JWT_SECRET must be set in production".to_string()),
                _ => {
                    tracing::warn!("JWT_SECRET not set, using development secret");
                    DEV_JWT_SECRET.to_string()
                }
            };

            AuthConfig {
                jwt_secret,
                token_ttl_hours: parse_env_with_default("JWT_TTL_HOURS", 720),
            }
        };

        let backend = env_or("STORAGE_BACKEND", "postgres").parse()?;

        let defaults = MediaConfig::default();
        let media = MediaConfig {
            upload_dir: PathBuf::from(env_or("UPLOAD_DIR", "./uploads")),
            public_prefix: defaults.public_prefix,
            max_files: parse_env_with_default("MEDIA_MAX_FILES", defaults.max_files),
            max_file_size_bytes: parse_env_with_default(
                "MEDIA_MAX_FILE_SIZE_BYTES",
                defaults.max_file_size_bytes,
            ),
        };

        Ok(Config {
            app: AppConfig {
                env: app_env,
                host: env_or("BLOG_SERVICE_HOST", "0.0.0.0"),
                port: parse_env_with_default("BLOG_SERVICE_PORT", 5000),
            },
            cors,
            auth,
            storage: StorageConfig { backend },
            database: DbConfig::from_env("blog-service"),
            media,
        })
    }
}
