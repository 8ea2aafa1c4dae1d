/// Blog Service Library
///
/// REST backend for a small social blog: posts with image/video media,
/// comments, likes, and JWT bearer authentication with `user`/`admin` roles.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers
/// - `services`: Business logic (validation, ownership, view assembly)
/// - `db`: `BlogStore` trait with PostgreSQL and in-memory backends
/// - `media`: Upload storage on the local filesystem
/// - `middleware`: Bearer authentication and permission checks
/// - `error`: Error types and the JSON error responder
/// - `config`: Configuration management
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod media;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

pub use config::Config;
pub use error::{AppError, Result};

use std::sync::Arc;

use db::BlogStore;
use media::MediaStorage;

/// Limits applied while reading multipart uploads
#[derive(Debug, Clone, Copy)]
pub struct UploadLimits {
    pub max_files: usize,
    pub max_file_size_bytes: usize,
}

impl From<&config::MediaConfig> for UploadLimits {
    fn from(cfg: &config::MediaConfig) -> Self {
        Self {
            max_files: cfg.max_files,
            max_file_size_bytes: cfg.max_file_size_bytes,
        }
    }
}

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn BlogStore>,
    pub media: Arc<MediaStorage>,
    pub upload_limits: UploadLimits,
}

impl AppState {
    pub fn new(store: Arc<dyn BlogStore>, media: MediaStorage, upload_limits: UploadLimits) -> Self {
        Self {
            store,
            media: Arc::new(media),
            upload_limits,
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    /// Install a JWT secret once per test binary
    pub fn init_jwt() {
        static INIT: std::sync::Once = std::sync::Once::new();
        INIT.call_once(|| {
            let _ = crypto_core::jwt::initialize_jwt_secret("blog-service-unit-secret", 1);
        });
    }
}
