use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use blog_service::config::StorageBackend;
use blog_service::db::{BlogStore, MemoryStore, PgStore};
use blog_service::media::MediaStorage;
use blog_service::middleware::AuthGate;
use blog_service::{error, routes, AppState, Config, UploadLimits};
use crypto_core::jwt;
use db_pool::create_pool;
use std::io;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = terminate.recv() => {},
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to install SIGTERM handler, waiting for Ctrl+C only");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,actix_web=info,sqlx=warn".into());
    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn build_store(config: &Config) -> io::Result<Arc<dyn BlogStore>> {
    match config.storage.backend {
        StorageBackend::Postgres => {
            config.database.log_config();
            let pool = create_pool(config.database.clone()).await.map_err(|e| {
                tracing::error!(error = %e, "Failed to create database pool");
                io::Error::new(io::ErrorKind::Other, e.to_string())
            })?;

            let store = PgStore::new(pool);
            store.run_migrations().await.map_err(|e| {
                tracing::error!(error = %e, "Database migration failed");
                io::Error::new(io::ErrorKind::Other, e.to_string())
            })?;
            tracing::info!("Database migrations applied");

            Ok(Arc::new(store))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory store, data is lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

/// Blog Service
///
/// # Routes
///
/// - `/api/auth/*` - Register, login, profile
/// - `/api/posts/*` - Create, read, update, delete posts; list likers
/// - `/api/comments/*` - Create, list, delete comments
/// - `/api/likes/*` - Like and unlike posts
/// - `/api/health`, `/api/health/live` - Health checks
/// - `/uploads/*` - Stored media files
#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Configuration loading failed: {}", e);
            return Err(io::Error::new(io::ErrorKind::InvalidInput, e));
        }
    };

    tracing::info!(
        env = %config.app.env,
        backend = ?config.storage.backend,
        "Starting blog-service"
    );

    error::set_production_mode(config.app.is_production());

    jwt::initialize_jwt_secret(&config.auth.jwt_secret, config.auth.token_ttl_hours)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e.to_string()))?;

    let store = build_store(&config).await?;

    let media = MediaStorage::new(config.media.upload_dir.clone(), &config.media.public_prefix);
    media.ensure_dir().await?;
    tracing::info!(upload_dir = %media.upload_dir().display(), "Media storage ready");

    let state = web::Data::new(AppState::new(
        store,
        media,
        UploadLimits::from(&config.media),
    ));

    let bind_addr = (config.app.host.clone(), config.app.port);
    tracing::info!("Listening on {}:{}", bind_addr.0, bind_addr.1);

    let allowed_origins = config.cors.allowed_origins.clone();
    let server = HttpServer::new(move || {
        let mut cors = Cors::default();
        for origin in allowed_origins.split(',') {
            let origin = origin.trim();
            if origin.is_empty() {
                continue;
            }
            if origin == "*" {
                cors = cors.allow_any_origin();
            } else {
                cors = cors.allowed_origin(origin);
            }
        }
        cors = cors.allow_any_method().allow_any_header().max_age(3600);

        App::new()
            .app_data(state.clone())
            .wrap(AuthGate)
            .wrap(cors)
            .wrap(tracing_actix_web::TracingLogger::default())
            .configure(routes::configure)
            .service(routes::uploads(&state.media))
    })
    .bind(bind_addr)?
    .disable_signals()
    .shutdown_timeout(30)
    .run();

    let handle = server.handle();

    tokio::select! {
        result = server => result,
        _ = shutdown_signal() => {
            tracing::info!("Shutdown signal received, stopping server");
            handle.stop(true).await;
            Ok(())
        }
    }
}
