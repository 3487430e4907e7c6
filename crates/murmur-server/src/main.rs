mod config;

use std::sync::Arc;

use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use murmur_api::auth::{AppState, AppStateInner};
use murmur_api::identity::{IdentityResolver, PasswordStrategy, TokenStrategy};
use murmur_api::services::{AuthService, PrivateService, PublicService};
use murmur_db::memory::{MemoryAuthRepo, MemoryPrivateRepo, MemoryPublicRepo};
use murmur_db::sqlite::{SqliteAuthRepo, SqlitePrivateRepo, SqlitePublicRepo};
use murmur_db::{AuthRepository, Database, MemoryStore, PrivateRepository, PublicRepository};

use crate::config::{AuthMode, Config, DEFAULT_JWT_SECRET, Storage};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "murmur_server=debug,murmur_api=debug,murmur_db=debug,tower_http=debug".into()
            }),
        )
        .init();

    let config = Config::from_env()?;
    let state = build_state(&config)?;

    let app = murmur_api::router(state)
        .layer(CatchPanicLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    info!("murmur listening on {}", config.addr);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("murmur stopped");
    Ok(())
}

fn build_state(config: &Config) -> anyhow::Result<AppState> {
    let (auth_repo, public_repo, private_repo): (
        Arc<dyn AuthRepository>,
        Arc<dyn PublicRepository>,
        Arc<dyn PrivateRepository>,
    ) = match &config.storage {
        Storage::Memory => {
            let store = Arc::new(MemoryStore::new());
            (
                Arc::new(MemoryAuthRepo::new(store.clone())),
                Arc::new(MemoryPublicRepo::new(store.clone())),
                Arc::new(MemoryPrivateRepo::new(store)),
            )
        }
        Storage::Sqlite(path) => {
            let db = Arc::new(Database::open(path)?);
            (
                Arc::new(SqliteAuthRepo::new(db.clone())),
                Arc::new(SqlitePublicRepo::new(db.clone())),
                Arc::new(SqlitePrivateRepo::new(db)),
            )
        }
    };

    let resolver = match config.auth {
        AuthMode::Basic => {
            info!(scheme = ?config.password_scheme, "basic auth enabled");
            IdentityResolver::Password(PasswordStrategy::new(
                auth_repo.clone(),
                config.password_scheme,
            ))
        }
        AuthMode::Bearer => {
            if config.jwt_secret == DEFAULT_JWT_SECRET {
                warn!("MURMUR_JWT_SECRET not set, signing tokens with the development secret");
            }
            info!("bearer token auth enabled");
            IdentityResolver::Token(TokenStrategy::new(&config.jwt_secret))
        }
    };

    Ok(Arc::new(AppStateInner {
        auth: AuthService::new(auth_repo, resolver),
        public: PublicService::new(public_repo),
        private: PrivateService::new(private_repo),
    }))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("failed to listen for ctrl-c: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received");
}
