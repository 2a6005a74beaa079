use std::{future::Future, net::SocketAddr, sync::Arc, time::Duration};

use axum::Router;
use migration::MigratorTrait;
use tower_http::cors::CorsLayer;
use tracing::info;

use configs::{AppConfig, DatabaseConfig, ServerConfig, StorageBackend};
use service::posts::{CachedPostStorage, InMemoryPostStorage, MokaPostCache, PostStorage, SeaOrmPostStorage};

use crate::routes::{self, AppState};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(cfg: &ServerConfig) -> anyhow::Result<SocketAddr> {
    Ok(format!("{}:{}", cfg.host, cfg.port).parse()?)
}

async fn connect_durable(cfg: &DatabaseConfig) -> anyhow::Result<SeaOrmPostStorage> {
    let db = models::db::connect_with_config(cfg).await?;
    migration::Migrator::up(&db, None).await?;
    info!(event = "migrations_applied", "post schema is up to date");
    Ok(SeaOrmPostStorage::new(db))
}

/// Construct the post storage selected by `storage.backend`.
pub async fn build_storage(cfg: &AppConfig) -> anyhow::Result<Arc<dyn PostStorage>> {
    let storage: Arc<dyn PostStorage> = match cfg.storage.backend {
        StorageBackend::Memory => Arc::new(InMemoryPostStorage::new()),
        StorageBackend::Database => Arc::new(connect_durable(&cfg.database).await?),
        StorageBackend::Cached => {
            let durable = Arc::new(connect_durable(&cfg.database).await?);
            let cache = Arc::new(MokaPostCache::new(
                Duration::from_secs(cfg.cache.ttl_secs),
                cfg.cache.max_capacity,
            ));
            info!(ttl_secs = cfg.cache.ttl_secs, max_capacity = cfg.cache.max_capacity, "post cache ready");
            Arc::new(CachedPostStorage::new(durable, cache).with_key_prefix(cfg.cache.key_prefix.clone()))
        }
    };
    Ok(storage)
}

/// Build the app for `cfg` and serve it until `shutdown` resolves.
pub async fn run<F>(cfg: AppConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let storage = build_storage(&cfg).await?;
    let app: Router = routes::build_router(AppState::new(storage), build_cors());

    let addr = bind_addr(&cfg.server)?;
    info!(%addr, backend = %cfg.storage.backend, "starting microblog server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}
