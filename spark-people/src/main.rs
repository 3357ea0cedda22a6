use std::sync::Arc;

use spark_people::config::{AppConfig, StorageBackend};
use spark_people::services::seed;
use spark_people::store::{MemoryStore, PgStore, SwipeStore, UserDirectory};
use spark_people::AppState;

fn split<S>(store: Arc<S>) -> (Arc<dyn SwipeStore>, Arc<dyn UserDirectory>)
where
    S: SwipeStore + UserDirectory + 'static,
{
    (store.clone(), store)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    spark_shared::middleware::init_tracing("spark-people");

    let config = AppConfig::load()?;
    let port = config.port;

    let metrics_handle = spark_shared::middleware::init_metrics()?;

    let (swipes, directory) = match config.storage {
        StorageBackend::Postgres => {
            let pool = spark_shared::clients::db::create_pool(&config.database_url, config.db_max_connections)?;
            split(Arc::new(PgStore::new(pool)))
        }
        StorageBackend::Memory => {
            tracing::warn!("using in-memory storage; swipes are lost on restart");
            split(Arc::new(MemoryStore::new()))
        }
    };

    seed::seed_demo_users(directory.as_ref(), config.seed_demo_users)?;

    let state = Arc::new(AppState::new(config, swipes, directory, Some(metrics_handle)));
    let app = spark_people::router(state);

    let addr = format!("0.0.0.0:{port}");
    tracing::info!(addr = %addr, "spark-people starting");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
