//! shopform-store: contact intake backed by SQLite.

use tracing::info;

use shopform_server::config::{ServerConfig, Variant};
use shopform_server::store::{self, StoreState};
use shopform_server::telemetry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load config and start logging
    let config = ServerConfig::load()?;
    telemetry::init(&config.logging.level)?;

    info!("shopform store server starting");

    // 2. Open database
    let db_path = config.database_path();
    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let conn = shopform_db::open(&db_path)?;
    info!("Database ready at {:?}", db_path);

    // 3. Serve
    let state = StoreState::new(conn, config.store.classification_policy);
    let addr = config.bind_addr(Variant::Store)?;
    shopform_server::serve(store::router(state), addr).await
}
