//! shelf: a book inventory manager.
//!
//! The books module keeps a list of book records in sync with a hosted
//! record store and exposes list, search, create, edit and delete actions
//! over HTTP.

pub mod modules;

use anyhow::Context;
use shelf_kernel::{settings::Settings, InitCtx, ModuleRegistry};

/// Connect the store, bring up every module, and serve HTTP until shutdown.
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    tracing::info!(
        env = ?settings.environment,
        store = ?settings.store.backend,
        "shelf bootstrap starting"
    );

    let store = shelf_db::connect(&settings.store).context("failed to connect book store")?;

    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, store, &settings);

    let ctx = InitCtx {
        settings: &settings,
    };
    registry.init_all(&ctx).await?;
    registry.start_all(&ctx).await?;

    tracing::info!("shelf bootstrap complete");
    let served = shelf_http::start_server(&registry, &settings).await;

    registry.stop_all().await?;
    served
}
