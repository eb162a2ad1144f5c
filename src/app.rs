//! Service bootstrap: store, modules, HTTP server, shutdown.

use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use bookshelf_db::{MemoryStore, RecordStore};
use bookshelf_kernel::{settings::Settings, InitCtx, ModuleRegistry};

use crate::modules::{self, books::Book};

/// Open the record store described by the settings.
pub fn open_store(settings: &Settings) -> anyhow::Result<Arc<dyn RecordStore<Book>>> {
    match &settings.database.seed_path {
        Some(path) => {
            let store = bookshelf_db::load_seed::<Book>(path)
                .with_context(|| format!("failed to seed the catalog from '{}'", path))?;
            Ok(Arc::new(store))
        }
        None => {
            tracing::warn!("no seed configured; the catalog starts empty");
            Ok(Arc::new(MemoryStore::<Book>::new()))
        }
    }
}

/// Registry with every service module wired to `store`.
pub fn build_registry(store: Arc<dyn RecordStore<Book>>) -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, store);
    registry
}

/// Full HTTP application over `store`, without binding a listener.
pub fn router(store: Arc<dyn RecordStore<Book>>, settings: &Settings) -> Router {
    let registry = build_registry(store);
    bookshelf_http::build_router(&registry, settings)
}

/// Run the service until a shutdown signal arrives.
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    let store = open_store(&settings)?;
    let registry = build_registry(store);
    let ctx = InitCtx {
        settings: &settings,
    };

    registry.init_modules(&ctx).await?;
    registry.start_modules(&ctx).await?;

    let served =
        bookshelf_http::start_server(&registry, &settings, bookshelf_http::shutdown_signal()).await;

    // Stop modules even when serving failed, then report the first error.
    let stopped = registry.stop_modules().await;
    served?;
    stopped?;

    tracing::info!("bookshelf shutdown complete");
    Ok(())
}
