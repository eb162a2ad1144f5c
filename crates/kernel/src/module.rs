//! Lifecycle of a bookshelf service module.
//!
//! `app::run` drives every registered module through the same sequence:
//! `init`, route mounting, `start`, serving, then `stop` once the shutdown
//! signal fires. The books module is the only one today.

use async_trait::async_trait;
use axum::Router;

use crate::settings::Settings;

/// Borrowed view of the resolved configuration handed to `init` and `start`.
pub struct InitCtx<'a> {
    pub settings: &'a Settings,
}

#[async_trait]
pub trait Module: Sync + Send {
    /// Mount segment and log label, e.g. `books` for `/api/books`.
    fn name(&self) -> &'static str;

    /// Runs before any route is served. A failure here aborts startup.
    ///
    /// The books module reads its record store once here, so an unreadable
    /// catalog stops the service before the listener binds.
    async fn init(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Handlers relative to `/api/{name}`; paths like `/search` land at
    /// `/api/{name}/search`.
    fn routes(&self) -> Router {
        Router::new()
    }

    /// OpenAPI document holding `paths` and `components.schemas`, with paths
    /// relative to the mount point. Merged into `/docs/openapi.json`.
    fn openapi(&self) -> Option<serde_json::Value> {
        None
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Called in reverse registration order after the server drains.
    async fn stop(&self) -> anyhow::Result<()> {
        Ok(())
    }
}
