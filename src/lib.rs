//! Bookshelf application library
//!
//! Book catalogue front end over a remote OData resource API. The interesting
//! part is the edit workflow in [`modules::books::editor`], which only ever
//! sends the fields a user actually entered.

use std::sync::Arc;

use anyhow::Context;
use bookshelf_kernel::{settings::Settings, InitCtx, ModuleRegistry};
use bookshelf_resource::{HttpResourceClient, ResourceApi};

pub mod modules;
pub mod references;

#[cfg(test)]
pub(crate) mod test_support;

/// Build the resource client from settings
pub fn resource_client(settings: &Settings) -> anyhow::Result<Arc<dyn ResourceApi>> {
    let client = HttpResourceClient::new(&settings.upstream)
        .with_context(|| "failed to build resource API client")?;
    Ok(Arc::new(client))
}

/// Run the module lifecycle and serve HTTP until a shutdown signal arrives
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    let api = resource_client(&settings)?;

    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, api);

    let ctx = InitCtx {
        settings: &settings,
    };
    registry.init_modules(&ctx).await?;
    registry.start_modules(&ctx).await?;

    let served =
        bookshelf_http::start_server(&registry, &settings, bookshelf_http::shutdown_signal()).await;

    registry.stop_modules().await?;
    served
}
