pub mod books;

use std::sync::Arc;

use bookshelf_kernel::ModuleRegistry;
use bookshelf_resource::ResourceApi;

/// Register all application modules with the registry
pub fn register_all(registry: &mut ModuleRegistry, api: Arc<dyn ResourceApi>) {
    registry.register(books::create_module(api));
}
