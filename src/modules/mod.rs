pub mod books;

use std::sync::Arc;

use bookshelf_db::RecordStore;
use bookshelf_kernel::ModuleRegistry;

/// Register all service modules with the registry
pub fn register_all(registry: &mut ModuleRegistry, store: Arc<dyn RecordStore<books::Book>>) {
    registry.register(books::create_module(store));
}
