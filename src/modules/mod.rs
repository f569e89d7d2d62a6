pub mod books;

use std::sync::Arc;
use std::time::Duration;

use shelf_db::BookStore;
use shelf_kernel::{settings::Settings, ModuleRegistry};

/// Register all project-specific modules with the registry
pub fn register_all(registry: &mut ModuleRegistry, store: Arc<dyn BookStore>, settings: &Settings) {
    let timeout = Duration::from_millis(settings.store.timeout_ms);
    registry.register(books::create_module(store, timeout));
}
