//! Book store clients.
//!
//! [`BookStore`] is the four-call contract the book list runs against:
//! list, create, update and delete. [`MemoryStore`] keeps records in process,
//! [`RestStore`] talks to a hosted PostgREST table.

use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use async_trait::async_trait;
use shelf_kernel::settings::{StoreBackend, StoreSettings};

pub mod error;
pub mod memory;
pub mod model;
pub mod rest;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use model::{BookFields, BookId, BookRecord, BookStatus, ParseStatusError};
pub use rest::RestStore;

/// Remote record store holding book records.
///
/// Ordering of [`BookStore::list`] is unspecified.
#[async_trait]
pub trait BookStore: Send + Sync {
    async fn list(&self) -> Result<Vec<BookRecord>, StoreError>;

    /// Insert a record; the store assigns its id.
    async fn create(&self, fields: &BookFields) -> Result<BookRecord, StoreError>;

    /// Replace the writable fields of `id`. The id itself never changes.
    async fn update(&self, id: &BookId, fields: &BookFields) -> Result<(), StoreError>;

    async fn delete(&self, id: &BookId) -> Result<(), StoreError>;
}

/// Build the configured store.
pub fn connect(settings: &StoreSettings) -> anyhow::Result<Arc<dyn BookStore>> {
    match settings.backend {
        StoreBackend::Memory => {
            tracing::info!(target: "shelf-db", "using in-memory book store");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreBackend::Rest => {
            let url = settings
                .url
                .as_deref()
                .ok_or_else(|| anyhow!("store.url is required for the rest backend"))?;
            let store = RestStore::new(
                url,
                &settings.table,
                settings.api_key.clone(),
                Duration::from_millis(settings.timeout_ms),
            )?;
            tracing::info!(target: "shelf-db", endpoint = store.endpoint(), "using hosted book store");
            Ok(Arc::new(store))
        }
    }
}
