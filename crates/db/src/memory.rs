use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::StoreError;
use crate::model::{BookFields, BookId, BookRecord};
use crate::BookStore;

/// Process-local store; records are kept in insertion order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    books: RwLock<Vec<BookRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookStore for MemoryStore {
    async fn list(&self) -> Result<Vec<BookRecord>, StoreError> {
        Ok(self.books.read().await.clone())
    }

    async fn create(&self, fields: &BookFields) -> Result<BookRecord, StoreError> {
        let record = fields.clone().into_record(BookId::new(Uuid::now_v7().to_string()));
        self.books.write().await.push(record.clone());
        tracing::debug!(target: "shelf-db", id = %record.id, "book inserted");
        Ok(record)
    }

    async fn update(&self, id: &BookId, fields: &BookFields) -> Result<(), StoreError> {
        let mut books = self.books.write().await;
        let book = books
            .iter_mut()
            .find(|book| &book.id == id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;

        book.title = fields.title.clone();
        book.author = fields.author.clone();
        book.status = fields.status;
        Ok(())
    }

    async fn delete(&self, id: &BookId) -> Result<(), StoreError> {
        let mut books = self.books.write().await;
        let before = books.len();
        books.retain(|book| &book.id != id);

        if books.len() == before {
            return Err(StoreError::NotFound(id.clone()));
        }
        Ok(())
    }
}
