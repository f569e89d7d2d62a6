//! The book list controller.
//!
//! Owns the list/form/search state and turns user intents into store calls.
//! After every confirmed create, update or delete the form is reset as
//! needed and the full list is fetched again, so the local list never
//! carries an unconfirmed mutation.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use shelf_db::{BookStore, StoreError};

use super::error::BookError;
use super::models::{BookId, BookListView, BookRecord, BookStatus, FormInput};
use super::state::{BookAction, BookListState};

/// Result of a successful [`BookListController::submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submitted {
    Created(BookRecord),
    Updated(BookId),
}

pub struct BookListController {
    store: Arc<dyn BookStore>,
    state: BookListState,
    timeout: Duration,
}

impl BookListController {
    /// `timeout` bounds every store round-trip.
    pub fn new(store: Arc<dyn BookStore>, timeout: Duration) -> Self {
        Self {
            store,
            state: BookListState::default(),
            timeout,
        }
    }

    pub fn state(&self) -> &BookListState {
        &self.state
    }

    pub fn visible(&self) -> Vec<&BookRecord> {
        self.state.visible().collect()
    }

    pub fn view(&self) -> BookListView {
        BookListView {
            books: self.state.visible().cloned().collect(),
            total: self.state.books.len(),
            search: self.state.search.clone(),
            mode: self.state.form.mode(),
            form: self.state.form.clone(),
            last_error: self.state.last_error.clone(),
        }
    }

    fn dispatch(&mut self, action: BookAction) {
        let state = std::mem::take(&mut self.state);
        self.state = state.apply(action);
    }

    fn fail(&mut self, err: BookError) -> BookError {
        tracing::warn!(error = %err, "book action failed");
        self.dispatch(BookAction::Failed(err.to_string()));
        err
    }

    async fn call<T>(
        &self,
        operation: &'static str,
        request: impl Future<Output = Result<T, StoreError>>,
    ) -> Result<T, BookError> {
        match tokio::time::timeout(self.timeout, request).await {
            Ok(result) => result.map_err(BookError::from),
            Err(_) => Err(BookError::StoreUnavailable(format!(
                "{operation} timed out after {}ms",
                self.timeout.as_millis()
            ))),
        }
    }

    /// Replace the local list with the store's current contents.
    ///
    /// On failure the previous list stays in place and the error is recorded.
    pub async fn load(&mut self) -> Result<(), BookError> {
        let result = self.call("list", self.store.list()).await;
        match result {
            Ok(books) => {
                tracing::debug!(count = books.len(), "book list loaded");
                self.dispatch(BookAction::Loaded(books));
                Ok(())
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Create a record, or update the one being edited.
    ///
    /// An empty title or author fails before any store call. A store failure
    /// leaves the form and list untouched. On success the form resets and the
    /// list is reloaded; if only the reload fails, its error is returned and
    /// the form stays reset since the write already happened.
    pub async fn submit(&mut self) -> Result<Submitted, BookError> {
        let missing = self.state.form.missing_fields();
        if !missing.is_empty() {
            return Err(self.fail(BookError::Validation { fields: missing }));
        }

        let fields = self.state.form.fields();
        let result = match self.state.form.editing_id.clone() {
            None => self
                .call("create", self.store.create(&fields))
                .await
                .map(Submitted::Created),
            Some(id) => {
                let updated = self.call("update", self.store.update(&id, &fields)).await;
                updated.map(|()| Submitted::Updated(id))
            }
        };

        let submitted = match result {
            Ok(submitted) => submitted,
            Err(err) => return Err(self.fail(err)),
        };

        match &submitted {
            Submitted::Created(record) => tracing::info!(id = %record.id, "book created"),
            Submitted::Updated(id) => tracing::info!(id = %id, "book updated"),
        }

        self.dispatch(BookAction::Saved);
        self.load().await?;
        Ok(submitted)
    }

    /// Fill the form from `record` and switch to edit mode.
    pub fn begin_edit(&mut self, record: &BookRecord) {
        self.dispatch(BookAction::BeginEdit(record.clone()));
    }

    /// [`Self::begin_edit`] for a record in the current list.
    pub fn begin_edit_by_id(&mut self, id: &BookId) -> Result<(), BookError> {
        let record = self
            .state
            .books
            .iter()
            .find(|book| &book.id == id)
            .cloned()
            .ok_or_else(|| BookError::NotFound(id.clone()))?;
        self.dispatch(BookAction::BeginEdit(record));
        Ok(())
    }

    pub fn cancel_edit(&mut self) {
        self.dispatch(BookAction::CancelEdit);
    }

    /// Delete `id`, then reload. Resets the form if it was editing `id`.
    pub async fn delete(&mut self, id: &BookId) -> Result<(), BookError> {
        let result = self.call("delete", self.store.delete(id)).await;
        if let Err(err) = result {
            return Err(self.fail(err));
        }

        tracing::info!(id = %id, "book deleted");
        self.dispatch(BookAction::Deleted(id.clone()));
        self.load().await
    }

    pub fn search(&mut self, query: impl Into<String>) {
        self.dispatch(BookAction::Search(query.into()));
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.dispatch(BookAction::SetTitle(title.into()));
    }

    pub fn set_author(&mut self, author: impl Into<String>) {
        self.dispatch(BookAction::SetAuthor(author.into()));
    }

    pub fn set_status(&mut self, status: BookStatus) {
        self.dispatch(BookAction::SetStatus(status));
    }

    /// Apply the fields present in `input`.
    pub fn fill_form(&mut self, input: FormInput) {
        if let Some(title) = input.title {
            self.set_title(title);
        }
        if let Some(author) = input.author {
            self.set_author(author);
        }
        if let Some(status) = input.status {
            self.set_status(status);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::books::models::{BookFields, FormState};
    use async_trait::async_trait;
    use shelf_db::MemoryStore;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    /// Wraps a [`MemoryStore`], counting calls and failing on demand.
    #[derive(Default)]
    struct FlakyStore {
        inner: MemoryStore,
        down: AtomicBool,
        hang: AtomicBool,
        calls: AtomicUsize,
    }

    impl FlakyStore {
        async fn gate(&self) -> Result<(), StoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.hang.load(Ordering::SeqCst) {
                std::future::pending::<()>().await;
            }
            if self.down.load(Ordering::SeqCst) {
                return Err(StoreError::Unavailable("connection refused".into()));
            }
            Ok(())
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl BookStore for FlakyStore {
        async fn list(&self) -> Result<Vec<BookRecord>, StoreError> {
            self.gate().await?;
            self.inner.list().await
        }

        async fn create(&self, fields: &BookFields) -> Result<BookRecord, StoreError> {
            self.gate().await?;
            self.inner.create(fields).await
        }

        async fn update(&self, id: &BookId, fields: &BookFields) -> Result<(), StoreError> {
            self.gate().await?;
            self.inner.update(id, fields).await
        }

        async fn delete(&self, id: &BookId) -> Result<(), StoreError> {
            self.gate().await?;
            self.inner.delete(id).await
        }
    }

    fn controller() -> (Arc<FlakyStore>, BookListController) {
        let store = Arc::new(FlakyStore::default());
        let controller = BookListController::new(store.clone(), Duration::from_secs(5));
        (store, controller)
    }

    async fn add(controller: &mut BookListController, title: &str, author: &str) -> BookRecord {
        controller.set_title(title);
        controller.set_author(author);
        match controller.submit().await.unwrap() {
            Submitted::Created(record) => record,
            other => panic!("expected Created, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn create_then_load_contains_record() {
        let (_store, mut controller) = controller();
        controller.load().await.unwrap();

        let created = add(&mut controller, "Atomic Habits", "James Clear").await;

        let books = &controller.state().books;
        assert_eq!(books.len(), 1);
        assert_eq!(books[0], created);
        assert_eq!(books[0].title, "Atomic Habits");
        assert_eq!(books[0].author, "James Clear");
        assert_eq!(books[0].status, BookStatus::Available);
        assert_eq!(controller.state().form, FormState::default());
    }

    #[tokio::test]
    async fn update_keeps_id_and_replaces_fields() {
        let (_store, mut controller) = controller();
        let created = add(&mut controller, "Dune", "Frank Herbert").await;

        controller.begin_edit(&created);
        controller.set_title("Dune Messiah");
        controller.set_status(BookStatus::Borrowed);
        let submitted = controller.submit().await.unwrap();
        assert_eq!(submitted, Submitted::Updated(created.id.clone()));

        let books = &controller.state().books;
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].id, created.id);
        assert_eq!(books[0].title, "Dune Messiah");
        assert_eq!(books[0].status, BookStatus::Borrowed);
        assert!(controller.state().form.editing_id.is_none());
    }

    #[tokio::test]
    async fn delete_removes_record_from_list() {
        let (_store, mut controller) = controller();
        let keep = add(&mut controller, "Emma", "Jane Austen").await;
        let gone = add(&mut controller, "Dune", "Frank Herbert").await;

        controller.delete(&gone.id).await.unwrap();
        assert_eq!(controller.state().books, vec![keep]);
    }

    #[tokio::test]
    async fn deleting_the_edited_record_resets_form() {
        let (_store, mut controller) = controller();
        let book = add(&mut controller, "Dune", "Frank Herbert").await;

        controller.begin_edit_by_id(&book.id).unwrap();
        assert_eq!(controller.state().form.editing_id, Some(book.id.clone()));

        controller.delete(&book.id).await.unwrap();
        assert_eq!(controller.state().form, FormState::default());
    }

    #[tokio::test]
    async fn empty_fields_never_reach_the_store() {
        let (store, mut controller) = controller();
        add(&mut controller, "Emma", "Jane Austen").await;
        let calls = store.calls();
        let books = controller.state().books.clone();

        controller.set_title("Persuasion");
        controller.set_author("");
        let err = controller.submit().await.unwrap_err();

        assert!(matches!(err, BookError::Validation { ref fields } if fields == &vec!["author"]));
        assert_eq!(store.calls(), calls);
        assert_eq!(controller.state().books, books);
        assert_eq!(controller.state().form.title, "Persuasion");
    }

    #[tokio::test]
    async fn whitespace_fields_are_submitted_as_typed() {
        let (_store, mut controller) = controller();
        controller.set_title(" ");
        controller.set_author("Anon");

        let created = match controller.submit().await.unwrap() {
            Submitted::Created(record) => record,
            other => panic!("expected Created, got {other:?}"),
        };
        assert_eq!(created.title, " ");
        assert_eq!(controller.state().books, vec![created]);
    }

    #[tokio::test]
    async fn cancel_edit_makes_no_store_call() {
        let (store, mut controller) = controller();
        let book = add(&mut controller, "Dune", "Frank Herbert").await;
        let calls = store.calls();

        controller.begin_edit(&book);
        controller.cancel_edit();

        assert_eq!(controller.state().form, FormState::default());
        assert_eq!(store.calls(), calls);
    }

    #[tokio::test]
    async fn failed_load_keeps_previous_list() {
        let (store, mut controller) = controller();
        add(&mut controller, "Emma", "Jane Austen").await;
        let books = controller.state().books.clone();

        store.down.store(true, Ordering::SeqCst);
        let err = controller.load().await.unwrap_err();

        assert!(matches!(err, BookError::StoreUnavailable(_)));
        assert_eq!(controller.state().books, books);
        assert!(controller.state().last_error.is_some());

        store.down.store(false, Ordering::SeqCst);
        controller.load().await.unwrap();
        assert!(controller.state().last_error.is_none());
    }

    #[tokio::test]
    async fn failed_submit_preserves_form_and_list() {
        let (store, mut controller) = controller();
        let book = add(&mut controller, "Emma", "Jane Austen").await;

        controller.begin_edit(&book);
        controller.set_title("Persuasion");
        let form = controller.state().form.clone();

        store.down.store(true, Ordering::SeqCst);
        let err = controller.submit().await.unwrap_err();

        assert!(matches!(err, BookError::StoreUnavailable(_)));
        assert_eq!(controller.state().form, form);
        assert_eq!(controller.state().books, vec![book]);
    }

    #[tokio::test]
    async fn failed_delete_changes_nothing() {
        let (store, mut controller) = controller();
        let book = add(&mut controller, "Emma", "Jane Austen").await;
        controller.begin_edit(&book);

        store.down.store(true, Ordering::SeqCst);
        assert!(controller.delete(&book.id).await.is_err());

        assert_eq!(controller.state().books, vec![book.clone()]);
        assert_eq!(controller.state().form.editing_id, Some(book.id));
    }

    #[tokio::test]
    async fn updating_a_stale_id_is_not_found() {
        let (store, mut controller) = controller();
        let book = add(&mut controller, "Emma", "Jane Austen").await;
        controller.begin_edit(&book);

        // another client removes it
        store.inner.delete(&book.id).await.unwrap();

        let err = controller.submit().await.unwrap_err();
        assert!(matches!(err, BookError::NotFound(ref id) if id == &book.id));
        assert_eq!(controller.state().form.editing_id, Some(book.id));
    }

    #[tokio::test]
    async fn begin_edit_by_unknown_id_is_not_found() {
        let (_store, mut controller) = controller();
        let err = controller.begin_edit_by_id(&BookId::from("nope")).unwrap_err();
        assert!(matches!(err, BookError::NotFound(_)));
        assert_eq!(controller.state().form, FormState::default());
    }

    #[tokio::test]
    async fn hung_store_call_times_out() {
        let store = Arc::new(FlakyStore::default());
        store.hang.store(true, Ordering::SeqCst);
        let mut controller = BookListController::new(store, Duration::from_millis(50));

        let err = controller.load().await.unwrap_err();
        match err {
            BookError::StoreUnavailable(message) => assert!(message.contains("timed out")),
            other => panic!("expected StoreUnavailable, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn search_filters_view_without_store_calls() {
        let (store, mut controller) = controller();
        add(&mut controller, "Atomic Habits", "James Clear").await;
        add(&mut controller, "Dune", "Frank Herbert").await;
        let calls = store.calls();

        controller.search("CLEAR");
        let view = controller.view();
        assert_eq!(view.total, 2);
        assert_eq!(view.books.len(), 1);
        assert_eq!(view.books[0].title, "Atomic Habits");
        assert_eq!(controller.visible().len(), 1);
        assert_eq!(store.calls(), calls);
    }
}
