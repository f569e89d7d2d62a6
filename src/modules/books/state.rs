//! Book list state and its transitions.
//!
//! Every mutation goes through [`BookListState::apply`], which takes the
//! current state and an action and returns the next state. Store round-trips
//! live in the controller; nothing here is async.

use super::models::{BookId, BookRecord, BookStatus, FormState};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BookListState {
    /// Latest snapshot of the store
    pub books: Vec<BookRecord>,
    pub form: FormState,
    pub search: String,
    /// Last failure surfaced to the user; cleared by a successful load
    pub last_error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookAction {
    Loaded(Vec<BookRecord>),
    Failed(String),
    SetTitle(String),
    SetAuthor(String),
    SetStatus(BookStatus),
    BeginEdit(BookRecord),
    CancelEdit,
    /// A create or update was confirmed by the store
    Saved,
    /// A delete was confirmed by the store
    Deleted(BookId),
    Search(String),
}

impl BookListState {
    pub fn apply(self, action: BookAction) -> Self {
        match action {
            BookAction::Loaded(books) => Self {
                books,
                last_error: None,
                ..self
            },
            BookAction::Failed(message) => Self {
                last_error: Some(message),
                ..self
            },
            BookAction::SetTitle(title) => Self {
                form: FormState { title, ..self.form },
                ..self
            },
            BookAction::SetAuthor(author) => Self {
                form: FormState {
                    author,
                    ..self.form
                },
                ..self
            },
            BookAction::SetStatus(status) => Self {
                form: FormState {
                    status,
                    ..self.form
                },
                ..self
            },
            BookAction::BeginEdit(record) => Self {
                form: FormState::editing(&record),
                ..self
            },
            BookAction::CancelEdit | BookAction::Saved => Self {
                form: FormState::default(),
                ..self
            },
            BookAction::Deleted(id) => {
                if self.form.editing_id.as_ref() == Some(&id) {
                    Self {
                        form: FormState::default(),
                        ..self
                    }
                } else {
                    self
                }
            }
            BookAction::Search(search) => Self { search, ..self },
        }
    }

    /// Records matching the current search, in store order.
    pub fn visible(&self) -> impl Iterator<Item = &BookRecord> {
        let query = self.search.to_lowercase();
        self.books
            .iter()
            .filter(move |record| matches_lowered(record, &query))
    }
}

/// Case-insensitive substring match on title or author; an empty query
/// matches everything.
pub fn matches(record: &BookRecord, query: &str) -> bool {
    matches_lowered(record, &query.to_lowercase())
}

fn matches_lowered(record: &BookRecord, query: &str) -> bool {
    query.is_empty()
        || record.title.to_lowercase().contains(query)
        || record.author.to_lowercase().contains(query)
}
