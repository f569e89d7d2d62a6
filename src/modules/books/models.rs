use serde::{Deserialize, Serialize};

pub use shelf_db::{BookFields, BookId, BookRecord, BookStatus};

/// Create/edit input buffer. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct FormState {
    pub title: String,
    pub author: String,
    pub status: BookStatus,
    /// `None` while creating, the edited record's id while editing
    pub editing_id: Option<BookId>,
}

impl FormState {
    /// Form pre-filled from an existing record, in edit mode.
    pub fn editing(record: &BookRecord) -> Self {
        Self {
            title: record.title.clone(),
            author: record.author.clone(),
            status: record.status,
            editing_id: Some(record.id.clone()),
        }
    }

    pub fn mode(&self) -> FormMode {
        match self.editing_id {
            Some(_) => FormMode::Edit,
            None => FormMode::Create,
        }
    }

    pub fn fields(&self) -> BookFields {
        BookFields {
            title: self.title.clone(),
            author: self.author.clone(),
            status: self.status,
        }
    }

    /// Names of required fields that are empty.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.title.is_empty() {
            missing.push("title");
        }
        if self.author.is_empty() {
            missing.push("author");
        }
        missing
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FormMode {
    Create,
    Edit,
}

/// Everything a page needs to render the book list.
#[derive(Debug, Clone, Serialize)]
pub struct BookListView {
    /// Books matching the current search
    pub books: Vec<BookRecord>,
    /// Size of the unfiltered list
    pub total: usize,
    pub search: String,
    pub mode: FormMode,
    pub form: FormState,
    pub last_error: Option<String>,
}

/// Partial form edit; absent fields are left as they are.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FormInput {
    pub title: Option<String>,
    pub author: Option<String>,
    pub status: Option<BookStatus>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchInput {
    #[serde(default)]
    pub query: String,
}
