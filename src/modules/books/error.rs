use serde_json::json;
use shelf_db::StoreError;
use shelf_http::error::AppError;
use thiserror::Error;

use super::models::BookId;

#[derive(Debug, Error)]
pub enum BookError {
    /// Required form fields are empty; nothing was sent to the store.
    #[error("{}", required_message(.fields))]
    Validation { fields: Vec<&'static str> },

    /// The store no longer has this id.
    #[error("book '{0}' not found")]
    NotFound(BookId),

    /// Network/service failure or timeout on a store call.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
}

fn required_message(fields: &[&'static str]) -> String {
    let verb = if fields.len() == 1 { "is" } else { "are" };
    format!("{} {verb} required", fields.join(" and "))
}

impl From<StoreError> for BookError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(message) => BookError::StoreUnavailable(message),
            StoreError::NotFound(id) => BookError::NotFound(id),
        }
    }
}

impl From<BookError> for AppError {
    fn from(err: BookError) -> Self {
        match &err {
            BookError::Validation { fields } => {
                let details = fields
                    .iter()
                    .map(|field| json!({"field": field, "error": "required"}))
                    .collect();
                AppError::validation(details, err.to_string())
            }
            BookError::NotFound(_) => AppError::not_found(err.to_string()),
            BookError::StoreUnavailable(_) => AppError::service_unavailable(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn validation_message_names_fields() {
        let err = BookError::Validation {
            fields: vec!["title", "author"],
        };
        assert_eq!(err.to_string(), "title and author are required");

        let err = BookError::Validation {
            fields: vec!["author"],
        };
        assert_eq!(err.to_string(), "author is required");
    }

    #[test]
    fn store_errors_keep_their_kind() {
        let err = BookError::from(StoreError::NotFound(BookId::from("4")));
        assert!(matches!(err, BookError::NotFound(ref id) if id.as_str() == "4"));

        let err = BookError::from(StoreError::Unavailable("connection refused".into()));
        assert_eq!(err.to_string(), "store unavailable: connection refused");
    }

    #[test]
    fn http_status_per_kind() {
        let validation = AppError::from(BookError::Validation {
            fields: vec!["title"],
        });
        assert_eq!(validation.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let missing = AppError::from(BookError::NotFound(BookId::from("4")));
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);

        let down = AppError::from(BookError::StoreUnavailable("timeout".into()));
        assert_eq!(down.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
