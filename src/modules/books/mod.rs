pub mod controller;
pub mod error;
pub mod models;
pub mod routes;
pub mod state;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use shelf_db::BookStore;
use shelf_kernel::{InitCtx, Module};
use tokio::sync::Mutex;

use controller::BookListController;
use routes::SharedController;

/// Book inventory: list, search, create, edit and delete book records
pub struct BooksModule {
    controller: SharedController,
}

impl BooksModule {
    pub fn new(store: Arc<dyn BookStore>, timeout: Duration) -> Self {
        Self {
            controller: Arc::new(Mutex::new(BookListController::new(store, timeout))),
        }
    }

    pub fn controller(&self) -> SharedController {
        self.controller.clone()
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    /// Fetch the initial list. A store outage is surfaced through the view's
    /// `last_error` rather than aborting startup.
    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        let mut controller = self.controller.lock().await;
        match controller.load().await {
            Ok(()) => tracing::info!(
                module = self.name(),
                environment = ?ctx.settings.environment,
                books = controller.state().books.len(),
                "books module initialized"
            ),
            Err(err) => tracing::warn!(
                module = self.name(),
                error = %err,
                "books module initialized without an initial list"
            ),
        }
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.controller.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(openapi_fragment())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

fn view_response(description: &str) -> serde_json::Value {
    serde_json::json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": { "$ref": "#/components/schemas/BookListView" }
            }
        }
    })
}

fn error_response(description: &str) -> serde_json::Value {
    serde_json::json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": { "$ref": "#/components/schemas/ErrorResponse" }
            }
        }
    })
}

fn openapi_fragment() -> serde_json::Value {
    let ok = view_response("Current book list view");
    let store_down = error_response("Book store unavailable");
    let not_found = error_response("Book not found");
    let invalid = error_response("Title or author missing");
    let id_param = serde_json::json!([{
        "name": "id",
        "in": "path",
        "required": true,
        "schema": { "type": "string" }
    }]);

    serde_json::json!({
        "paths": {
            "/": {
                "get": {
                    "summary": "Current view (search-filtered books, form, last error)",
                    "tags": ["Books"],
                    "responses": { "200": ok }
                }
            },
            "/load": {
                "post": {
                    "summary": "Reload the list from the store",
                    "tags": ["Books"],
                    "responses": { "200": ok, "503": store_down }
                }
            },
            "/form": {
                "put": {
                    "summary": "Set form fields",
                    "tags": ["Books"],
                    "requestBody": {
                        "required": true,
                        "content": {
                            "application/json": {
                                "schema": { "$ref": "#/components/schemas/FormInput" }
                            }
                        }
                    },
                    "responses": { "200": ok }
                }
            },
            "/submit": {
                "post": {
                    "summary": "Create a book, or save the one being edited",
                    "tags": ["Books"],
                    "responses": {
                        "200": ok,
                        "404": not_found,
                        "422": invalid,
                        "503": store_down
                    }
                }
            },
            "/cancel": {
                "post": {
                    "summary": "Leave edit mode and clear the form",
                    "tags": ["Books"],
                    "responses": { "200": ok }
                }
            },
            "/search": {
                "put": {
                    "summary": "Set the search query",
                    "tags": ["Books"],
                    "requestBody": {
                        "required": true,
                        "content": {
                            "application/json": {
                                "schema": {
                                    "type": "object",
                                    "properties": { "query": { "type": "string" } }
                                }
                            }
                        }
                    },
                    "responses": { "200": ok }
                }
            },
            "/{id}": {
                "delete": {
                    "summary": "Delete a book",
                    "tags": ["Books"],
                    "parameters": id_param,
                    "responses": { "200": ok, "404": not_found, "503": store_down }
                }
            },
            "/{id}/edit": {
                "post": {
                    "summary": "Load a book into the form for editing",
                    "tags": ["Books"],
                    "parameters": id_param,
                    "responses": { "200": ok, "404": not_found }
                }
            },
            "/health": {
                "get": {
                    "summary": "Books health check",
                    "tags": ["Books"],
                    "responses": {
                        "200": {
                            "description": "OK",
                            "content": { "text/plain": { "schema": { "type": "string" } } }
                        }
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "Book": {
                    "type": "object",
                    "properties": {
                        "id": { "type": "string", "description": "Store-assigned identifier" },
                        "title": { "type": "string", "description": "Title of the book" },
                        "author": { "type": "string", "description": "Author of the book" },
                        "status": { "type": "string", "enum": ["available", "borrowed"] }
                    },
                    "required": ["id", "title", "author", "status"]
                },
                "FormInput": {
                    "type": "object",
                    "properties": {
                        "title": { "type": "string" },
                        "author": { "type": "string" },
                        "status": { "type": "string", "enum": ["available", "borrowed"] }
                    }
                },
                "BookListView": {
                    "type": "object",
                    "properties": {
                        "books": { "type": "array", "items": { "$ref": "#/components/schemas/Book" } },
                        "total": { "type": "integer" },
                        "search": { "type": "string" },
                        "mode": { "type": "string", "enum": ["create", "edit"] },
                        "form": {
                            "type": "object",
                            "properties": {
                                "title": { "type": "string" },
                                "author": { "type": "string" },
                                "status": { "type": "string", "enum": ["available", "borrowed"] },
                                "editing_id": { "type": "string", "nullable": true }
                            }
                        },
                        "last_error": { "type": "string", "nullable": true }
                    },
                    "required": ["books", "total", "search", "mode", "form"]
                }
            }
        }
    })
}

/// Create the books module over `store`
pub fn create_module(store: Arc<dyn BookStore>, timeout: Duration) -> Arc<dyn Module> {
    Arc::new(BooksModule::new(store, timeout))
}
