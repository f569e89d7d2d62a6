//! HTTP actions for the book list. Every action answers with the resulting
//! [`BookListView`].

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Json, Router,
};
use shelf_http::error::AppError;
use tokio::sync::Mutex;

use super::controller::BookListController;
use super::error::BookError;
use super::models::{BookId, BookListView, FormInput, SearchInput};

/// The controller shared by all requests. Holding the lock for a whole
/// action keeps actions from interleaving on the same state.
pub type SharedController = Arc<Mutex<BookListController>>;

type ViewResult = Result<Json<BookListView>, AppError>;

/// Actions that issue store calls.
enum StoreAction {
    Load,
    Submit,
    Delete(BookId),
}

/// Run `action` on its own task, which owns the controller lock until the
/// action (write and reload) has finished. A request dropped midway, e.g. by
/// the server's request timeout, leaves the task running to completion.
async fn run_to_completion(controller: SharedController, action: StoreAction) -> ViewResult {
    let mut controller = controller.lock_owned().await;

    let task = tokio::spawn(async move {
        let result: Result<(), BookError> = match action {
            StoreAction::Load => controller.load().await,
            StoreAction::Submit => controller.submit().await.map(|_| ()),
            StoreAction::Delete(id) => controller.delete(&id).await,
        };
        result.map(|()| controller.view())
    });

    match task.await {
        Ok(result) => Ok(Json(result?)),
        Err(err) => Err(AppError::Internal(anyhow::anyhow!(
            "book action task failed: {err}"
        ))),
    }
}

pub fn router(controller: SharedController) -> Router {
    Router::new()
        .route("/", get(show))
        .route("/health", get(health_check))
        .route("/load", post(load))
        .route("/form", put(fill_form))
        .route("/submit", post(submit))
        .route("/cancel", post(cancel_edit))
        .route("/search", put(search))
        .route("/{id}", axum::routing::delete(delete))
        .route("/{id}/edit", post(begin_edit))
        .with_state(controller)
}

async fn health_check() -> &'static str {
    "books module is healthy"
}

async fn show(State(controller): State<SharedController>) -> Json<BookListView> {
    Json(controller.lock().await.view())
}

async fn load(State(controller): State<SharedController>) -> ViewResult {
    run_to_completion(controller, StoreAction::Load).await
}

async fn fill_form(
    State(controller): State<SharedController>,
    Json(input): Json<FormInput>,
) -> Json<BookListView> {
    let mut controller = controller.lock().await;
    controller.fill_form(input);
    Json(controller.view())
}

async fn submit(State(controller): State<SharedController>) -> ViewResult {
    run_to_completion(controller, StoreAction::Submit).await
}

async fn cancel_edit(State(controller): State<SharedController>) -> Json<BookListView> {
    let mut controller = controller.lock().await;
    controller.cancel_edit();
    Json(controller.view())
}

async fn search(
    State(controller): State<SharedController>,
    Json(input): Json<SearchInput>,
) -> Json<BookListView> {
    let mut controller = controller.lock().await;
    controller.search(input.query);
    Json(controller.view())
}

async fn begin_edit(
    State(controller): State<SharedController>,
    Path(id): Path<String>,
) -> ViewResult {
    let mut controller = controller.lock().await;
    controller.begin_edit_by_id(&BookId::from(id))?;
    Ok(Json(controller.view()))
}

async fn delete(State(controller): State<SharedController>, Path(id): Path<String>) -> ViewResult {
    run_to_completion(controller, StoreAction::Delete(BookId::from(id))).await
}
