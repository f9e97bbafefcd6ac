use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Form, Json,
};
use bookshelf_http::error::AppError;
use bookshelf_resource::{create_entity, fetch_entities, fetch_entity, ClientError, ResourceApi};

use super::editor::{BookEditor, EditLoad, EditSubmit};
use super::forms::{CreateBookForm, CreateBookView, DeleteBookForm, EditBookInput, FieldError};
use super::models::Book;
use super::{BOOKS, LISTING_PATH};
use crate::references::ReferenceLists;

const EXPAND_ALL: &[&str] = &["Location", "Press"];

#[derive(Clone)]
pub struct BooksState {
    pub api: Arc<dyn ResourceApi>,
    pub editor: BookEditor,
}

impl BooksState {
    pub fn new(api: Arc<dyn ResourceApi>) -> Self {
        Self {
            editor: BookEditor::new(api.clone()),
            api,
        }
    }
}

fn read_error(id: i64, error: ClientError) -> AppError {
    match error {
        ClientError::NotFound { .. } => AppError::not_found(format!("book {id} not found")),
        other => AppError::bad_gateway(other.to_string()),
    }
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "books module is healthy"
}

/// List every book; an unavailable upstream renders an empty list
pub async fn list_books(State(state): State<BooksState>) -> Json<Vec<Book>> {
    Json(fetch_entities::<Book>(state.api.as_ref(), BOOKS).await.into_items())
}

/// Book with its press and location inlined
pub async fn book_details(
    State(state): State<BooksState>,
    Path(id): Path<i64>,
) -> Result<Json<Book>, AppError> {
    fetch_entity::<Book>(state.api.as_ref(), BOOKS, id, EXPAND_ALL)
        .await
        .map(Json)
        .map_err(|e| read_error(id, e))
}

/// Blank create form with both selectors filled
pub async fn create_form(State(state): State<BooksState>) -> Json<CreateBookView> {
    let references = ReferenceLists::resolve(state.api.as_ref()).await;
    Json(CreateBookView::new(
        CreateBookForm::default(),
        references,
        Vec::new(),
    ))
}

pub async fn create_book(
    State(state): State<BooksState>,
    Form(form): Form<CreateBookForm>,
) -> Response {
    let errors = match form.validate() {
        Ok(book) => match create_entity(state.api.as_ref(), BOOKS, &book).await {
            Ok(()) => {
                tracing::info!(title = %book.title, "book created");
                return Redirect::to(LISTING_PATH).into_response();
            }
            Err(e) => {
                tracing::warn!(error = %e, "book creation rejected");
                vec![FieldError::form("The book could not be created.")]
            }
        },
        Err(errors) => errors,
    };

    let references = ReferenceLists::resolve(state.api.as_ref()).await;
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(CreateBookView::new(form, references, errors)),
    )
        .into_response()
}

pub async fn edit_form(
    State(state): State<BooksState>,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    match state.editor.load(id).await {
        Ok(EditLoad::Ready(view)) => Ok(Json(view).into_response()),
        Ok(EditLoad::NotFound) => Err(AppError::not_found(format!("book {id} not found"))),
        Err(e) => Err(read_error(id, e)),
    }
}

pub async fn edit_book(
    State(state): State<BooksState>,
    Path(id): Path<i64>,
    Form(input): Form<EditBookInput>,
) -> Response {
    match state.editor.submit_posted(id, input).await {
        EditSubmit::Updated => Redirect::to(LISTING_PATH).into_response(),
        EditSubmit::Invalid(view) => (StatusCode::UNPROCESSABLE_ENTITY, Json(view)).into_response(),
    }
}

/// Delete confirmation shows the same expanded book as details
pub async fn delete_form(
    State(state): State<BooksState>,
    Path(id): Path<i64>,
) -> Result<Json<Book>, AppError> {
    book_details(State(state), Path(id)).await
}

pub async fn delete_confirmed(
    State(state): State<BooksState>,
    Form(form): Form<DeleteBookForm>,
) -> Result<Redirect, AppError> {
    let id = form
        .book_id()
        .ok_or_else(|| AppError::bad_request("a numeric Id is required"))?;

    match state.api.delete(BOOKS, id).await {
        Ok(()) => {
            tracing::info!(book_id = id, "book deleted");
            Ok(Redirect::to(LISTING_PATH))
        }
        Err(e) => {
            tracing::warn!(book_id = id, error = %e, "book deletion rejected");
            Err(AppError::not_found(format!("book {id} could not be deleted")))
        }
    }
}
