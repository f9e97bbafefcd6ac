//! Edit Reconciler: loads a book into an edit form and turns a submitted
//! form into a sparse PATCH.

use std::sync::Arc;

use bookshelf_resource::{fetch_entity, ClientError, ClientResult, ResourceApi};

use super::forms::{EditBookForm, EditBookInput, EditBookView, FieldError};
use super::models::Book;
use super::BOOKS;
use crate::references::{address_options, press_options, ReferenceLists};

/// Outcome of the load phase.
#[derive(Debug, Clone, PartialEq)]
pub enum EditLoad {
    Ready(EditBookView),
    NotFound,
}

/// Outcome of the submit phase.
#[derive(Debug, Clone, PartialEq)]
pub enum EditSubmit {
    /// Upstream accepted the patch; go back to the listing.
    Updated,
    /// Validation or upstream rejection; values kept, options freshly resolved.
    Invalid(EditBookView),
}

#[derive(Clone)]
pub struct BookEditor {
    api: Arc<dyn ResourceApi>,
}

impl BookEditor {
    pub fn new(api: Arc<dyn ResourceApi>) -> Self {
        Self { api }
    }

    /// Fetch the book and both option lists concurrently, then bind the form.
    ///
    /// Transport failures on the book fetch are returned as errors; any other
    /// failure to fetch it is `NotFound`.
    pub async fn load(&self, id: i64) -> ClientResult<EditLoad> {
        tracing::info!(book_id = id, "loading book for edit");
        let api = self.api.as_ref();

        let (book, presses, addresses) = tokio::join!(
            fetch_entity::<Book>(api, BOOKS, id, &[]),
            press_options(api),
            address_options(api),
        );

        let book = match book {
            Ok(book) => book,
            Err(ClientError::NotFound { .. }) => {
                tracing::info!(book_id = id, "book to edit not found");
                return Ok(EditLoad::NotFound);
            }
            Err(e) => return Err(e),
        };

        let references = ReferenceLists { presses, addresses };
        Ok(EditLoad::Ready(EditBookView::new(
            EditBookForm::from_book(&book),
            references,
            Vec::new(),
        )))
    }

    /// Submit a form exactly as posted; numbers that do not parse make it invalid.
    pub async fn submit_posted(&self, id: i64, input: EditBookInput) -> EditSubmit {
        let (form, errors) = input.parse();
        if errors.is_empty() {
            return self.submit(id, form).await;
        }

        tracing::warn!(
            book_id = id,
            fields = ?errors.iter().filter_map(|e| e.field.as_deref()).collect::<Vec<_>>(),
            "book edit has malformed numbers"
        );
        self.invalid(form, errors).await
    }

    /// Validate `form`, send only the entered fields, and report the outcome.
    pub async fn submit(&self, id: i64, form: EditBookForm) -> EditSubmit {
        tracing::info!(book_id = id, "submitting book edit");

        let confirmed_id = match form.validate(id) {
            Ok(confirmed_id) => confirmed_id,
            Err(errors) => {
                tracing::warn!(
                    book_id = id,
                    fields = ?errors.iter().filter_map(|e| e.field.as_deref()).collect::<Vec<_>>(),
                    "book edit failed validation"
                );
                return self.invalid(form, errors).await;
            }
        };

        let patch = form.to_patch(confirmed_id);
        tracing::info!(
            book_id = id,
            fields = ?patch.keys().collect::<Vec<_>>(),
            "sending sparse book update"
        );

        match self.api.partial_update(BOOKS, id, &patch).await {
            Ok(()) => {
                tracing::info!(book_id = id, "book updated");
                EditSubmit::Updated
            }
            Err(e) => {
                tracing::warn!(book_id = id, error = %e, "book update rejected");
                let message = match &e {
                    ClientError::Upstream { status, .. } => {
                        format!("The book could not be saved (upstream answered {status}).")
                    }
                    _ => "The book could not be saved; the catalogue service is unreachable."
                        .to_string(),
                };
                self.invalid(form, vec![FieldError::form(message)]).await
            }
        }
    }

    /// Option lists carried by a submitted form are never trusted; resolve them again.
    async fn invalid(&self, form: EditBookForm, errors: Vec<FieldError>) -> EditSubmit {
        let references = ReferenceLists::resolve(self.api.as_ref()).await;
        EditSubmit::Invalid(EditBookView::new(form, references, errors))
    }
}
