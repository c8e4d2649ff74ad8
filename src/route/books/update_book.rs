use axum::extract::State;

use crate::{
    error::{ApiErrorResponse, BookNotFound, InternalServerError},
    extractor::{json::ApiJson, path::ApiPath},
    state::ApiState,
    store::Book,
    traits::StateProvider,
};

use super::{BookApiError, BookPayload};

/// Overwrites all caller-supplied fields of the book with the given id.
///
/// This is a full replacement, not a partial patch. The id itself is never
/// changed.
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = i64, Path, description = "Id of the book"),
    ),
    request_body = BookPayload,
    responses(
        (status = 200, description = "The updated book", body = Book),
        (status = 400, description = "Malformed request body", body = ApiErrorResponse),
        (status = 404, description = "No book with the given id", body = BookNotFound),
    )
)]
pub async fn update_book(
    State(state): State<ApiState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<BookPayload>,
) -> Result<Book, BookApiError> {
    let book = state
        .book_store()
        .update(id, payload.into())
        .await
        .map_err(|err| InternalServerError::from_generic_error(state.error_verbosity(), err))?
        .ok_or_else(BookNotFound::new)?;

    Ok(book)
}
