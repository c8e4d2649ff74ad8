use axum::extract::State;

use crate::{
    error::{BookNotFound, InternalServerError},
    extractor::path::ApiPath,
    state::ApiState,
    store::Book,
    traits::StateProvider,
};

use super::BookApiError;

/// Removes the book with the given id and returns its last known values.
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = i64, Path, description = "Id of the book"),
    ),
    responses(
        (status = 200, description = "The deleted book's last known values", body = Book),
        (status = 404, description = "No book with the given id", body = BookNotFound),
    )
)]
pub async fn delete_book(
    State(state): State<ApiState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Book, BookApiError> {
    let book = state
        .book_store()
        .delete(id)
        .await
        .map_err(|err| InternalServerError::from_generic_error(state.error_verbosity(), err))?
        .ok_or_else(BookNotFound::new)?;

    Ok(book)
}
