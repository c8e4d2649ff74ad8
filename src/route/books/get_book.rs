use axum::extract::State;

use crate::{
    error::{BookNotFound, InternalServerError},
    extractor::path::ApiPath,
    state::ApiState,
    store::Book,
    traits::StateProvider,
};

use super::BookApiError;

/// Returns the book with the given id.
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = i64, Path, description = "Id of the book"),
    ),
    responses(
        (status = 200, description = "The book with the given id", body = Book),
        (status = 404, description = "No book with the given id", body = BookNotFound),
    )
)]
pub async fn get_book(
    State(state): State<ApiState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Book, BookApiError> {
    let book = state
        .book_store()
        .get(id)
        .await
        .map_err(|err| InternalServerError::from_generic_error(state.error_verbosity(), err))?
        .ok_or_else(BookNotFound::new)?;

    Ok(book)
}
