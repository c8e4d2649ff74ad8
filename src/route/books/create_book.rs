use axum::extract::State;

use crate::{
    error::{ApiError, ApiErrorResponse, InternalServerError},
    extractor::json::ApiJson,
    state::ApiState,
    store::Book,
    traits::StateProvider,
};

use super::BookPayload;

/// Creates a new book. The id is assigned by the store.
#[utoipa::path(
    post,
    path = "/books/",
    tag = "books",
    request_body = BookPayload,
    responses(
        (status = 200, description = "The created book with its assigned id", body = Book),
        (status = 400, description = "Malformed request body", body = ApiErrorResponse),
    )
)]
pub async fn create_book(
    State(state): State<ApiState>,
    ApiJson(payload): ApiJson<BookPayload>,
) -> Result<Book, ApiError> {
    let book = state
        .book_store()
        .insert(payload.into())
        .await
        .map_err(|err| InternalServerError::from_generic_error(state.error_verbosity(), err))?;

    Ok(book)
}
