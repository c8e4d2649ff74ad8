use axum::{extract::State, Json};

use crate::{
    error::{ApiError, InternalServerError},
    state::ApiState,
    store::Book,
    traits::StateProvider,
};

/// Returns every stored book in storage-native order.
#[utoipa::path(
    get,
    path = "/books/",
    tag = "books",
    responses(
        (status = 200, description = "All stored books", body = [Book]),
    )
)]
pub async fn list_books(State(state): State<ApiState>) -> Result<Json<Vec<Book>>, ApiError> {
    let books = state
        .book_store()
        .list()
        .await
        .map_err(|err| InternalServerError::from_generic_error(state.error_verbosity(), err))?;

    Ok(Json(books))
}
