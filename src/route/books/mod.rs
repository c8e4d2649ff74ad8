use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use derive_more::From;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::{ApiError, BookNotFound, InternalServerError},
    store::{Book, NewBook},
};

pub mod app;
pub mod create_book;
pub mod delete_book;
pub mod get_book;
pub mod list_books;
pub mod update_book;

/// Caller-supplied book fields, shared by create and update.
///
/// Carries no id. None of the fields is constrained beyond its type; in
/// particular `published_year` accepts any integer.
#[derive(Debug, Serialize, Deserialize, JsonSchema, ToSchema)]
pub struct BookPayload {
    pub title: String,
    pub author: String,
    pub published_year: i32,
}

impl From<BookPayload> for NewBook {
    fn from(payload: BookPayload) -> Self {
        NewBook {
            title: payload.title,
            author: payload.author,
            published_year: payload.published_year,
        }
    }
}

impl IntoResponse for Book {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Error returned by the book handlers.
///
/// The not-found arm carries the pinned `{"detail": "Book not found"}`
/// response; everything else goes through the [`ApiError`] envelope.
#[derive(Debug, From)]
pub enum BookApiError {
    NotFound(BookNotFound),
    Api(ApiError),
}

impl From<InternalServerError> for BookApiError {
    fn from(err: InternalServerError) -> Self {
        BookApiError::Api(ApiError::from(err))
    }
}

impl IntoResponse for BookApiError {
    fn into_response(self) -> Response {
        match self {
            BookApiError::NotFound(err) => err.into_response(),
            BookApiError::Api(err) => err.into_response(),
        }
    }
}
