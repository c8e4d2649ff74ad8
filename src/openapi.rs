use utoipa::OpenApi;

use crate::{
    error::{
        ApiError, ApiErrorResponse, BodyError, BookNotFound, InternalServerError,
        MethodNotAllowedError, NotFoundError, PathError,
    },
    route::books,
    store::Book,
};

/// OpenAPI document for the books API.
///
/// Served as JSON at `/openapi.json` and rendered interactively at `/docs`
/// (Swagger UI) and `/redoc`.
#[derive(OpenApi)]
#[openapi(
    paths(
        books::create_book::create_book,
        books::list_books::list_books,
        books::get_book::get_book,
        books::update_book::update_book,
        books::delete_book::delete_book,
    ),
    components(schemas(
        Book,
        books::BookPayload,
        BookNotFound,
        ApiErrorResponse,
        ApiError,
        InternalServerError,
        BodyError,
        PathError,
        MethodNotAllowedError,
        NotFoundError,
    )),
    tags(
        (name = "books", description = "Create, read, update and delete books")
    )
)]
pub struct ApiDoc;
