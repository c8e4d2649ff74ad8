use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use http_body_util::BodyExt;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::{
    error::ErrorVerbosity,
    server::{self, ServerConfig},
    state::ApiState,
    store::{Book, BookStore, NewBook},
};

#[tokio::test]
async fn example_config_is_valid() {
    ServerConfig::from_config_file("config.example.yaml")
        .await
        .expect("Example config is not parsable");
}

async fn test_router() -> Router {
    let store = BookStore::open_in_memory()
        .await
        .expect("Failed to open in-memory store");

    let state = ApiState::new(ErrorVerbosity::Full, store);

    server::router(state)
}

async fn send(router: &Router, request: Request<Body>) -> Response {
    router
        .clone()
        .oneshot(request)
        .await
        .expect("Request failed")
}

fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("Failed to build request")
}

fn empty_request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("Failed to build request")
}

async fn response_json<T: DeserializeOwned>(response: Response) -> T {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read response body")
        .to_bytes();

    serde_json::from_slice(&bytes).expect("Response body is not valid JSON")
}

fn dune() -> Value {
    json!({"title": "Dune", "author": "Herbert", "published_year": 1965})
}

async fn create_book(router: &Router, body: Value) -> Book {
    let response = send(router, json_request(Method::POST, "/books/", body)).await;
    assert_eq!(response.status(), StatusCode::OK);

    response_json(response).await
}

#[tokio::test]
async fn create_returns_assigned_id_and_supplied_fields() {
    let router = test_router().await;

    let book = create_book(&router, dune()).await;

    assert_eq!(book.id, 1);
    assert_eq!(book.title, "Dune");
    assert_eq!(book.author, "Herbert");
    assert_eq!(book.published_year, 1965);
}

#[tokio::test]
async fn created_ids_are_never_reused() {
    let router = test_router().await;

    let first = create_book(&router, dune()).await;
    let second = create_book(
        &router,
        json!({"title": "Hyperion", "author": "Simmons", "published_year": 1989}),
    )
    .await;

    assert_ne!(first.id, second.id);

    let response = send(
        &router,
        empty_request(Method::DELETE, &format!("/books/{}", second.id)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let third = create_book(
        &router,
        json!({"title": "Solaris", "author": "Lem", "published_year": 1961}),
    )
    .await;

    assert_ne!(third.id, first.id);
    assert_ne!(third.id, second.id);
}

#[tokio::test]
async fn get_after_create_returns_created_values() {
    let router = test_router().await;

    let created = create_book(&router, dune()).await;

    let response = send(
        &router,
        empty_request(Method::GET, &format!("/books/{}", created.id)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let fetched: Book = response_json(response).await;
    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.title, created.title);
    assert_eq!(fetched.author, created.author);
    assert_eq!(fetched.published_year, created.published_year);
}

#[tokio::test]
async fn list_contains_all_created_books() {
    let router = test_router().await;

    let mut created_ids = Vec::new();
    for year in [1965, 1989, 1961] {
        let book = create_book(
            &router,
            json!({"title": "Book", "author": "Author", "published_year": year}),
        )
        .await;
        created_ids.push(book.id);
    }

    let response = send(&router, empty_request(Method::GET, "/books/")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let books: Vec<Book> = response_json(response).await;
    assert_eq!(books.len(), created_ids.len());

    for id in created_ids {
        assert!(books.iter().any(|book| book.id == id));
    }
}

#[tokio::test]
async fn get_missing_book_returns_not_found() {
    let router = test_router().await;

    let response = send(&router, empty_request(Method::GET, "/books/9999")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body: Value = response_json(response).await;
    assert_eq!(body, json!({"detail": "Book not found"}));
}

#[tokio::test]
async fn update_replaces_all_fields() {
    let router = test_router().await;

    let created = create_book(&router, dune()).await;

    let response = send(
        &router,
        json_request(
            Method::PUT,
            &format!("/books/{}", created.id),
            json!({"title": "Dune Messiah", "author": "Frank Herbert", "published_year": 1969}),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let updated: Book = response_json(response).await;
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.title, "Dune Messiah");
    assert_eq!(updated.author, "Frank Herbert");
    assert_eq!(updated.published_year, 1969);

    let response = send(
        &router,
        empty_request(Method::GET, &format!("/books/{}", created.id)),
    )
    .await;
    let fetched: Book = response_json(response).await;
    assert_eq!(fetched.title, "Dune Messiah");
    assert_eq!(fetched.author, "Frank Herbert");
    assert_eq!(fetched.published_year, 1969);
}

#[tokio::test]
async fn update_missing_book_returns_not_found() {
    let router = test_router().await;

    let response = send(
        &router,
        json_request(Method::PUT, "/books/9999", dune()),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body: Value = response_json(response).await;
    assert_eq!(body, json!({"detail": "Book not found"}));
}

#[tokio::test]
async fn delete_returns_last_known_values_and_removes_the_book() {
    let router = test_router().await;

    let created = create_book(&router, dune()).await;

    let response = send(
        &router,
        empty_request(Method::DELETE, &format!("/books/{}", created.id)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let deleted: Book = response_json(response).await;
    assert_eq!(deleted.id, created.id);
    assert_eq!(deleted.title, "Dune");
    assert_eq!(deleted.author, "Herbert");
    assert_eq!(deleted.published_year, 1965);

    let response = send(
        &router,
        empty_request(Method::GET, &format!("/books/{}", created.id)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(&router, empty_request(Method::GET, "/books/")).await;
    let books: Vec<Book> = response_json(response).await;
    assert!(books.is_empty());
}

#[tokio::test]
async fn delete_missing_book_returns_not_found_and_preserves_rows() {
    let router = test_router().await;

    create_book(&router, dune()).await;

    let response = send(&router, empty_request(Method::DELETE, "/books/9999")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body: Value = response_json(response).await;
    assert_eq!(body, json!({"detail": "Book not found"}));

    let response = send(&router, empty_request(Method::GET, "/books/")).await;
    let books: Vec<Book> = response_json(response).await;
    assert_eq!(books.len(), 1);
}

#[tokio::test]
async fn malformed_create_body_is_rejected_before_storage() {
    let router = test_router().await;

    let response = send(
        &router,
        json_request(Method::POST, "/books/", json!({"title": "Dune"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send(&router, empty_request(Method::GET, "/books/")).await;
    let books: Vec<Book> = response_json(response).await;
    assert!(books.is_empty());
}

#[tokio::test]
async fn non_integer_id_is_rejected() {
    let router = test_router().await;

    let response = send(&router, empty_request(Method::GET, "/books/abc")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_route_returns_not_found() {
    let router = test_router().await;

    let response = send(&router, empty_request(Method::GET, "/shelves/")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn wrong_method_returns_method_not_allowed() {
    let router = test_router().await;

    let response = send(&router, empty_request(Method::PATCH, "/books/")).await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn dune_example_end_to_end() {
    let router = test_router().await;

    let response = send(&router, json_request(Method::POST, "/books/", dune())).await;
    assert_eq!(response.status(), StatusCode::OK);
    let created: Value = response_json(response).await;
    assert_eq!(
        created,
        json!({"id": 1, "title": "Dune", "author": "Herbert", "published_year": 1965})
    );

    let response = send(&router, empty_request(Method::GET, "/books/1")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let fetched: Value = response_json(response).await;
    assert_eq!(fetched, created);

    let response = send(&router, empty_request(Method::DELETE, "/books/1")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let deleted: Value = response_json(response).await;
    assert_eq!(deleted, created);

    let response = send(&router, empty_request(Method::GET, "/books/1")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn store_update_of_missing_id_is_none() {
    let store = BookStore::open_in_memory()
        .await
        .expect("Failed to open in-memory store");

    let updated = store
        .update(
            9999,
            NewBook {
                title: "Dune".to_string(),
                author: "Herbert".to_string(),
                published_year: 1965,
            },
        )
        .await
        .expect("Update failed");

    assert!(updated.is_none());
}

#[tokio::test]
async fn store_list_order_is_storage_native() {
    let store = BookStore::open_in_memory()
        .await
        .expect("Failed to open in-memory store");

    for title in ["first", "second", "third"] {
        store
            .insert(NewBook {
                title: title.to_string(),
                author: "Author".to_string(),
                published_year: 2000,
            })
            .await
            .expect("Insert failed");
    }

    let books = store.list().await.expect("List failed");
    let titles: Vec<&str> = books.iter().map(|book| book.title.as_str()).collect();

    assert_eq!(titles, ["first", "second", "third"]);
}
