use std::path::Path;

use rusqlite::{params, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio_rusqlite::Connection;
use utoipa::ToSchema;

/// A persisted book.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub published_year: i32,
}

/// Fields of a book that are supplied by the caller. The id is assigned by
/// the store on insert and is never written afterwards.
#[derive(Debug, Clone)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub published_year: i32,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database operation failed: {0}")]
    Database(#[from] tokio_rusqlite::Error),
}

/// Handle to the books database.
///
/// Wraps a single [`Connection`] whose background thread serializes all
/// database closures. Each operation borrows the underlying connection for
/// exactly the duration of its closure, so the connection is released on
/// every exit path.
#[derive(Clone)]
pub struct BookStore {
    conn: Connection,
}

impl BookStore {
    /// Opens the database file and ensures the books table exists.
    pub async fn open<P>(path: P) -> Result<Self, StoreError>
    where
        P: AsRef<Path> + Send + 'static,
    {
        let conn = Connection::open(path).await?;

        Self::init_schema(conn).await
    }

    /// Opens an in-memory database. The data lives as long as the store.
    pub async fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().await?;

        Self::init_schema(conn).await
    }

    async fn init_schema(conn: Connection) -> Result<Self, StoreError> {
        conn.call(|conn| {
            conn.execute(
                "CREATE TABLE IF NOT EXISTS books (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    title TEXT NOT NULL,
                    author TEXT NOT NULL,
                    published_year INTEGER NOT NULL
                )",
                [],
            )?;

            Ok(())
        })
        .await?;

        tracing::debug!("Books table ready");

        Ok(Self { conn })
    }

    #[tracing::instrument(name = "store_insert", skip_all)]
    pub async fn insert(&self, new_book: NewBook) -> Result<Book, StoreError> {
        let book = self
            .conn
            .call(move |conn| {
                tracing::trace!(?new_book, "INSERT INTO books");

                conn.execute(
                    "INSERT INTO books (title, author, published_year) VALUES (?1, ?2, ?3)",
                    params![new_book.title, new_book.author, new_book.published_year],
                )?;

                let id = conn.last_insert_rowid();

                Ok(Book {
                    id,
                    title: new_book.title,
                    author: new_book.author,
                    published_year: new_book.published_year,
                })
            })
            .await?;

        Ok(book)
    }

    #[tracing::instrument(name = "store_list", skip_all)]
    pub async fn list(&self) -> Result<Vec<Book>, StoreError> {
        let books = self
            .conn
            .call(|conn| {
                tracing::trace!("SELECT FROM books");

                let mut stmt =
                    conn.prepare("SELECT id, title, author, published_year FROM books")?;

                let rows = stmt.query_map([], book_from_row)?;

                let mut books = Vec::new();
                for book in rows {
                    books.push(book?);
                }

                Ok(books)
            })
            .await?;

        Ok(books)
    }

    #[tracing::instrument(name = "store_get", skip(self))]
    pub async fn get(&self, id: i64) -> Result<Option<Book>, StoreError> {
        let book = self
            .conn
            .call(move |conn| {
                tracing::trace!(%id, "SELECT FROM books WHERE id");

                let book = conn
                    .query_row(
                        "SELECT id, title, author, published_year FROM books WHERE id = ?1",
                        [id],
                        book_from_row,
                    )
                    .optional()?;

                Ok(book)
            })
            .await?;

        Ok(book)
    }

    /// Overwrites all caller-supplied fields of the book with the given id.
    ///
    /// Returns [`None`] without touching the table when the id is absent.
    #[tracing::instrument(name = "store_update", skip(self, new_book))]
    pub async fn update(&self, id: i64, new_book: NewBook) -> Result<Option<Book>, StoreError> {
        let book = self
            .conn
            .call(move |conn| {
                tracing::trace!(%id, ?new_book, "UPDATE books WHERE id");

                let affected = conn.execute(
                    "UPDATE books SET title = ?1, author = ?2, published_year = ?3 WHERE id = ?4",
                    params![new_book.title, new_book.author, new_book.published_year, id],
                )?;

                if affected == 0 {
                    return Ok(None);
                }

                Ok(Some(Book {
                    id,
                    title: new_book.title,
                    author: new_book.author,
                    published_year: new_book.published_year,
                }))
            })
            .await?;

        Ok(book)
    }

    /// Removes the book with the given id, returning its last known values.
    ///
    /// Returns [`None`] without touching the table when the id is absent.
    #[tracing::instrument(name = "store_delete", skip(self))]
    pub async fn delete(&self, id: i64) -> Result<Option<Book>, StoreError> {
        let book = self
            .conn
            .call(move |conn| {
                tracing::trace!(%id, "DELETE FROM books WHERE id");

                let book = conn
                    .query_row(
                        "SELECT id, title, author, published_year FROM books WHERE id = ?1",
                        [id],
                        book_from_row,
                    )
                    .optional()?;

                let Some(book) = book else {
                    return Ok(None);
                };

                conn.execute("DELETE FROM books WHERE id = ?1", [id])?;

                Ok(Some(book))
            })
            .await?;

        Ok(book)
    }
}

fn book_from_row(row: &Row) -> rusqlite::Result<Book> {
    Ok(Book {
        id: row.get(0)?,
        title: row.get(1)?,
        author: row.get(2)?,
        published_year: row.get(3)?,
    })
}
