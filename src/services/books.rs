//! Book management service

use chrono::Utc;
use uuid::Uuid;

use super::credentials::generate_id;
use crate::{
    error::AppResult,
    models::book::{Book, BookFilters, BookQuery, CreateBook, UpdateBook},
    repository::Repository,
    validation::validate,
};

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
}

impl BooksService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self, owner: Uuid, query: BookQuery) -> AppResult<Vec<Book>> {
        let filters = BookFilters::try_from(query)?;
        self.repository.books.get_all(owner, &filters).await
    }

    pub async fn create(&self, owner: Uuid, request: CreateBook) -> AppResult<Book> {
        validate(&request)?;
        let book = request.into_book(generate_id(), owner, Utc::now());
        self.repository.books.create(&book).await
    }

    pub async fn get(&self, owner: Uuid, id: Uuid) -> AppResult<Book> {
        self.repository.books.get_by_id(owner, id).await
    }

    pub async fn update(&self, owner: Uuid, id: Uuid, request: UpdateBook) -> AppResult<Book> {
        validate(&request)?;
        self.repository.books.update(owner, id, &request).await
    }

    pub async fn delete(&self, owner: Uuid, id: Uuid) -> AppResult<()> {
        self.repository.books.delete(owner, id).await
    }

    /// Set the reading status
    pub async fn set_read(&self, owner: Uuid, id: Uuid, read: bool) -> AppResult<Book> {
        self.repository.books.set_read(owner, id, read).await
    }
}
