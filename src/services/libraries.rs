//! Library management service

use chrono::Utc;
use uuid::Uuid;

use super::credentials::generate_id;
use crate::{
    error::AppResult,
    models::library::{CreateLibrary, Library, LibraryDetails, LibraryQuery, UpdateLibrary},
    repository::Repository,
    validation::validate,
};

#[derive(Clone)]
pub struct LibrariesService {
    repository: Repository,
}

impl LibrariesService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self, owner: Uuid, query: LibraryQuery) -> AppResult<Vec<Library>> {
        let name = query.name_filter();
        self.repository.libraries.get_all(owner, name.as_deref()).await
    }

    pub async fn create(&self, owner: Uuid, request: CreateLibrary) -> AppResult<Library> {
        validate(&request)?;
        let library = request.into_library(generate_id(), owner, Utc::now());
        self.repository.libraries.create(&library).await
    }

    pub async fn get(&self, owner: Uuid, id: Uuid) -> AppResult<LibraryDetails> {
        self.repository.libraries.get_by_id(owner, id).await
    }

    pub async fn update(&self, owner: Uuid, id: Uuid, request: UpdateLibrary) -> AppResult<Library> {
        validate(&request)?;
        self.repository.libraries.update(owner, id, &request).await
    }

    pub async fn delete(&self, owner: Uuid, id: Uuid) -> AppResult<()> {
        self.repository.libraries.delete(owner, id).await
    }

    pub async fn add_book(&self, owner: Uuid, library_id: Uuid, book_id: Uuid) -> AppResult<LibraryDetails> {
        self.repository.libraries.add_book(owner, library_id, book_id).await
    }

    pub async fn remove_book(&self, owner: Uuid, library_id: Uuid, book_id: Uuid) -> AppResult<LibraryDetails> {
        self.repository.libraries.remove_book(owner, library_id, book_id).await
    }
}
