//! Business logic services

pub mod auth;
pub mod books;
pub mod credentials;
pub mod email;
pub mod libraries;
pub mod loans;

use crate::{config::AppConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub repository: Repository,
    pub auth: auth::AuthService,
    pub books: books::BooksService,
    pub libraries: libraries::LibrariesService,
    pub loans: loans::LoansService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, config: &AppConfig) -> Self {
        let email = email::EmailService::new(config.email.clone());

        Self {
            auth: auth::AuthService::new(
                repository.clone(),
                config.auth.clone(),
                email,
                config.app.url.clone(),
            ),
            books: books::BooksService::new(repository.clone()),
            libraries: libraries::LibrariesService::new(repository.clone()),
            loans: loans::LoansService::new(repository.clone()),
            repository,
        }
    }
}
