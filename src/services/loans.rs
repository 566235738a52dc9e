//! Loan management service

use chrono::Utc;
use uuid::Uuid;

use super::credentials::generate_id;
use crate::{
    error::{AppError, AppResult},
    models::loan::{CreateLoan, Loan, LoanFilters, LoanQuery},
    repository::Repository,
    validation::validate,
};

#[derive(Clone)]
pub struct LoansService {
    repository: Repository,
}

impl LoansService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Lend one of the owner's books
    pub async fn create(&self, owner: Uuid, request: CreateLoan) -> AppResult<Loan> {
        validate(&request)?;
        let book_id = Uuid::parse_str(&request.book_id)
            .map_err(|_| AppError::Validation("book_id must be a valid UUIDv4".to_string()))?;

        let loan = request.into_loan(generate_id(), book_id, owner, Utc::now());
        self.repository.loans.create(&loan).await
    }

    pub async fn list(&self, owner: Uuid, query: LoanQuery) -> AppResult<Vec<Loan>> {
        let filters = LoanFilters::try_from(query)?;
        self.repository.loans.get_all(owner, &filters).await
    }

    pub async fn get(&self, owner: Uuid, id: Uuid) -> AppResult<Loan> {
        self.repository.loans.get_by_id(owner, id).await
    }

    pub async fn return_loan(&self, owner: Uuid, id: Uuid) -> AppResult<Loan> {
        self.repository.loans.return_loan(owner, id).await
    }
}
