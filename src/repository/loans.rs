//! Loans repository

use chrono::Utc;
use sqlx::{Pool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::conflict_on_unique;
use crate::{
    error::{AppError, AppResult},
    models::loan::{Loan, LoanFilters},
};

const ALREADY_BORROWED: &str = "book already borrowed";

#[derive(Clone)]
pub struct LoansRepository {
    pool: Pool<Postgres>,
}

impl LoansRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Create a loan for a book the owner holds and that is not currently lent out
    pub async fn create(&self, loan: &Loan) -> AppResult<Loan> {
        let mut tx = self.pool.begin().await?;

        sqlx::query_scalar::<_, Uuid>("SELECT id FROM books WHERE id = $1 AND user_id = $2 FOR UPDATE")
            .bind(loan.book_id)
            .bind(loan.user_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound("book not found".to_string()))?;

        let already_borrowed: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM loans WHERE book_id = $1 AND is_returned = FALSE)",
        )
        .bind(loan.book_id)
        .fetch_one(&mut *tx)
        .await?;

        if already_borrowed {
            return Err(AppError::Conflict(ALREADY_BORROWED.to_string()));
        }

        let row = sqlx::query_as::<_, Loan>(
            r#"
            INSERT INTO loans (id, book_id, borrower_name, loan_date, is_returned, user_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(loan.id)
        .bind(loan.book_id)
        .bind(&loan.borrower_name)
        .bind(&loan.loan_date)
        .bind(loan.is_returned)
        .bind(loan.user_id)
        .bind(loan.created_at)
        .bind(loan.updated_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| conflict_on_unique(e, ALREADY_BORROWED))?;

        tx.commit().await?;
        Ok(row)
    }

    /// List the owner's loans, newest first
    pub async fn get_all(&self, owner: Uuid, filters: &LoanFilters) -> AppResult<Vec<Loan>> {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT * FROM loans WHERE user_id = ");
        builder.push_bind(owner);

        if let Some(book_id) = filters.book_id {
            builder.push(" AND book_id = ").push_bind(book_id);
        }
        if let Some(returned) = filters.returned {
            builder.push(" AND is_returned = ").push_bind(returned);
        }

        builder.push(" ORDER BY created_at DESC");

        let loans = builder
            .build_query_as::<Loan>()
            .fetch_all(&self.pool)
            .await?;
        Ok(loans)
    }

    pub async fn get_by_id(&self, owner: Uuid, id: Uuid) -> AppResult<Loan> {
        sqlx::query_as::<_, Loan>("SELECT * FROM loans WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("loan not found".to_string()))
    }

    /// Mark a loan returned. Returning an already returned loan succeeds.
    pub async fn return_loan(&self, owner: Uuid, id: Uuid) -> AppResult<Loan> {
        sqlx::query_as::<_, Loan>(
            r#"
            UPDATE loans SET is_returned = TRUE, updated_at = $1
            WHERE id = $2 AND user_id = $3
            RETURNING *
            "#,
        )
        .bind(Utc::now())
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("loan not found".to_string()))
    }
}
