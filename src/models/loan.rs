//! Loan model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::book::{non_empty, parse_bool};
use crate::{
    error::AppError,
    validation::{Field, FieldRules, Rule},
};

/// A book lent to someone
#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
pub struct Loan {
    pub id: Uuid,
    pub book_id: Uuid,
    pub borrower_name: String,
    pub loan_date: String,
    pub is_returned: bool,
    #[serde(skip_serializing)]
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create loan request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateLoan {
    /// Book id (UUIDv4)
    #[serde(default)]
    pub book_id: String,
    #[serde(default)]
    pub borrower_name: String,
    #[serde(default)]
    pub loan_date: String,
}

impl CreateLoan {
    /// Build the loan row. `book_id` must have passed validation.
    pub fn into_loan(self, id: Uuid, book_id: Uuid, user_id: Uuid, now: DateTime<Utc>) -> Loan {
        Loan {
            id,
            book_id,
            borrower_name: self.borrower_name,
            loan_date: self.loan_date,
            is_returned: false,
            user_id,
            created_at: now,
            updated_at: now,
        }
    }
}

impl FieldRules for CreateLoan {
    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            Field::text("book_id", &self.book_id, &[Rule::Required, Rule::UuidV4]),
            Field::text("borrower_name", &self.borrower_name, &[Rule::Required, Rule::Max(100)]),
            Field::text("loan_date", &self.loan_date, &[Rule::Required, Rule::Max(20)]),
        ]
    }
}

/// Query parameters for listing loans
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct LoanQuery {
    pub book_id: Option<String>,
    /// Only returned (`true`) or outstanding (`false`) loans
    pub returned: Option<String>,
}

/// Parsed loan filters
#[derive(Debug, Default, Clone, PartialEq)]
pub struct LoanFilters {
    pub book_id: Option<Uuid>,
    pub returned: Option<bool>,
}

impl TryFrom<LoanQuery> for LoanFilters {
    type Error = AppError;

    fn try_from(query: LoanQuery) -> Result<Self, Self::Error> {
        let book_id = match non_empty(query.book_id) {
            Some(raw) => Some(Uuid::parse_str(&raw).map_err(|_| {
                AppError::BadRequest(format!("invalid value for book_id: {}", raw))
            })?),
            None => None,
        };
        let returned = match non_empty(query.returned) {
            Some(raw) => Some(parse_bool(&raw).ok_or_else(|| {
                AppError::BadRequest(format!("invalid value for returned: {}", raw))
            })?),
            None => None,
        };

        Ok(Self { book_id, returned })
    }
}
