//! Book model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::{
    error::AppError,
    validation::{Field, FieldRules, Rule},
};

/// Book record
#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub description: String,
    pub cover_url: String,
    pub genre: String,
    pub isbn: String,
    /// Free-form publication date as entered by the user
    pub published_date: String,
    pub language: String,
    pub pages: i32,
    /// Whether the owner has read the book
    pub read: bool,
    #[serde(skip_serializing)]
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create book request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateBook {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub cover_url: String,
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub isbn: String,
    #[serde(default)]
    pub published_date: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub pages: i32,
    #[serde(default)]
    pub read: bool,
}

impl CreateBook {
    pub fn into_book(self, id: Uuid, user_id: Uuid, now: DateTime<Utc>) -> Book {
        Book {
            id,
            title: self.title,
            author: self.author,
            description: self.description,
            cover_url: self.cover_url,
            genre: self.genre,
            isbn: self.isbn,
            published_date: self.published_date,
            language: self.language,
            pages: self.pages,
            read: self.read,
            user_id,
            created_at: now,
            updated_at: now,
        }
    }
}

impl FieldRules for CreateBook {
    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            Field::text("title", &self.title, &[Rule::Required, Rule::Max(100)]),
            Field::text("author", &self.author, &[Rule::Required, Rule::Max(100)]),
            Field::text("description", &self.description, &[Rule::Max(1024)]),
            Field::text("cover_url", &self.cover_url, &[Rule::Max(512), Rule::Url]),
            Field::text("genre", &self.genre, &[Rule::Max(100)]),
            Field::text("isbn", &self.isbn, &[Rule::Max(20)]),
            Field::text("published_date", &self.published_date, &[Rule::Max(20)]),
            Field::text("language", &self.language, &[Rule::Max(10)]),
            Field::int("pages", self.pages as i64, &[Rule::Min(0)]),
        ]
    }
}

/// Update book request; only supplied fields change
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateBook {
    pub title: Option<String>,
    pub author: Option<String>,
    pub description: Option<String>,
    pub cover_url: Option<String>,
    pub genre: Option<String>,
    pub isbn: Option<String>,
    pub published_date: Option<String>,
    pub language: Option<String>,
    pub pages: Option<i32>,
    pub read: Option<bool>,
}

impl FieldRules for UpdateBook {
    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            Field::optional_text("title", self.title.as_deref(), &[Rule::Required, Rule::Max(100)]),
            Field::optional_text("author", self.author.as_deref(), &[Rule::Required, Rule::Max(100)]),
            Field::optional_text("description", self.description.as_deref(), &[Rule::Max(1024)]),
            Field::optional_text("cover_url", self.cover_url.as_deref(), &[Rule::Max(512), Rule::Url]),
            Field::optional_text("genre", self.genre.as_deref(), &[Rule::Max(100)]),
            Field::optional_text("isbn", self.isbn.as_deref(), &[Rule::Max(20)]),
            Field::optional_text("published_date", self.published_date.as_deref(), &[Rule::Max(20)]),
            Field::optional_text("language", self.language.as_deref(), &[Rule::Max(10)]),
            Field::optional_int("pages", self.pages.map(i64::from), &[Rule::Min(0)]),
        ]
    }
}

/// Query parameters for listing books
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct BookQuery {
    /// Substring match, case-insensitive
    pub title: Option<String>,
    /// Substring match, case-insensitive
    pub author: Option<String>,
    pub genre: Option<String>,
    pub isbn: Option<String>,
    pub language: Option<String>,
    /// `true` or `false`
    pub read: Option<String>,
}

/// Normalized book filters handed to the repository
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BookFilters {
    pub title: Option<String>,
    pub author: Option<String>,
    pub genre: Option<String>,
    pub isbn: Option<String>,
    pub language: Option<String>,
    pub read: Option<bool>,
}

impl TryFrom<BookQuery> for BookFilters {
    type Error = AppError;

    fn try_from(query: BookQuery) -> Result<Self, Self::Error> {
        let read = match non_empty(query.read) {
            Some(raw) => Some(parse_bool(&raw).ok_or_else(|| {
                AppError::BadRequest(format!("invalid value for read: {}", raw))
            })?),
            None => None,
        };

        Ok(Self {
            title: non_empty(query.title).map(|s| s.to_lowercase()),
            author: non_empty(query.author).map(|s| s.to_lowercase()),
            genre: non_empty(query.genre).map(|s| s.to_lowercase()),
            isbn: non_empty(query.isbn),
            language: non_empty(query.language).map(|s| s.to_lowercase()),
            read,
        })
    }
}

/// Trimmed value, or `None` when blank
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Boolean query values: `1 t T true TRUE True` and `0 f F false FALSE False`
pub(crate) fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}
