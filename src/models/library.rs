//! Library model: a named, user-owned collection of books

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::book::{non_empty, Book};
use crate::validation::{Field, FieldRules, Rule};

#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
pub struct Library {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    #[serde(skip_serializing)]
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Library with the books attached to it
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LibraryDetails {
    #[serde(flatten)]
    pub library: Library,
    pub books: Vec<Book>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateLibrary {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl CreateLibrary {
    pub fn into_library(self, id: Uuid, user_id: Uuid, now: DateTime<Utc>) -> Library {
        Library {
            id,
            name: self.name,
            description: self.description,
            user_id,
            created_at: now,
            updated_at: now,
        }
    }
}

impl FieldRules for CreateLibrary {
    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            Field::text("name", &self.name, &[Rule::Required, Rule::Max(100)]),
            Field::text("description", &self.description, &[Rule::Max(1024)]),
        ]
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateLibrary {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl FieldRules for UpdateLibrary {
    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            Field::optional_text("name", self.name.as_deref(), &[Rule::Required, Rule::Max(100)]),
            Field::optional_text("description", self.description.as_deref(), &[Rule::Max(1024)]),
        ]
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct LibraryQuery {
    /// Substring match on the library name, case-insensitive
    pub name: Option<String>,
}

impl LibraryQuery {
    /// Lowercased name filter, or `None` when blank
    pub fn name_filter(self) -> Option<String> {
        non_empty(self.name).map(|s| s.to_lowercase())
    }
}
