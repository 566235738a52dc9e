//! Libraries repository and the book/library association

use chrono::Utc;
use sqlx::{Pool, Postgres, QueryBuilder, Transaction};
use uuid::Uuid;

use super::contains_pattern;
use crate::{
    error::{AppError, AppResult},
    models::{
        book::Book,
        library::{Library, LibraryDetails, UpdateLibrary},
    },
};

#[derive(Clone)]
pub struct LibrariesRepository {
    pool: Pool<Postgres>,
}

impl LibrariesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn create(&self, library: &Library) -> AppResult<Library> {
        let row = sqlx::query_as::<_, Library>(
            r#"
            INSERT INTO libraries (id, name, description, user_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(library.id)
        .bind(&library.name)
        .bind(&library.description)
        .bind(library.user_id)
        .bind(library.created_at)
        .bind(library.updated_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// List the owner's libraries, newest first, optionally filtered by name
    pub async fn get_all(&self, owner: Uuid, name: Option<&str>) -> AppResult<Vec<Library>> {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT * FROM libraries WHERE user_id = ");
        builder.push_bind(owner);

        if let Some(name) = name {
            builder.push(" AND LOWER(name) LIKE ").push_bind(contains_pattern(name));
        }

        builder.push(" ORDER BY created_at DESC");

        let rows = builder
            .build_query_as::<Library>()
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Get a library with the books attached to it
    pub async fn get_by_id(&self, owner: Uuid, id: Uuid) -> AppResult<LibraryDetails> {
        let library = sqlx::query_as::<_, Library>(
            "SELECT * FROM libraries WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("library not found".to_string()))?;

        let books = sqlx::query_as::<_, Book>(
            r#"
            SELECT b.* FROM books b
            JOIN book_library bl ON bl.book_id = b.id
            WHERE bl.library_id = $1 AND b.user_id = $2
            ORDER BY b.created_at DESC
            "#,
        )
        .bind(id)
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;

        Ok(LibraryDetails { library, books })
    }

    pub async fn update(&self, owner: Uuid, id: Uuid, data: &UpdateLibrary) -> AppResult<Library> {
        sqlx::query_as::<_, Library>(
            r#"
            UPDATE libraries
            SET name = COALESCE($1, name),
                description = COALESCE($2, description),
                updated_at = $3
            WHERE id = $4 AND user_id = $5
            RETURNING *
            "#,
        )
        .bind(&data.name)
        .bind(&data.description)
        .bind(Utc::now())
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("library not found".to_string()))
    }

    /// Delete a library and its book memberships. The books themselves stay.
    pub async fn delete(&self, owner: Uuid, id: Uuid) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            DELETE FROM book_library bl
            USING libraries l
            WHERE bl.library_id = l.id AND l.id = $1 AND l.user_id = $2
            "#,
        )
        .bind(id)
        .bind(owner)
        .execute(&mut *tx)
        .await?;

        let result = sqlx::query("DELETE FROM libraries WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("library not found".to_string()));
        }

        tx.commit().await?;
        Ok(())
    }

    /// Attach a book to a library. Attaching twice is a no-op.
    pub async fn add_book(&self, owner: Uuid, library_id: Uuid, book_id: Uuid) -> AppResult<LibraryDetails> {
        let mut tx = self.pool.begin().await?;
        lock_owned_pair(&mut tx, owner, library_id, book_id).await?;

        sqlx::query(
            r#"
            INSERT INTO book_library (book_id, library_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(book_id)
        .bind(library_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        self.get_by_id(owner, library_id).await
    }

    /// Detach a book from a library. Detaching an unattached book is a no-op.
    pub async fn remove_book(&self, owner: Uuid, library_id: Uuid, book_id: Uuid) -> AppResult<LibraryDetails> {
        let mut tx = self.pool.begin().await?;
        lock_owned_pair(&mut tx, owner, library_id, book_id).await?;

        sqlx::query("DELETE FROM book_library WHERE book_id = $1 AND library_id = $2")
            .bind(book_id)
            .bind(library_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        self.get_by_id(owner, library_id).await
    }
}

/// Lock the library and the book, failing unless the owner holds both
async fn lock_owned_pair(
    tx: &mut Transaction<'_, Postgres>,
    owner: Uuid,
    library_id: Uuid,
    book_id: Uuid,
) -> AppResult<()> {
    sqlx::query_scalar::<_, Uuid>("SELECT id FROM libraries WHERE id = $1 AND user_id = $2 FOR UPDATE")
        .bind(library_id)
        .bind(owner)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or_else(|| AppError::NotFound("library not found".to_string()))?;

    sqlx::query_scalar::<_, Uuid>("SELECT id FROM books WHERE id = $1 AND user_id = $2 FOR SHARE")
        .bind(book_id)
        .bind(owner)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or_else(|| AppError::NotFound("book not found".to_string()))?;

    Ok(())
}
