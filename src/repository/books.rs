//! Books repository. Every query is scoped to the owning user.

use chrono::Utc;
use sqlx::{Pool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::{conflict_on_unique, contains_pattern};
use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookFilters, UpdateBook},
};

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn create(&self, book: &Book) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (id, title, author, description, cover_url, genre, isbn,
                               published_date, language, pages, read, user_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING *
            "#,
        )
        .bind(book.id)
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.description)
        .bind(&book.cover_url)
        .bind(&book.genre)
        .bind(&book.isbn)
        .bind(&book.published_date)
        .bind(&book.language)
        .bind(book.pages)
        .bind(book.read)
        .bind(book.user_id)
        .bind(book.created_at)
        .bind(book.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "book already exists"))
    }

    /// List the owner's books, newest first
    pub async fn get_all(&self, owner: Uuid, filters: &BookFilters) -> AppResult<Vec<Book>> {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT * FROM books WHERE user_id = ");
        builder.push_bind(owner);

        if let Some(ref title) = filters.title {
            builder.push(" AND LOWER(title) LIKE ").push_bind(contains_pattern(title));
        }
        if let Some(ref author) = filters.author {
            builder.push(" AND LOWER(author) LIKE ").push_bind(contains_pattern(author));
        }
        if let Some(ref genre) = filters.genre {
            builder.push(" AND LOWER(genre) = ").push_bind(genre.clone());
        }
        if let Some(ref isbn) = filters.isbn {
            builder.push(" AND isbn = ").push_bind(isbn.clone());
        }
        if let Some(ref language) = filters.language {
            builder.push(" AND LOWER(language) = ").push_bind(language.clone());
        }
        if let Some(read) = filters.read {
            builder.push(" AND read = ").push_bind(read);
        }

        builder.push(" ORDER BY created_at DESC");

        let books = builder
            .build_query_as::<Book>()
            .fetch_all(&self.pool)
            .await?;
        Ok(books)
    }

    pub async fn get_by_id(&self, owner: Uuid, id: Uuid) -> AppResult<Book> {
        sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("book not found".to_string()))
    }

    /// Apply the supplied fields; id, owner and creation time never change
    pub async fn update(&self, owner: Uuid, id: Uuid, data: &UpdateBook) -> AppResult<Book> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE books SET updated_at = ");
        builder.push_bind(Utc::now());

        macro_rules! set_field {
            ($field:expr, $column:expr) => {
                if let Some(ref value) = $field {
                    builder.push(concat!(", ", $column, " = ")).push_bind(value.clone());
                }
            };
        }

        set_field!(data.title, "title");
        set_field!(data.author, "author");
        set_field!(data.description, "description");
        set_field!(data.cover_url, "cover_url");
        set_field!(data.genre, "genre");
        set_field!(data.isbn, "isbn");
        set_field!(data.published_date, "published_date");
        set_field!(data.language, "language");
        set_field!(data.pages, "pages");
        set_field!(data.read, "read");

        builder.push(" WHERE id = ").push_bind(id);
        builder.push(" AND user_id = ").push_bind(owner);
        builder.push(" RETURNING *");

        builder
            .build_query_as::<Book>()
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("book not found".to_string()))
    }

    /// Mark a book read or unread
    pub async fn set_read(&self, owner: Uuid, id: Uuid, read: bool) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(
            "UPDATE books SET read = $1, updated_at = $2 WHERE id = $3 AND user_id = $4 RETURNING *",
        )
        .bind(read)
        .bind(Utc::now())
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("book not found".to_string()))
    }

    /// Delete a book together with its library memberships (loans cascade)
    pub async fn delete(&self, owner: Uuid, id: Uuid) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            DELETE FROM book_library bl
            USING books b
            WHERE bl.book_id = b.id AND b.id = $1 AND b.user_id = $2
            "#,
        )
        .bind(id)
        .bind(owner)
        .execute(&mut *tx)
        .await?;

        let result = sqlx::query("DELETE FROM books WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            // Dropping the transaction rolls back the join-row delete
            return Err(AppError::NotFound("book not found".to_string()));
        }

        tx.commit().await?;
        Ok(())
    }
}
