//! Database schema, applied at startup.

use sqlx::PgPool;

/// Idempotent DDL statements, executed one at a time in order.
pub const SCHEMA: &[&str] = &[
    r#"CREATE TABLE IF NOT EXISTS users (
        id UUID PRIMARY KEY,
        email VARCHAR(100) NOT NULL UNIQUE,
        password TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        deleted_at TIMESTAMPTZ
    )"#,
    r#"CREATE TABLE IF NOT EXISTS books (
        id UUID PRIMARY KEY,
        title VARCHAR(100) NOT NULL,
        author VARCHAR(100) NOT NULL,
        description VARCHAR(1024) NOT NULL DEFAULT '',
        cover_url VARCHAR(512) NOT NULL DEFAULT '',
        genre VARCHAR(100) NOT NULL DEFAULT '',
        isbn VARCHAR(20) NOT NULL DEFAULT '',
        published_date VARCHAR(20) NOT NULL DEFAULT '',
        language VARCHAR(10) NOT NULL DEFAULT '',
        pages INTEGER NOT NULL DEFAULT 0,
        read BOOLEAN NOT NULL DEFAULT FALSE,
        user_id UUID NOT NULL REFERENCES users(id),
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )"#,
    r#"CREATE INDEX IF NOT EXISTS idx_books_user ON books(user_id, created_at DESC)"#,
    r#"CREATE TABLE IF NOT EXISTS libraries (
        id UUID PRIMARY KEY,
        name VARCHAR(100) NOT NULL,
        description VARCHAR(1024) NOT NULL DEFAULT '',
        user_id UUID NOT NULL REFERENCES users(id),
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )"#,
    r#"CREATE INDEX IF NOT EXISTS idx_libraries_user ON libraries(user_id, created_at DESC)"#,
    // Join rows are removed explicitly before either side is deleted
    r#"CREATE TABLE IF NOT EXISTS book_library (
        book_id UUID NOT NULL REFERENCES books(id),
        library_id UUID NOT NULL REFERENCES libraries(id),
        PRIMARY KEY (book_id, library_id)
    )"#,
    r#"CREATE INDEX IF NOT EXISTS idx_book_library_library ON book_library(library_id)"#,
    r#"CREATE TABLE IF NOT EXISTS loans (
        id UUID PRIMARY KEY,
        book_id UUID NOT NULL REFERENCES books(id) ON DELETE CASCADE,
        borrower_name VARCHAR(100) NOT NULL,
        loan_date VARCHAR(20) NOT NULL,
        is_returned BOOLEAN NOT NULL DEFAULT FALSE,
        user_id UUID NOT NULL REFERENCES users(id),
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )"#,
    r#"CREATE INDEX IF NOT EXISTS idx_loans_user ON loans(user_id, created_at DESC)"#,
    // At most one outstanding loan per book
    r#"CREATE UNIQUE INDEX IF NOT EXISTS idx_loans_active_book
        ON loans(book_id) WHERE is_returned = FALSE"#,
    r#"CREATE TABLE IF NOT EXISTS validation_tokens (
        token VARCHAR(100) PRIMARY KEY,
        token_type VARCHAR(100) NOT NULL,
        valid BOOLEAN NOT NULL DEFAULT TRUE,
        user_id UUID NOT NULL REFERENCES users(id),
        expires_at TIMESTAMPTZ NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )"#,
    r#"CREATE INDEX IF NOT EXISTS idx_validation_tokens_user ON validation_tokens(user_id)"#,
];

/// Create missing tables and indexes
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    tracing::info!("Database schema ready ({} statements)", SCHEMA.len());
    Ok(())
}
