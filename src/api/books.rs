//! Book endpoints

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use super::{auth::MessageResponse, ApiPath, ApiQuery, AuthenticatedUser};
use crate::{
    error::AppResult,
    models::book::{Book, BookQuery, CreateBook, UpdateBook},
};

/// List the caller's books
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    security(("cookie_auth" = []), ("bearer_auth" = [])),
    params(BookQuery),
    responses(
        (status = 200, description = "Books, newest first", body = Vec<Book>),
        (status = 400, description = "Invalid filter", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_books(
    State(state): State<crate::AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    ApiQuery(query): ApiQuery<BookQuery>,
) -> AppResult<Json<Vec<Book>>> {
    let books = state.services.books.list(user.id, query).await?;
    Ok(Json(books))
}

/// Add a book
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    security(("cookie_auth" = []), ("bearer_auth" = [])),
    request_body = CreateBook,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 422, description = "Invalid payload", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(request): Json<CreateBook>,
) -> AppResult<(StatusCode, Json<Book>)> {
    let book = state.services.books.create(user.id, request).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

#[utoipa::path(
    get,
    path = "/books/{bookId}",
    tag = "books",
    security(("cookie_auth" = []), ("bearer_auth" = [])),
    params(("bookId" = Uuid, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book details", body = Book),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    ApiPath(id): ApiPath<Uuid>,
) -> AppResult<Json<Book>> {
    let book = state.services.books.get(user.id, id).await?;
    Ok(Json(book))
}

/// Update the supplied fields of a book
#[utoipa::path(
    put,
    path = "/books/{bookId}",
    tag = "books",
    security(("cookie_auth" = []), ("bearer_auth" = [])),
    params(("bookId" = Uuid, Path, description = "Book ID")),
    request_body = UpdateBook,
    responses(
        (status = 200, description = "Book updated", body = Book),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse),
        (status = 422, description = "Invalid payload", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    ApiPath(id): ApiPath<Uuid>,
    Json(request): Json<UpdateBook>,
) -> AppResult<Json<Book>> {
    let book = state.services.books.update(user.id, id, request).await?;
    Ok(Json(book))
}

/// Delete a book, its library memberships and its loans
#[utoipa::path(
    delete,
    path = "/books/{bookId}",
    tag = "books",
    security(("cookie_auth" = []), ("bearer_auth" = [])),
    params(("bookId" = Uuid, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book deleted", body = MessageResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    ApiPath(id): ApiPath<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    state.services.books.delete(user.id, id).await?;
    Ok(MessageResponse::new("Book deleted successfully"))
}

/// Mark a book as read
#[utoipa::path(
    put,
    path = "/books/{bookId}/read",
    tag = "books",
    security(("cookie_auth" = []), ("bearer_auth" = [])),
    params(("bookId" = Uuid, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book marked read", body = Book),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn mark_read(
    State(state): State<crate::AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    ApiPath(id): ApiPath<Uuid>,
) -> AppResult<Json<Book>> {
    let book = state.services.books.set_read(user.id, id, true).await?;
    Ok(Json(book))
}

/// Mark a book as unread
#[utoipa::path(
    delete,
    path = "/books/{bookId}/read",
    tag = "books",
    security(("cookie_auth" = []), ("bearer_auth" = [])),
    params(("bookId" = Uuid, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book marked unread", body = Book),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn mark_unread(
    State(state): State<crate::AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    ApiPath(id): ApiPath<Uuid>,
) -> AppResult<Json<Book>> {
    let book = state.services.books.set_read(user.id, id, false).await?;
    Ok(Json(book))
}
