//! Library endpoints

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use super::{auth::MessageResponse, ApiPath, ApiQuery, AuthenticatedUser};
use crate::{
    error::AppResult,
    models::library::{CreateLibrary, Library, LibraryDetails, LibraryQuery, UpdateLibrary},
};

#[utoipa::path(
    get,
    path = "/libraries",
    tag = "libraries",
    security(("cookie_auth" = []), ("bearer_auth" = [])),
    params(LibraryQuery),
    responses(
        (status = 200, description = "Libraries, newest first", body = Vec<Library>)
    )
)]
pub async fn list_libraries(
    State(state): State<crate::AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    ApiQuery(query): ApiQuery<LibraryQuery>,
) -> AppResult<Json<Vec<Library>>> {
    let libraries = state.services.libraries.list(user.id, query).await?;
    Ok(Json(libraries))
}

#[utoipa::path(
    post,
    path = "/libraries",
    tag = "libraries",
    security(("cookie_auth" = []), ("bearer_auth" = [])),
    request_body = CreateLibrary,
    responses(
        (status = 201, description = "Library created", body = Library),
        (status = 422, description = "Invalid payload", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_library(
    State(state): State<crate::AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(request): Json<CreateLibrary>,
) -> AppResult<(StatusCode, Json<Library>)> {
    let library = state.services.libraries.create(user.id, request).await?;
    Ok((StatusCode::CREATED, Json(library)))
}

/// Get a library with its books
#[utoipa::path(
    get,
    path = "/libraries/{libraryId}",
    tag = "libraries",
    security(("cookie_auth" = []), ("bearer_auth" = [])),
    params(("libraryId" = Uuid, Path, description = "Library ID")),
    responses(
        (status = 200, description = "Library details", body = LibraryDetails),
        (status = 404, description = "Library not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_library(
    State(state): State<crate::AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    ApiPath(id): ApiPath<Uuid>,
) -> AppResult<Json<LibraryDetails>> {
    let library = state.services.libraries.get(user.id, id).await?;
    Ok(Json(library))
}

#[utoipa::path(
    put,
    path = "/libraries/{libraryId}",
    tag = "libraries",
    security(("cookie_auth" = []), ("bearer_auth" = [])),
    params(("libraryId" = Uuid, Path, description = "Library ID")),
    request_body = UpdateLibrary,
    responses(
        (status = 200, description = "Library updated", body = Library),
        (status = 404, description = "Library not found", body = crate::error::ErrorResponse),
        (status = 422, description = "Invalid payload", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_library(
    State(state): State<crate::AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    ApiPath(id): ApiPath<Uuid>,
    Json(request): Json<UpdateLibrary>,
) -> AppResult<Json<Library>> {
    let library = state.services.libraries.update(user.id, id, request).await?;
    Ok(Json(library))
}

/// Delete a library; its books are kept
#[utoipa::path(
    delete,
    path = "/libraries/{libraryId}",
    tag = "libraries",
    security(("cookie_auth" = []), ("bearer_auth" = [])),
    params(("libraryId" = Uuid, Path, description = "Library ID")),
    responses(
        (status = 200, description = "Library deleted", body = MessageResponse),
        (status = 404, description = "Library not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_library(
    State(state): State<crate::AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    ApiPath(id): ApiPath<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    state.services.libraries.delete(user.id, id).await?;
    Ok(MessageResponse::new("Library deleted successfully"))
}

/// Attach a book to a library
#[utoipa::path(
    post,
    path = "/libraries/{libraryId}/books/{bookId}",
    tag = "libraries",
    security(("cookie_auth" = []), ("bearer_auth" = [])),
    params(
        ("libraryId" = Uuid, Path, description = "Library ID"),
        ("bookId" = Uuid, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book attached", body = LibraryDetails),
        (status = 404, description = "Library or book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn add_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    ApiPath((library_id, book_id)): ApiPath<(Uuid, Uuid)>,
) -> AppResult<Json<LibraryDetails>> {
    let library = state.services.libraries.add_book(user.id, library_id, book_id).await?;
    Ok(Json(library))
}

/// Detach a book from a library
#[utoipa::path(
    delete,
    path = "/libraries/{libraryId}/books/{bookId}",
    tag = "libraries",
    security(("cookie_auth" = []), ("bearer_auth" = [])),
    params(
        ("libraryId" = Uuid, Path, description = "Library ID"),
        ("bookId" = Uuid, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book detached", body = LibraryDetails),
        (status = 404, description = "Library or book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn remove_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    ApiPath((library_id, book_id)): ApiPath<(Uuid, Uuid)>,
) -> AppResult<Json<LibraryDetails>> {
    let library = state.services.libraries.remove_book(user.id, library_id, book_id).await?;
    Ok(Json(library))
}
