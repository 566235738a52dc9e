//! Repository tests against a disposable PostgreSQL container

use chrono::{Duration, Utc};
use uuid::Uuid;

use mybooks_server::{
    error::AppError,
    models::{
        book::{Book, BookFilters, CreateBook, UpdateBook},
        library::CreateLibrary,
        loan::{CreateLoan, LoanFilters},
        token::ValidationToken,
        user::User,
    },
    repository::{tokens::Consumption, Repository},
};

use crate::common::{create_user, setup_test_db};

fn new_book(title: &str, owner: Uuid) -> Book {
    CreateBook {
        title: title.to_string(),
        author: "Frank Herbert".to_string(),
        description: String::new(),
        cover_url: String::new(),
        genre: "Sci-Fi".to_string(),
        isbn: "9780441013593".to_string(),
        published_date: "1965".to_string(),
        language: "en".to_string(),
        pages: 412,
        read: false,
    }
    .into_book(Uuid::new_v4(), owner, Utc::now())
}

fn new_loan(book_id: Uuid, owner: Uuid) -> mybooks_server::models::loan::Loan {
    CreateLoan {
        book_id: book_id.to_string(),
        borrower_name: "Alice".to_string(),
        loan_date: "2024-05-01".to_string(),
    }
    .into_loan(Uuid::new_v4(), book_id, owner, Utc::now())
}

async fn two_users(repo: &Repository) -> (User, User) {
    (
        create_user(repo, "owner@example.com").await,
        create_user(repo, "stranger@example.com").await,
    )
}

#[tokio::test]
#[ignore]
async fn duplicate_email_is_a_conflict() {
    let (pool, _container) = setup_test_db().await;
    let repo = Repository::new(pool);

    create_user(&repo, "a@b.com").await;
    let mut user = create_user(&repo, "c@d.com").await;
    user.id = Uuid::new_v4();
    user.email = "a@b.com".to_string();

    let err = repo.users.create(&user).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(ref m) if m == "user with email already exists"));
}

#[tokio::test]
#[ignore]
async fn book_round_trip() {
    let (pool, _container) = setup_test_db().await;
    let repo = Repository::new(pool);
    let (owner, _) = two_users(&repo).await;

    let book = new_book("Dune", owner.id);
    repo.books.create(&book).await.unwrap();
    let fetched = repo.books.get_by_id(owner.id, book.id).await.unwrap();

    assert_eq!(fetched.id, book.id);
    assert_eq!(fetched.title, book.title);
    assert_eq!(fetched.author, book.author);
    assert_eq!(fetched.isbn, book.isbn);
    assert_eq!(fetched.pages, book.pages);
    assert_eq!(fetched.read, book.read);
    assert_eq!(fetched.user_id, owner.id);
}

#[tokio::test]
#[ignore]
async fn other_users_rows_look_missing() {
    let (pool, _container) = setup_test_db().await;
    let repo = Repository::new(pool);
    let (owner, stranger) = two_users(&repo).await;

    let book = repo.books.create(&new_book("Dune", owner.id)).await.unwrap();
    let library = repo
        .libraries
        .create(
            &CreateLibrary {
                name: "Sci-Fi".to_string(),
                description: String::new(),
            }
            .into_library(Uuid::new_v4(), owner.id, Utc::now()),
        )
        .await
        .unwrap();

    let not_found = |e: AppError| matches!(e, AppError::NotFound(_));

    assert!(not_found(repo.books.get_by_id(stranger.id, book.id).await.unwrap_err()));
    assert!(not_found(
        repo.books
            .update(stranger.id, book.id, &UpdateBook { title: Some("Mine".into()), ..Default::default() })
            .await
            .unwrap_err()
    ));
    assert!(not_found(repo.books.delete(stranger.id, book.id).await.unwrap_err()));
    assert!(not_found(repo.libraries.get_by_id(stranger.id, library.id).await.unwrap_err()));
    assert!(not_found(repo.libraries.delete(stranger.id, library.id).await.unwrap_err()));
    assert!(repo.books.get_all(stranger.id, &BookFilters::default()).await.unwrap().is_empty());

    // The owner still sees everything untouched
    assert_eq!(repo.books.get_by_id(owner.id, book.id).await.unwrap().title, "Dune");
}

#[tokio::test]
#[ignore]
async fn book_filters_and_ordering() {
    let (pool, _container) = setup_test_db().await;
    let repo = Repository::new(pool);
    let (owner, _) = two_users(&repo).await;

    let dune = repo.books.create(&new_book("Dune", owner.id)).await.unwrap();
    let mut messiah = new_book("Dune Messiah", owner.id);
    messiah.created_at = dune.created_at + Duration::seconds(1);
    messiah.read = true;
    repo.books.create(&messiah).await.unwrap();

    let all = repo.books.get_all(owner.id, &BookFilters::default()).await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].title, "Dune Messiah");

    let filters = BookFilters {
        title: Some("messiah".into()),
        ..Default::default()
    };
    let found = repo.books.get_all(owner.id, &filters).await.unwrap();
    assert_eq!(found.len(), 1);

    let filters = BookFilters {
        read: Some(false),
        genre: Some("sci-fi".into()),
        ..Default::default()
    };
    let unread = repo.books.get_all(owner.id, &filters).await.unwrap();
    assert_eq!(unread.len(), 1);
    assert_eq!(unread[0].id, dune.id);
}

#[tokio::test]
#[ignore]
async fn partial_update_keeps_other_fields() {
    let (pool, _container) = setup_test_db().await;
    let repo = Repository::new(pool);
    let (owner, _) = two_users(&repo).await;

    let book = repo.books.create(&new_book("Dune", owner.id)).await.unwrap();
    let updated = repo
        .books
        .update(
            owner.id,
            book.id,
            &UpdateBook {
                pages: Some(500),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.pages, 500);
    assert_eq!(updated.title, "Dune");
    assert_eq!(updated.created_at, book.created_at);
    assert!(updated.updated_at >= book.updated_at);

    let read = repo.books.set_read(owner.id, book.id, true).await.unwrap();
    assert!(read.read);
}

#[tokio::test]
#[ignore]
async fn loan_lifecycle() {
    let (pool, _container) = setup_test_db().await;
    let repo = Repository::new(pool);
    let (owner, stranger) = two_users(&repo).await;
    let book = repo.books.create(&new_book("Dune", owner.id)).await.unwrap();

    let first = repo.loans.create(&new_loan(book.id, owner.id)).await.unwrap();
    assert!(!first.is_returned);

    let err = repo.loans.create(&new_loan(book.id, owner.id)).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(ref m) if m == "book already borrowed"));

    // Someone else's book cannot be lent
    let err = repo.loans.create(&new_loan(book.id, stranger.id)).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let returned = repo.loans.return_loan(owner.id, first.id).await.unwrap();
    assert!(returned.is_returned);
    // Returning twice is not an error
    assert!(repo.loans.return_loan(owner.id, first.id).await.unwrap().is_returned);

    let second = repo.loans.create(&new_loan(book.id, owner.id)).await.unwrap();

    let outstanding = repo
        .loans
        .get_all(
            owner.id,
            &LoanFilters {
                book_id: Some(book.id),
                returned: Some(false),
            },
        )
        .await
        .unwrap();
    assert_eq!(outstanding.len(), 1);
    assert_eq!(outstanding[0].id, second.id);

    assert!(matches!(
        repo.loans.return_loan(stranger.id, second.id).await.unwrap_err(),
        AppError::NotFound(_)
    ));
}

#[tokio::test]
#[ignore]
async fn deleting_a_library_removes_memberships() {
    let (pool, _container) = setup_test_db().await;
    let repo = Repository::new(pool.clone());
    let (owner, _) = two_users(&repo).await;

    let scifi = CreateLibrary {
        name: "Sci-Fi".to_string(),
        description: String::new(),
    }
    .into_library(Uuid::new_v4(), owner.id, Utc::now());
    let library = repo.libraries.create(&scifi).await.unwrap();
    let book = repo.books.create(&new_book("Dune", owner.id)).await.unwrap();

    let details = repo.libraries.add_book(owner.id, library.id, book.id).await.unwrap();
    assert_eq!(details.books.len(), 1);
    // Adding again is harmless
    repo.libraries.add_book(owner.id, library.id, book.id).await.unwrap();

    repo.libraries.delete(owner.id, library.id).await.unwrap();

    let links: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM book_library WHERE book_id = $1")
        .bind(book.id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(links, 0);

    // Book survives and can join another library
    let favourites = CreateLibrary {
        name: "Favourites".to_string(),
        description: String::new(),
    }
    .into_library(Uuid::new_v4(), owner.id, Utc::now());
    let other = repo.libraries.create(&favourites).await.unwrap();
    let details = repo.libraries.add_book(owner.id, other.id, book.id).await.unwrap();
    assert_eq!(details.books[0].id, book.id);

    let details = repo.libraries.remove_book(owner.id, other.id, book.id).await.unwrap();
    assert!(details.books.is_empty());
}

#[tokio::test]
#[ignore]
async fn deleting_a_book_removes_memberships() {
    let (pool, _container) = setup_test_db().await;
    let repo = Repository::new(pool);
    let (owner, _) = two_users(&repo).await;

    let library = repo
        .libraries
        .create(
            &CreateLibrary {
                name: "Sci-Fi".to_string(),
                description: String::new(),
            }
            .into_library(Uuid::new_v4(), owner.id, Utc::now()),
        )
        .await
        .unwrap();
    let book = repo.books.create(&new_book("Dune", owner.id)).await.unwrap();
    repo.libraries.add_book(owner.id, library.id, book.id).await.unwrap();
    repo.loans.create(&new_loan(book.id, owner.id)).await.unwrap();

    repo.books.delete(owner.id, book.id).await.unwrap();

    let details = repo.libraries.get_by_id(owner.id, library.id).await.unwrap();
    assert!(details.books.is_empty());
    assert!(repo.loans.get_all(owner.id, &LoanFilters::default()).await.unwrap().is_empty());
}

#[tokio::test]
#[ignore]
async fn association_requires_owning_both_sides() {
    let (pool, _container) = setup_test_db().await;
    let repo = Repository::new(pool);
    let (owner, stranger) = two_users(&repo).await;

    let library = repo
        .libraries
        .create(
            &CreateLibrary {
                name: "Mine".to_string(),
                description: String::new(),
            }
            .into_library(Uuid::new_v4(), owner.id, Utc::now()),
        )
        .await
        .unwrap();
    let foreign_book = repo.books.create(&new_book("Theirs", stranger.id)).await.unwrap();

    let err = repo
        .libraries
        .add_book(owner.id, library.id, foreign_book.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(ref m) if m == "book not found"));

    let err = repo
        .libraries
        .add_book(stranger.id, library.id, foreign_book.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(ref m) if m == "library not found"));
}

#[tokio::test]
#[ignore]
async fn reset_token_is_single_use() {
    let (pool, _container) = setup_test_db().await;
    let repo = Repository::new(pool);
    let (owner, _) = two_users(&repo).await;

    let token = ValidationToken::password_reset("ab".repeat(32), owner.id, Utc::now());
    repo.tokens.create(&token).await.unwrap();

    let outcome = repo
        .tokens
        .consume_password_reset(&token.token, "$argon2id$new", Utc::now())
        .await
        .unwrap();
    assert_eq!(outcome, Consumption::Consumed);

    let user = repo.users.get_by_id(owner.id).await.unwrap().unwrap();
    assert_eq!(user.password, "$argon2id$new");

    let again = repo
        .tokens
        .consume_password_reset(&token.token, "$argon2id$other", Utc::now())
        .await
        .unwrap();
    assert_eq!(again, Consumption::Rejected);

    let missing = repo
        .tokens
        .consume_password_reset("unknown", "$argon2id$other", Utc::now())
        .await
        .unwrap();
    assert_eq!(missing, Consumption::Missing);
}

#[tokio::test]
#[ignore]
async fn token_expiry_boundary_and_idempotent_invalidation() {
    let (pool, _container) = setup_test_db().await;
    let repo = Repository::new(pool);
    let (owner, _) = two_users(&repo).await;

    let token = ValidationToken::password_reset("cd".repeat(32), owner.id, Utc::now());
    repo.tokens.create(&token).await.unwrap();
    let stored = repo.tokens.get(&token.token).await.unwrap().unwrap();

    // Exactly at the expiry instant the token is already expired
    let outcome = repo
        .tokens
        .consume_password_reset(&token.token, "$argon2id$new", stored.expires_at)
        .await
        .unwrap();
    assert_eq!(outcome, Consumption::Rejected);

    repo.tokens.invalidate(&token.token).await.unwrap();
    repo.tokens.invalidate(&token.token).await.unwrap();

    let after = repo.tokens.get(&token.token).await.unwrap().unwrap();
    assert!(!after.valid);
    assert_eq!(after.expires_at, stored.expires_at);
    assert_eq!(after.token_type, stored.token_type);

    let user = repo.users.get_by_id(owner.id).await.unwrap().unwrap();
    assert_eq!(user.password, "$argon2id$placeholder");
}
