//! End-to-end tests against a running server
//!
//! Start the server, then run: cargo test -- --ignored api_tests

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use uuid::Uuid;

const BASE_URL: &str = "http://localhost:8080/v1";

/// Client that keeps the session cookie between requests
fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to build client")
}

fn unique_email() -> String {
    format!("reader-{}@example.com", Uuid::new_v4().simple())
}

/// Sign up and sign in a fresh user, returning its id
async fn signed_in(client: &Client) -> String {
    let email = unique_email();
    let credentials = json!({ "email": email, "password": "secret" });

    let response = client
        .post(format!("{}/auth/signup/credentials", BASE_URL))
        .json(&credentials)
        .send()
        .await
        .expect("Failed to send signup request");
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.expect("Failed to parse signup response");
    let id = body["id"].as_str().expect("No id in response").to_string();

    let response = client
        .post(format!("{}/auth/signin/credentials", BASE_URL))
        .json(&credentials)
        .send()
        .await
        .expect("Failed to send signin request");
    assert_eq!(response.status(), StatusCode::OK);

    id
}

async fn create(client: &Client, path: &str, body: Value) -> Value {
    let response = client
        .post(format!("{}{}", BASE_URL, path))
        .json(&body)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CREATED);
    response.json().await.expect("Failed to parse response")
}

#[tokio::test]
#[ignore]
async fn test_health_check() {
    let response = client()
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_signup_signin_validate() {
    let client = client();
    let email = unique_email();
    let credentials = json!({ "email": email, "password": "secret" });

    let response = client
        .post(format!("{}/auth/signup/credentials", BASE_URL))
        .json(&credentials)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.unwrap();
    let id = body["id"].as_str().unwrap();
    assert!(Uuid::parse_str(id).is_ok());

    // Same email again
    let response = client
        .post(format!("{}/auth/signup/credentials", BASE_URL))
        .json(&credentials)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = client
        .post(format!("{}/auth/signin/credentials", BASE_URL))
        .json(&credentials)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response
        .headers()
        .get("set-cookie")
        .expect("No cookie set")
        .to_str()
        .unwrap()
        .to_string();
    assert!(cookie.starts_with("access_token="));

    let response = client
        .get(format!("{}/auth/validate-token", BASE_URL))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["user"]["email"], email);
    assert_eq!(body["user"]["id"], id);

    // The same token works as a bearer credential
    let token = cookie
        .trim_start_matches("access_token=")
        .split(';')
        .next()
        .unwrap();
    let response = Client::new()
        .get(format!("{}/auth/validate-token", BASE_URL))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = client
        .post(format!("{}/auth/signin/credentials", BASE_URL))
        .json(&json!({ "email": email, "password": "wrong" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "invalid email or password");

    client
        .post(format!("{}/auth/signout", BASE_URL))
        .send()
        .await
        .unwrap();
    let response = client
        .get(format!("{}/auth/validate-token", BASE_URL))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore]
async fn test_forgot_password_does_not_reveal_accounts() {
    let client = client();
    let known = unique_email();
    client
        .post(format!("{}/auth/signup/credentials", BASE_URL))
        .json(&json!({ "email": known, "password": "secret" }))
        .send()
        .await
        .unwrap();

    let mut bodies = Vec::new();
    for email in [known, unique_email()] {
        let response = client
            .post(format!("{}/auth/forgot-password", BASE_URL))
            .json(&json!({ "email": email }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        bodies.push(response.json::<Value>().await.unwrap());
    }
    assert_eq!(bodies[0], bodies[1]);

    let response = client
        .post(format!("{}/auth/reset-password/{}", BASE_URL, "ab".repeat(32)))
        .json(&json!({ "password": "new-secret" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "invalid or expired token");
}

#[tokio::test]
#[ignore]
async fn test_library_membership_survives_library_delete() {
    let client = client();
    signed_in(&client).await;

    let library = create(&client, "/libraries", json!({ "name": "Sci-Fi" })).await;
    let book = create(
        &client,
        "/books",
        json!({ "title": "Dune", "author": "Frank Herbert", "pages": 412 }),
    )
    .await;
    let library_id = library["id"].as_str().unwrap();
    let book_id = book["id"].as_str().unwrap();

    let response = client
        .post(format!("{}/libraries/{}/books/{}", BASE_URL, library_id, book_id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let details: Value = response.json().await.unwrap();
    assert_eq!(details["books"][0]["title"], "Dune");

    let response = client
        .delete(format!("{}/libraries/{}", BASE_URL, library_id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let other = create(&client, "/libraries", json!({ "name": "Favourites" })).await;
    let response = client
        .post(format!("{}/libraries/{}/books/{}", BASE_URL, other["id"].as_str().unwrap(), book_id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore]
async fn test_loans_and_tenant_isolation() {
    let owner = client();
    signed_in(&owner).await;
    let book = create(&owner, "/books", json!({ "title": "Dune", "author": "Frank Herbert" })).await;
    let book_id = book["id"].as_str().unwrap();

    let loan_request = json!({ "book_id": book_id, "borrower_name": "Alice", "loan_date": "2024-05-01" });
    let loan = create(&owner, "/loans", loan_request.clone()).await;

    let response = owner
        .post(format!("{}/loans", BASE_URL))
        .json(&loan_request)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "book already borrowed");

    let response = owner
        .put(format!("{}/loans/{}/return", BASE_URL, loan["id"].as_str().unwrap()))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    create(&owner, "/loans", loan_request).await;

    let response = owner
        .get(format!("{}/loans?returned=1&book_id={}", BASE_URL, book_id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let returned: Value = response.json().await.unwrap();
    assert_eq!(returned.as_array().unwrap().len(), 1);
    assert_eq!(returned[0]["id"], loan["id"]);

    for query in ["returned=maybe", "book_id=42"] {
        let response = owner
            .get(format!("{}/loans?{}", BASE_URL, query))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["error"], "BadValue");
    }

    let response = owner
        .get(format!("{}/loans/not-a-uuid", BASE_URL))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "BadValue");

    // Another user sees nothing of it
    let stranger = client();
    signed_in(&stranger).await;
    for path in [format!("/books/{}", book_id), format!("/loans/{}", loan["id"].as_str().unwrap())] {
        let response = stranger
            .get(format!("{}{}", BASE_URL, path))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
    let response = stranger
        .delete(format!("{}/books/{}", BASE_URL, book_id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore]
async fn test_book_validation_and_filters() {
    let client = client();
    signed_in(&client).await;

    let response = client
        .post(format!("{}/books", BASE_URL))
        .json(&json!({ "title": "Dune", "author": "Frank Herbert", "isbn": "9".repeat(21) }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "isbn must be less than or equal to 20");

    create(&client, "/books", json!({ "title": "Dune", "author": "Frank Herbert" })).await;
    let read = create(&client, "/books", json!({ "title": "Emma", "author": "Jane Austen" })).await;
    client
        .put(format!("{}/books/{}/read", BASE_URL, read["id"].as_str().unwrap()))
        .send()
        .await
        .unwrap();

    let response = client
        .get(format!("{}/books?read=true", BASE_URL))
        .send()
        .await
        .unwrap();
    let books: Value = response.json().await.unwrap();
    assert_eq!(books.as_array().unwrap().len(), 1);
    assert_eq!(books[0]["title"], "Emma");

    let response = client
        .get(format!("{}/books?read=perhaps", BASE_URL))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
