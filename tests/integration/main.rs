//! Integration tests
//!
//! `router_tests` run in-process without a database. `repository_tests`
//! need Docker (testcontainers) and `api_tests` need a running server;
//! both are ignored by default: `cargo test -- --ignored`.

mod api_tests;
mod repository_tests;
