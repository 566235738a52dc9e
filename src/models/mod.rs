//! Data models for MyBooks

pub mod book;
pub mod library;
pub mod loan;
pub mod token;
pub mod user;

// Re-export commonly used types
pub use book::Book;
pub use library::{Library, LibraryDetails};
pub use loan::Loan;
pub use token::ValidationToken;
pub use user::User;
