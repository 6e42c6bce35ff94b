//! Repository layer for account storage.

mod user_directory;

pub use user_directory::{InMemoryDirectory, UserDirectory};

#[cfg(any(test, feature = "test-utils"))]
pub use user_directory::MockUserDirectory;
