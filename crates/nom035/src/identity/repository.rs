use super::domain::{NewUser, User, UserId};
pub use crate::error::RepositoryError;

/// Storage abstraction for accounts. E-mail addresses are unique.
pub trait UserRepository: Send + Sync {
    /// Fails with `RepositoryError::Conflict` when the e-mail is taken.
    fn insert(&self, user: NewUser) -> Result<User, RepositoryError>;
    fn fetch(&self, id: UserId) -> Result<Option<User>, RepositoryError>;
    fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError>;
    fn all(&self) -> Result<Vec<User>, RepositoryError>;
}
